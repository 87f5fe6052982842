//! Chord degrees — the sixteen recognised harmonic functions

use crate::error::{TheoryError, TheoryResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of recognised chord degrees, the row count of every rule table
pub const DEGREE_COUNT: usize = cadenza_config::MUSICAL.supported_degrees as usize;

/// Harmonic function of a chord inside a key.
///
/// The first seven values are the diatonic degrees. `FifthAppoggiatura` is
/// the I chord in second inversion resolving onto V, treated as a degree of
/// its own so the transition table can force its resolution. The `FiveOf*`
/// values are secondary dominants, followed by the Neapolitan `FlatTwo` and
/// the augmented-sixth chord.
///
/// Codes are stable and index the rule tables in [`crate::tables`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Degree {
    /// I, the tonic
    First = 0,
    /// II, the supertonic
    Second = 1,
    /// III, the mediant
    Third = 2,
    /// IV, the subdominant
    Fourth = 3,
    /// V, the dominant
    Fifth = 4,
    /// VI, the submediant
    Sixth = 5,
    /// VII, the leading-tone chord
    Seventh = 6,
    /// I in second inversion resolving to V ("Vda")
    FifthAppoggiatura = 7,
    /// V/II, dominant of the supertonic
    FiveOfTwo = 8,
    /// V/III, dominant of the mediant
    FiveOfThree = 9,
    /// V/IV, dominant of the subdominant
    FiveOfFour = 10,
    /// V/V, dominant of the dominant
    FiveOfFive = 11,
    /// V/VI, dominant of the submediant
    FiveOfSix = 12,
    /// V/VII, dominant of the leading-tone degree (minor mode only)
    FiveOfSeven = 13,
    /// bII, the Neapolitan chord
    FlatTwo = 14,
    /// The augmented-sixth chord
    AugmentedSixth = 15,
}

/// All degrees in code order
pub const ALL_DEGREES: [Degree; DEGREE_COUNT] = [
    Degree::First,
    Degree::Second,
    Degree::Third,
    Degree::Fourth,
    Degree::Fifth,
    Degree::Sixth,
    Degree::Seventh,
    Degree::FifthAppoggiatura,
    Degree::FiveOfTwo,
    Degree::FiveOfThree,
    Degree::FiveOfFour,
    Degree::FiveOfFive,
    Degree::FiveOfSix,
    Degree::FiveOfSeven,
    Degree::FlatTwo,
    Degree::AugmentedSixth,
];

/// Display names, indexed by degree code
pub const DEGREE_NAMES: [&str; DEGREE_COUNT] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "Vda", "V/II", "V/III", "V/IV", "V/V", "V/VI",
    "V/VII", "bII", "Aug6",
];

/// Reverse lookup from display name to degree
static DEGREE_BY_NAME: Lazy<HashMap<&'static str, Degree>> = Lazy::new(|| {
    ALL_DEGREES
        .iter()
        .map(|&d| (DEGREE_NAMES[d.code() as usize], d))
        .collect()
});

impl Degree {
    /// Stable integer code of this degree
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a degree from its display name (e.g. `"V/II"`)
    pub fn from_name(name: &str) -> Option<Self> {
        DEGREE_BY_NAME.get(name).copied()
    }

    /// Decode a degree from its integer code
    pub fn from_code(code: i32) -> TheoryResult<Self> {
        match code {
            0..=15 => Ok(ALL_DEGREES[code as usize]),
            _ => Err(TheoryError::UnknownDegree { code }),
        }
    }

    /// Whether this degree belongs to the diatonic collection (I..VII)
    pub fn is_diatonic(self) -> bool {
        self.code() <= Degree::Seventh.code()
    }

    /// Whether this degree is a secondary dominant (V/II..V/VII)
    pub fn is_secondary_dominant(self) -> bool {
        (Degree::FiveOfTwo.code()..=Degree::FiveOfSeven.code()).contains(&self.code())
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DEGREE_NAMES[self.code() as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Degree::First.code(), 0);
        assert_eq!(Degree::Seventh.code(), 6);
        assert_eq!(Degree::FifthAppoggiatura.code(), 7);
        assert_eq!(Degree::FiveOfTwo.code(), 8);
        assert_eq!(Degree::FlatTwo.code(), 14);
        assert_eq!(Degree::AugmentedSixth.code(), 15);
    }

    #[test]
    fn test_round_trip() {
        for d in ALL_DEGREES {
            assert_eq!(Degree::from_code(i32::from(d.code())).unwrap(), d);
        }
        assert!(Degree::from_code(16).is_err());
        assert!(Degree::from_code(-1).is_err());
    }

    #[test]
    fn test_classification() {
        assert!(Degree::First.is_diatonic());
        assert!(Degree::Seventh.is_diatonic());
        assert!(!Degree::FifthAppoggiatura.is_diatonic());
        assert!(Degree::FiveOfFive.is_secondary_dominant());
        assert!(!Degree::FlatTwo.is_secondary_dominant());
    }

    #[test]
    fn test_display() {
        assert_eq!(Degree::FiveOfFive.to_string(), "V/V");
        assert_eq!(Degree::FlatTwo.to_string(), "bII");
        assert_eq!(Degree::FifthAppoggiatura.to_string(), "Vda");
    }

    #[test]
    fn test_from_name() {
        for d in ALL_DEGREES {
            assert_eq!(Degree::from_name(&d.to_string()), Some(d));
        }
        assert_eq!(Degree::from_name("IX"), None);
    }
}
