//! Modulation and cadence vocabulary

use crate::error::{TheoryError, TheoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four supported ways of leaving one key for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ModulationKind {
    /// Close the old key with a perfect cadence, then start fresh
    PerfectCadence = 0,
    /// Reinterpret a chord diatonic in both keys
    PivotChord = 1,
    /// Abrupt change through a chord carrying a note foreign to the old key
    Alteration = 2,
    /// A V/X of the old key reinterpreted as V of the new key
    SecondaryDominant = 3,
}

/// All modulation kinds in code order
pub const ALL_MODULATION_KINDS: [ModulationKind; 4] = [
    ModulationKind::PerfectCadence,
    ModulationKind::PivotChord,
    ModulationKind::Alteration,
    ModulationKind::SecondaryDominant,
];

/// Display names, indexed by kind code
pub const MODULATION_KIND_NAMES: [&str; 4] = [
    "Perfect Cadence",
    "Pivot Chord",
    "Alteration",
    "Secondary Dominant",
];

impl ModulationKind {
    /// Stable integer code of this kind
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a kind from its integer code
    pub fn from_code(code: i32) -> TheoryResult<Self> {
        match code {
            0..=3 => Ok(ALL_MODULATION_KINDS[code as usize]),
            _ => Err(TheoryError::UnknownModulationKind { code }),
        }
    }

    /// Whether a window of `len` chords (`end - start + 1`) fits this kind
    pub fn window_len_ok(self, len: usize) -> bool {
        match self {
            ModulationKind::PerfectCadence
            | ModulationKind::Alteration
            | ModulationKind::SecondaryDominant => len == 2,
            ModulationKind::PivotChord => len >= 3,
        }
    }

    /// Human-readable description of the window this kind accepts
    pub fn window_requirement(self) -> &'static str {
        match self {
            ModulationKind::PerfectCadence => "exactly 2 chords",
            ModulationKind::PivotChord => "at least 3 chords",
            ModulationKind::Alteration => "exactly 2 chords",
            ModulationKind::SecondaryDominant => "exactly 2 chords",
        }
    }
}

impl fmt::Display for ModulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MODULATION_KIND_NAMES[self.code() as usize])
    }
}

/// Stereotyped two-chord closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CadenceKind {
    /// V → I, both fundamental, no seventh on I
    Perfect = 0,
    /// IV → I
    Plagal = 1,
    /// Ends on V in fundamental state
    Half = 2,
    /// V → VI
    Deceptive = 3,
}

impl CadenceKind {
    /// Stable integer code of this kind
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a cadence kind from its integer code
    pub fn from_code(code: i32) -> TheoryResult<Self> {
        match code {
            0 => Ok(CadenceKind::Perfect),
            1 => Ok(CadenceKind::Plagal),
            2 => Ok(CadenceKind::Half),
            3 => Ok(CadenceKind::Deceptive),
            _ => Err(TheoryError::UnknownCadenceKind { code }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_lengths() {
        assert!(ModulationKind::PerfectCadence.window_len_ok(2));
        assert!(!ModulationKind::PerfectCadence.window_len_ok(3));
        assert!(ModulationKind::PivotChord.window_len_ok(3));
        assert!(ModulationKind::PivotChord.window_len_ok(6));
        assert!(!ModulationKind::PivotChord.window_len_ok(2));
        assert!(ModulationKind::Alteration.window_len_ok(2));
        assert!(ModulationKind::SecondaryDominant.window_len_ok(2));
        assert!(!ModulationKind::SecondaryDominant.window_len_ok(1));
    }

    #[test]
    fn test_round_trip() {
        for k in ALL_MODULATION_KINDS {
            assert_eq!(ModulationKind::from_code(i32::from(k.code())).unwrap(), k);
        }
        assert!(ModulationKind::from_code(4).is_err());
        assert!(CadenceKind::from_code(4).is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ModulationKind::PerfectCadence.to_string(), "Perfect Cadence");
        assert_eq!(
            ModulationKind::SecondaryDominant.to_string(),
            "Secondary Dominant"
        );
    }
}
