//! Tonalities: a tonic pitch class plus a mode
//!
//! A [`Tonality`] is the pure-lookup collaborator of the constraint layer:
//! it answers what pitch class each degree's root sits on, what the default
//! diatonic quality of a degree is, and whether a pitch class belongs to the
//! key at all.

use crate::degree::Degree;
use crate::error::{TheoryError, TheoryResult};
use crate::quality::{ChordQuality, ChordState, ALL_QUALITIES};
use crate::tables;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode of a tonality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    /// Major mode
    Major = 0,
    /// Minor mode
    Minor = 1,
}

impl Mode {
    /// Stable integer code of this mode
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "major"),
            Mode::Minor => write!(f, "minor"),
        }
    }
}

/// Interval pattern of the major scale, in semitones above the tonic
const MAJOR_SCALE: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Interval pattern of the natural minor scale.
///
/// The raised leading tone of minor keys enters through chord qualities
/// (V is major or dominant in minor), not through the scale itself.
const MINOR_SCALE: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Pitch class spellings used for tonality names
const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// A key: tonic pitch class and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tonality {
    tonic: u8,
    mode: Mode,
}

impl Tonality {
    /// A new tonality; `tonic` is a pitch class 0..=11
    pub fn new(tonic: i32, mode: Mode) -> TheoryResult<Self> {
        if !(0..12).contains(&tonic) {
            return Err(TheoryError::PitchClassOutOfRange { pitch_class: tonic });
        }
        Ok(Tonality {
            tonic: tonic as u8,
            mode,
        })
    }

    /// A major key on the given tonic pitch class
    pub fn major(tonic: i32) -> TheoryResult<Self> {
        Self::new(tonic, Mode::Major)
    }

    /// A minor key on the given tonic pitch class
    pub fn minor(tonic: i32) -> TheoryResult<Self> {
        Self::new(tonic, Mode::Minor)
    }

    /// The tonic pitch class
    pub fn tonic(self) -> u8 {
        self.tonic
    }

    /// The mode
    pub fn mode(self) -> Mode {
        self.mode
    }

    /// The seven diatonic pitch classes, tonic first
    pub fn scale(self) -> [u8; 7] {
        let pattern = match self.mode {
            Mode::Major => MAJOR_SCALE,
            Mode::Minor => MINOR_SCALE,
        };
        let mut out = [0u8; 7];
        for (slot, step) in out.iter_mut().zip(pattern) {
            *slot = (self.tonic + step) % 12;
        }
        out
    }

    /// Pitch class of the diatonic degree `d` (0..=6)
    pub fn degree_pitch(self, d: u8) -> u8 {
        self.scale()[usize::from(d % 7)]
    }

    /// Root pitch class of a chord degree.
    ///
    /// Diatonic degrees, the appoggiatura and secondary dominants read the
    /// scale at their root scale degree; the Neapolitan and the augmented
    /// sixth have chromatic roots a semitone above and a major sixth below
    /// the tonic.
    pub fn degree_note(self, degree: Degree) -> u8 {
        match degree {
            Degree::FlatTwo => (self.tonic + 1) % 12,
            Degree::AugmentedSixth => (self.tonic + 8) % 12,
            _ => self.degree_pitch(tables::bass_degree(degree, ChordState::Fundamental)),
        }
    }

    /// Default quality of a chord degree in this key: the lowest-coded
    /// quality the mode's table allows for it.
    pub fn chord_quality(self, degree: Degree) -> ChordQuality {
        for q in ALL_QUALITIES {
            if tables::quality_allowed(self.mode, degree, q) {
                return q;
            }
        }
        // every table row has at least one legal quality
        unreachable!("degree {degree} has no legal quality")
    }

    /// Diatonic scale degree (0..=6) of a pitch class, if it is in the key
    pub fn pc_degree(self, pitch_class: u8) -> Option<u8> {
        self.scale()
            .iter()
            .position(|&pc| pc == pitch_class % 12)
            .map(|d| d as u8)
    }

    /// Human-readable key name, e.g. "C major"
    pub fn name(self) -> String {
        format!("{} {}", PITCH_NAMES[usize::from(self.tonic)], self.mode)
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // C = 0, D = 2, E = 4, F = 5, G = 7, A = 9, B = 11
    const C: i32 = 0;
    const G: i32 = 7;
    const A: i32 = 9;

    #[test]
    fn test_scales() {
        let c = Tonality::major(C).unwrap();
        assert_eq!(c.scale(), [0, 2, 4, 5, 7, 9, 11]);
        let a = Tonality::minor(A).unwrap();
        assert_eq!(a.scale(), [9, 11, 0, 2, 4, 5, 7]);
    }

    #[test]
    fn test_degree_notes_in_c_major() {
        let c = Tonality::major(C).unwrap();
        assert_eq!(c.degree_note(Degree::First), 0); // C
        assert_eq!(c.degree_note(Degree::Fifth), 7); // G
        assert_eq!(c.degree_note(Degree::Seventh), 11); // B
        assert_eq!(c.degree_note(Degree::FifthAppoggiatura), 0); // spelled as I
        assert_eq!(c.degree_note(Degree::FiveOfTwo), 9); // A, dominant of D
        assert_eq!(c.degree_note(Degree::FiveOfFive), 2); // D, dominant of G
        assert_eq!(c.degree_note(Degree::FlatTwo), 1); // Db
        assert_eq!(c.degree_note(Degree::AugmentedSixth), 8); // Ab
    }

    #[test]
    fn test_degree_notes_in_g_major() {
        let g = Tonality::major(G).unwrap();
        assert_eq!(g.degree_note(Degree::First), 7); // G
        assert_eq!(g.degree_note(Degree::Fifth), 2); // D
        assert_eq!(g.degree_note(Degree::FlatTwo), 8); // Ab
    }

    #[test]
    fn test_default_qualities() {
        let c = Tonality::major(C).unwrap();
        assert_eq!(c.chord_quality(Degree::First), ChordQuality::Major);
        assert_eq!(c.chord_quality(Degree::Second), ChordQuality::Minor);
        assert_eq!(c.chord_quality(Degree::Seventh), ChordQuality::Diminished);
        assert_eq!(
            c.chord_quality(Degree::AugmentedSixth),
            ChordQuality::AugmentedSixth
        );
        let a = Tonality::minor(A).unwrap();
        assert_eq!(a.chord_quality(Degree::First), ChordQuality::Minor);
        assert_eq!(a.chord_quality(Degree::Second), ChordQuality::Diminished);
        assert_eq!(a.chord_quality(Degree::Third), ChordQuality::Major);
        assert_eq!(a.chord_quality(Degree::Fifth), ChordQuality::Major);
    }

    #[test]
    fn test_pc_degree() {
        let c = Tonality::major(C).unwrap();
        assert_eq!(c.pc_degree(0), Some(0));
        assert_eq!(c.pc_degree(7), Some(4));
        assert_eq!(c.pc_degree(6), None); // F# not in C major
        let g = Tonality::major(G).unwrap();
        assert_eq!(g.pc_degree(6), Some(6)); // F# is VII of G
    }

    #[test]
    fn test_names() {
        assert_eq!(Tonality::major(C).unwrap().name(), "C major");
        assert_eq!(Tonality::minor(3).unwrap().name(), "Eb minor");
        assert!(Tonality::major(12).is_err());
        assert!(Tonality::minor(-1).is_err());
    }

    proptest! {
        #[test]
        fn prop_scale_stays_in_pitch_space(tonic in 0i32..12) {
            for mode in [Mode::Major, Mode::Minor] {
                let t = Tonality::new(tonic, mode).unwrap();
                for pc in t.scale() {
                    prop_assert!(pc < 12);
                }
                // scale pitch classes are pairwise distinct
                let mut seen = [false; 12];
                for pc in t.scale() {
                    prop_assert!(!seen[pc as usize]);
                    seen[pc as usize] = true;
                }
            }
        }

        #[test]
        fn prop_pc_degree_inverts_degree_pitch(tonic in 0i32..12, d in 0u8..7) {
            for mode in [Mode::Major, Mode::Minor] {
                let t = Tonality::new(tonic, mode).unwrap();
                prop_assert_eq!(t.pc_degree(t.degree_pitch(d)), Some(d));
            }
        }
    }
}
