//! Chord qualities, inversion states and the triad projection

use crate::error::{TheoryError, TheoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of recognised chord qualities
pub const QUALITY_COUNT: usize = cadenza_config::MUSICAL.supported_qualities as usize;

/// Number of recognised inversion states
pub const STATE_COUNT: usize = cadenza_config::MUSICAL.supported_states as usize;

/// Chord quality: triad, tetrad or dominant-ninth family.
///
/// Codes order the qualities so that everything below `DominantSeventh`
/// carries no seventh; [`ChordQuality::has_seventh`] relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChordQuality {
    /// Major triad
    Major = 0,
    /// Minor triad
    Minor = 1,
    /// Diminished triad
    Diminished = 2,
    /// Augmented triad
    Augmented = 3,
    /// Augmented-sixth chord (treated as a triad for seventh counting)
    AugmentedSixth = 4,
    /// Dominant seventh
    DominantSeventh = 5,
    /// Major seventh
    MajorSeventh = 6,
    /// Minor seventh
    MinorSeventh = 7,
    /// Fully diminished seventh
    DiminishedSeventh = 8,
    /// Half-diminished seventh
    HalfDiminishedSeventh = 9,
    /// Minor triad with a major seventh
    MinorMajorSeventh = 10,
    /// Dominant ninth with a major ninth
    MajorNinthDominant = 11,
    /// Dominant ninth with a minor ninth
    MinorNinthDominant = 12,
}

/// All qualities in code order
pub const ALL_QUALITIES: [ChordQuality; QUALITY_COUNT] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Diminished,
    ChordQuality::Augmented,
    ChordQuality::AugmentedSixth,
    ChordQuality::DominantSeventh,
    ChordQuality::MajorSeventh,
    ChordQuality::MinorSeventh,
    ChordQuality::DiminishedSeventh,
    ChordQuality::HalfDiminishedSeventh,
    ChordQuality::MinorMajorSeventh,
    ChordQuality::MajorNinthDominant,
    ChordQuality::MinorNinthDominant,
];

/// Display names, indexed by quality code
pub const QUALITY_NAMES: [&str; QUALITY_COUNT] = [
    "major",
    "minor",
    "diminished",
    "augmented",
    "augmented sixth",
    "dominant 7",
    "major 7",
    "minor 7",
    "diminished 7",
    "half-diminished 7",
    "minor-major 7",
    "dominant major 9",
    "dominant minor 9",
];

impl ChordQuality {
    /// Stable integer code of this quality
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a quality from its integer code
    pub fn from_code(code: i32) -> TheoryResult<Self> {
        match code {
            0..=12 => Ok(ALL_QUALITIES[code as usize]),
            _ => Err(TheoryError::UnknownQuality { code }),
        }
    }

    /// Whether a chord of this quality sounds a seventh (or more)
    pub fn has_seventh(self) -> bool {
        self.code() >= ChordQuality::DominantSeventh.code()
    }

    /// Project this quality onto its triad class
    pub fn triad(self) -> ChordQuality {
        use ChordQuality::*;
        match self {
            Major | MajorSeventh | DominantSeventh | MajorNinthDominant | MinorNinthDominant => {
                Major
            }
            Minor | MinorSeventh | MinorMajorSeventh => Minor,
            Diminished | DiminishedSeventh | HalfDiminishedSeventh => Diminished,
            Augmented | AugmentedSixth => Augmented,
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", QUALITY_NAMES[self.code() as usize])
    }
}

/// Inversion state: which chord tone sounds in the bass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChordState {
    /// Root in the bass
    Fundamental = 0,
    /// Third in the bass
    FirstInversion = 1,
    /// Fifth in the bass
    SecondInversion = 2,
    /// Seventh in the bass
    ThirdInversion = 3,
    /// Ninth in the bass
    FourthInversion = 4,
}

/// All states in code order
pub const ALL_STATES: [ChordState; STATE_COUNT] = [
    ChordState::Fundamental,
    ChordState::FirstInversion,
    ChordState::SecondInversion,
    ChordState::ThirdInversion,
    ChordState::FourthInversion,
];

/// Display names, indexed by state code
pub const STATE_NAMES: [&str; STATE_COUNT] = [
    "fundamental",
    "1st inversion",
    "2nd inversion",
    "3rd inversion",
    "4th inversion",
];

impl ChordState {
    /// Stable integer code of this state
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a state from its integer code
    pub fn from_code(code: i32) -> TheoryResult<Self> {
        match code {
            0..=4 => Ok(ALL_STATES[code as usize]),
            _ => Err(TheoryError::UnknownState { code }),
        }
    }
}

impl fmt::Display for ChordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", STATE_NAMES[self.code() as usize])
    }
}
