//! Solution records
//!
//! The generator's output: one assignment per chord position, the
//! per-section hand-off for the downstream voice-leading realiser, the
//! modulation summaries and the phrase windows, plus search statistics.

use crate::geometry::Phrase;
use cadenza_core::{ChordQuality, ChordState, Degree, ModulationKind, Tonality};
use cadenza_solver::SearchStats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything decided about one chord position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordAssignment {
    /// Degree within the enclosing section's key
    pub degree: Degree,
    /// Inversion state
    pub state: ChordState,
    /// Chord quality
    pub quality: ChordQuality,
    /// Root pitch class
    pub root_note: u8,
    /// Scale degree sounding in the bass
    pub bass_degree: u8,
    /// Whether the chord carries a seventh
    pub has_seventh: bool,
    /// Whether the chord is chromatic in its key
    pub is_chromatic: bool,
}

/// One key section of the solved piece, in the shape the voice-leading
/// realiser consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSolution {
    /// First chord position
    pub start: usize,
    /// Number of chords
    pub duration: usize,
    /// The section's key
    pub tonality: Tonality,
    /// Chord degrees, local to the section
    pub degrees: Vec<Degree>,
    /// Inversion states over the section window
    pub states: Vec<ChordState>,
    /// Qualities over the section window
    pub qualities: Vec<ChordQuality>,
}

/// One solved modulation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulationSummary {
    /// How the key change is made
    pub kind: ModulationKind,
    /// First chord position of the window
    pub start: usize,
    /// Last chord position of the window
    pub end: usize,
    /// The key modulated from
    pub from: Tonality,
    /// The key modulated to
    pub to: Tonality,
}

impl fmt::Display for ModulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "from {} to {} ({})", self.from, self.to, self.kind)
    }
}

/// A complete solved piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSolution {
    /// Per-position assignments, attributed to the earliest section
    /// containing each position
    pub chords: Vec<ChordAssignment>,
    /// Per-section solutions
    pub sections: Vec<SectionSolution>,
    /// Modulation summaries
    pub modulations: Vec<ModulationSummary>,
    /// Phrase windows for the downstream realiser
    pub phrases: Vec<Phrase>,
    /// Search effort that produced this solution
    pub stats: SearchStats,
}

impl PieceSolution {
    /// Total number of chords
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// Whether the piece has no chords (never true for a valid solution)
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

impl fmt::Display for PieceSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            write!(f, "{}:", section.tonality)?;
            for degree in &section.degrees {
                write!(f, " {degree}")?;
            }
            writeln!(f)?;
        }
        for modulation in &self.modulations {
            writeln!(f, "{modulation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major() -> Tonality {
        Tonality::major(0).unwrap()
    }

    fn g_major() -> Tonality {
        Tonality::major(7).unwrap()
    }

    #[test]
    fn test_pretty_form() {
        let solution = PieceSolution {
            chords: Vec::new(),
            sections: vec![SectionSolution {
                start: 0,
                duration: 3,
                tonality: c_major(),
                degrees: vec![Degree::First, Degree::Fifth, Degree::First],
                states: vec![ChordState::Fundamental; 3],
                qualities: vec![ChordQuality::Major; 3],
            }],
            modulations: vec![ModulationSummary {
                kind: ModulationKind::PerfectCadence,
                start: 1,
                end: 2,
                from: c_major(),
                to: g_major(),
            }],
            phrases: vec![Phrase { start: 0, end: 2 }],
            stats: SearchStats::default(),
        };
        let text = solution.to_string();
        assert!(text.contains("C major: I V I"));
        assert!(text.contains("from C major to G major (Perfect Cadence)"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let assignment = ChordAssignment {
            degree: Degree::FiveOfFive,
            state: ChordState::FirstInversion,
            quality: ChordQuality::DominantSeventh,
            root_note: 2,
            bass_degree: 3,
            has_seventh: true,
            is_chromatic: true,
        };
        let json = serde_json::to_string(&assignment).unwrap();
        let back: ChordAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assignment);
    }
}
