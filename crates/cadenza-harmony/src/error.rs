//! Configuration errors
//!
//! Everything here surfaces at construction time, before any search runs.
//! Unsatisfiability and timeouts are *not* errors; they are ordinary
//! [`crate::solve::SearchOutcome`] values.

use cadenza_core::ModulationKind;
use cadenza_solver::SolverError;
use thiserror::Error;

/// Error types for piece construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HarmonyError {
    #[error("{modulations} modulations cannot connect {tonalities} tonalities; expected {}", tonalities.saturating_sub(1))]
    SectionCountMismatch {
        modulations: usize,
        tonalities: usize,
    },

    #[error("Piece size must be at least 1, got {size}")]
    EmptyPiece { size: usize },

    #[error("Modulation {index} window [{start}, {end}] is inverted")]
    InvertedWindow {
        index: usize,
        start: usize,
        end: usize,
    },

    #[error("Modulation {index} window [{start}, {end}] leaves the piece of {size} chords")]
    WindowOutOfRange {
        index: usize,
        start: usize,
        end: usize,
        size: usize,
    },

    #[error("Modulation {index} ({kind}) has a window of {len} chords; it needs {}", kind.window_requirement())]
    WindowLengthMismatch {
        index: usize,
        kind: ModulationKind,
        len: usize,
    },

    #[error("Section {index} would span {duration} chords; every section needs at least one")]
    EmptySection { index: usize, duration: i64 },

    #[error("Section {index} closes with a perfect cadence but spans only {duration} chords")]
    CadenceSectionTooShort { index: usize, duration: i64 },

    #[error("Section {index} follows an alteration but spans only {duration} chords; the new dominant needs room")]
    AlterationSectionTooShort { index: usize, duration: i64 },

    #[error("Cadence position {pos} does not fit inside section {section}")]
    CadenceOutOfRange { section: usize, pos: usize },

    #[error("Section {index} ratio bounds are invalid: {name} = [{min}, {max}]")]
    InvalidRatioBounds {
        index: usize,
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Constraint model construction failed: {0}")]
    Model(#[from] SolverError),
}

/// Result type for piece construction
pub type HarmonyResult<T> = Result<T, HarmonyError>;
