//! Error types for theory lookups and code conversions

use thiserror::Error;

/// Error types for theory operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TheoryError {
    #[error("Unknown degree code: {code}. Must be 0-15")]
    UnknownDegree { code: i32 },

    #[error("Unknown state code: {code}. Must be 0-4")]
    UnknownState { code: i32 },

    #[error("Unknown quality code: {code}. Must be 0-12")]
    UnknownQuality { code: i32 },

    #[error("Unknown modulation kind code: {code}. Must be 0-3")]
    UnknownModulationKind { code: i32 },

    #[error("Unknown cadence kind code: {code}. Must be 0-3")]
    UnknownCadenceKind { code: i32 },

    #[error("Pitch class out of range: {pitch_class}. Must be 0-11")]
    PitchClassOutOfRange { pitch_class: i32 },
}

/// Result type for theory operations
pub type TheoryResult<T> = Result<T, TheoryError>;
