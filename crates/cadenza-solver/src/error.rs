//! Error types for model construction
//!
//! Only model *construction* can error: once a model is frozen, pruning
//! wipeouts and search exhaustion are ordinary outcomes, not errors.

use thiserror::Error;

/// Error types raised while building a model
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Variable domain [{lo}, {hi}] is empty")]
    EmptyDomain { lo: i32, hi: i32 },

    #[error("Variable domain [{lo}, {hi}] exceeds the supported width of {max} values")]
    DomainTooWide { lo: i32, hi: i32, max: u32 },

    #[error("Model is frozen: constraints and variables cannot be added after search has started")]
    ModelFrozen,

    #[error("Element table is empty")]
    EmptyTable,

    #[error("Element table of {len} cells is not a whole number of rows of {cols} columns")]
    RaggedTable { len: usize, cols: usize },

    #[error("A clause needs at least one literal")]
    EmptyClause,

    #[error("Condition literal cannot be negated for implication posting")]
    NotNegatable,
}

/// Result type for model construction
pub type SolverResult<T> = Result<T, SolverError>;
