//! Finite-domain constraint engine for Cadenza
//!
//! A deliberately small solver shaped around what the harmonic model needs:
//! integer variables over bitset domains, element lookups (including the
//! two-dimensional row-major form used by rule tables), clauses of typed
//! literals as the compilation target for reified implications, bounded
//! sums, and a space-cloning depth-first engine with first-fail branching
//! and seeded random value selection.
//!
//! Search is single-threaded; a space owns its whole mutable state, so
//! independent searches simply use independent spaces.

pub mod brancher;
pub mod domain;
pub mod error;
pub mod literal;
pub mod propagator;
pub mod search;
pub mod space;
pub mod var;

pub use brancher::{Brancher, ValSel, VarSel};
pub use domain::Domain;
pub use error::{SolverError, SolverResult};
pub use literal::{Lit, LitStatus};
pub use propagator::{Operand, PropOutcome, Propagator};
pub use search::{DfsEngine, EngineOutcome, SearchStats, StopReason};
pub use space::{Choice, Space, SpaceStatus};
pub use var::IntVar;
