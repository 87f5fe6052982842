//! Constraint-based tonal chord progression and modulation generation
//!
//! Given a piece length, a list of key regions and the modulations
//! connecting them, this crate builds a finite-domain model of the whole
//! piece — per-section degree rules, per-boundary modulation structure —
//! and searches it for the first admissible progression.
//!
//! ```
//! use cadenza_core::Tonality;
//! use cadenza_harmony::{solve, PieceParameters, SearchOutcome};
//!
//! let params = PieceParameters::new(4, vec![Tonality::major(0)?], vec![]);
//! match solve(&params)? {
//!     SearchOutcome::Solution(piece) => println!("{piece}"),
//!     SearchOutcome::Unsatisfiable => println!("no admissible progression"),
//!     SearchOutcome::Timeout => println!("ran out of budget"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod geometry;
pub mod modulation;
pub mod params;
pub mod piece;
pub mod progression;
pub mod solution;
pub mod solve;

pub use error::{HarmonyError, HarmonyResult};
pub use geometry::{Phrase, SectionLayout};
pub use modulation::Modulation;
pub use params::{ModulationSpec, PieceParameters, SectionOptions};
pub use piece::TonalPiece;
pub use progression::{post_cadence, ChordProgression, SharedSlices};
pub use solution::{ChordAssignment, ModulationSummary, PieceSolution, SectionSolution};
pub use solve::{solve, solve_with, SearchOutcome, SolveOptions};
