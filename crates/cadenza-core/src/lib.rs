//! Tonal-harmony vocabulary for Cadenza
//!
//! This crate holds the symbolic codes (degrees, inversion states, chord
//! qualities, modulation and cadence kinds), the immutable rule tables of
//! functional harmony, and the [`Tonality`] lookup type. It contains no
//! search logic; the constraint layer in `cadenza-harmony` consumes these
//! tables verbatim.

pub mod degree;
pub mod error;
pub mod modulation;
pub mod quality;
pub mod tables;
pub mod tonality;

pub use degree::{Degree, ALL_DEGREES, DEGREE_COUNT, DEGREE_NAMES};
pub use error::{TheoryError, TheoryResult};
pub use modulation::{CadenceKind, ModulationKind, ALL_MODULATION_KINDS, MODULATION_KIND_NAMES};
pub use quality::{
    ChordQuality, ChordState, ALL_QUALITIES, ALL_STATES, QUALITY_COUNT, QUALITY_NAMES, STATE_COUNT,
    STATE_NAMES,
};
pub use tonality::{Mode, Tonality};
