//! Configuration constants and operational limits for Cadenza
//!
//! All counts, defaults and limits shared by the theory, solver and harmony
//! crates live here as plain constants, so the rest of the workspace never
//! hard-codes a magic number.

use serde::{Deserialize, Serialize};

/// Musical vocabulary sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicalConstants {
    /// Diatonic scale degrees per octave
    pub scale_degrees: u8,
    /// Pitch classes per octave
    pub chromatic_notes: u8,
    /// Recognised chord functions (I..VII, Vda, V/II..V/VII, bII, +6)
    pub supported_degrees: u8,
    /// Recognised inversion states (fundamental through fourth inversion)
    pub supported_states: u8,
    /// Recognised chord qualities (triads through dominant ninths)
    pub supported_qualities: u8,
    /// Triad classes a quality projects onto
    pub supported_triads: u8,
}

/// Default musical constants
pub const MUSICAL: MusicalConstants = MusicalConstants {
    scale_degrees: 7,
    chromatic_notes: 12,
    supported_degrees: 16,
    supported_states: 5,
    supported_qualities: 13,
    supported_triads: 4,
};

/// Search engine defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Seed for the randomized value selection on degree variables
    pub seed: u64,
    /// Upper bound on explored nodes before the engine gives up
    pub node_limit: u64,
    /// Wall-clock budget in milliseconds for a single search
    pub default_timeout_ms: u64,
}

/// Default search parameters
pub const SEARCH: SearchDefaults = SearchDefaults {
    seed: 42,
    node_limit: 1_000_000,
    default_timeout_ms: 5_000,
};

/// Per-section generation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionDefaults {
    /// Lower bound on the share of chromatic chords in a section
    pub min_chromatic_ratio: f64,
    /// Upper bound on the share of chromatic chords in a section
    pub max_chromatic_ratio: f64,
    /// Lower bound on the share of seventh chords in a section
    pub min_seventh_ratio: f64,
    /// Upper bound on the share of seventh chords in a section
    pub max_seventh_ratio: f64,
}

/// Default progression bounds: everything allowed, nothing required
pub const PROGRESSION: ProgressionDefaults = ProgressionDefaults {
    min_chromatic_ratio: 0.0,
    max_chromatic_ratio: 1.0,
    min_seventh_ratio: 0.0,
    max_seventh_ratio: 1.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_musical_constants() {
        assert_eq!(MUSICAL.scale_degrees, 7);
        assert_eq!(MUSICAL.chromatic_notes, 12);
        assert_eq!(MUSICAL.supported_degrees, 16);
        assert_eq!(MUSICAL.supported_states, 5);
        assert_eq!(MUSICAL.supported_qualities, 13);
    }

    #[test]
    fn test_progression_defaults_are_permissive() {
        assert_eq!(PROGRESSION.min_chromatic_ratio, 0.0);
        assert_eq!(PROGRESSION.max_chromatic_ratio, 1.0);
        assert_eq!(PROGRESSION.min_seventh_ratio, 0.0);
        assert_eq!(PROGRESSION.max_seventh_ratio, 1.0);
    }

    #[test]
    fn test_search_defaults() {
        assert!(SEARCH.node_limit > 0);
        assert!(SEARCH.default_timeout_ms > 0);
    }
}
