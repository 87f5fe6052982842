//! Piece parameters
//!
//! The validated input of the generator: the total chord count, the key of
//! every section, the modulation windows connecting them, and the optional
//! per-section chromatic/seventh bounds.

use crate::error::{HarmonyError, HarmonyResult};
use crate::geometry::SectionLayout;
use cadenza_core::{ModulationKind, Tonality};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One modulation between two consecutive sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulationSpec {
    /// How the key change is made
    pub kind: ModulationKind,
    /// First chord position of the modulation window (inclusive)
    pub start: usize,
    /// Last chord position of the modulation window (inclusive)
    pub end: usize,
}

impl ModulationSpec {
    /// A new modulation window
    pub fn new(kind: ModulationKind, start: usize, end: usize) -> Self {
        ModulationSpec { kind, start, end }
    }

    /// Window length in chords
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

/// Per-section generation bounds, as shares of the section length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionOptions {
    /// Lower bound on the share of chromatic chords
    pub min_chromatic_ratio: f64,
    /// Upper bound on the share of chromatic chords
    pub max_chromatic_ratio: f64,
    /// Lower bound on the share of seventh chords
    pub min_seventh_ratio: f64,
    /// Upper bound on the share of seventh chords
    pub max_seventh_ratio: f64,
}

impl Default for SectionOptions {
    fn default() -> Self {
        let defaults = cadenza_config::PROGRESSION;
        SectionOptions {
            min_chromatic_ratio: defaults.min_chromatic_ratio,
            max_chromatic_ratio: defaults.max_chromatic_ratio,
            min_seventh_ratio: defaults.min_seventh_ratio,
            max_seventh_ratio: defaults.max_seventh_ratio,
        }
    }
}

impl SectionOptions {
    fn check(&self, index: usize) -> HarmonyResult<()> {
        for (name, min, max) in [
            (
                "chromatic",
                self.min_chromatic_ratio,
                self.max_chromatic_ratio,
            ),
            ("seventh", self.min_seventh_ratio, self.max_seventh_ratio),
        ] {
            let sane = (0.0..=1.0).contains(&min) && (0.0..=1.0).contains(&max) && min <= max;
            if !sane {
                return Err(HarmonyError::InvalidRatioBounds {
                    index,
                    name,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// The full input of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceParameters {
    /// Total number of chords
    pub size: usize,
    /// Tonality of each section, in order
    pub tonalities: Vec<Tonality>,
    /// Modulation windows; one fewer than tonalities
    pub modulations: Vec<ModulationSpec>,
    /// Per-section bounds, parallel to `tonalities`
    pub section_options: Vec<SectionOptions>,
}

impl PieceParameters {
    /// Parameters with default section options
    pub fn new(size: usize, tonalities: Vec<Tonality>, modulations: Vec<ModulationSpec>) -> Self {
        let section_options = vec![SectionOptions::default(); tonalities.len()];
        PieceParameters {
            size,
            tonalities,
            modulations,
            section_options,
        }
    }

    /// Replace the options of one section
    pub fn with_section_options(mut self, section: usize, options: SectionOptions) -> Self {
        if section < self.section_options.len() {
            self.section_options[section] = options;
        }
        self
    }

    /// Check every configuration rule; cheap, and run again by
    /// [`crate::piece::TonalPiece::new`]
    pub fn validate(&self) -> HarmonyResult<()> {
        if self.size == 0 {
            return Err(HarmonyError::EmptyPiece { size: 0 });
        }
        if self.modulations.len() + 1 != self.tonalities.len() {
            return Err(HarmonyError::SectionCountMismatch {
                modulations: self.modulations.len(),
                tonalities: self.tonalities.len(),
            });
        }
        for (index, m) in self.modulations.iter().enumerate() {
            if m.start > m.end {
                return Err(HarmonyError::InvertedWindow {
                    index,
                    start: m.start,
                    end: m.end,
                });
            }
            if m.end >= self.size {
                return Err(HarmonyError::WindowOutOfRange {
                    index,
                    start: m.start,
                    end: m.end,
                    size: self.size,
                });
            }
            if !m.kind.window_len_ok(m.len()) {
                return Err(HarmonyError::WindowLengthMismatch {
                    index,
                    kind: m.kind,
                    len: m.len(),
                });
            }
        }
        for (index, options) in self.section_options.iter().enumerate() {
            options.check(index)?;
        }
        // section geometry must leave every section workable
        SectionLayout::derive(self.size, &self.modulations)?;
        Ok(())
    }
}

impl fmt::Display for PieceParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tonal piece of {} chords", self.size)?;
        write!(f, "Tonalities:")?;
        for t in &self.tonalities {
            write!(f, " {t}")?;
        }
        writeln!(f)?;
        for m in &self.modulations {
            writeln!(f, "Modulation: {} over [{}, {}]", m.kind, m.start, m.end)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_core::Tonality;

    const C: i32 = 0;
    const G: i32 = 7;

    fn two_keys(kind: ModulationKind, start: usize, end: usize, size: usize) -> PieceParameters {
        PieceParameters::new(
            size,
            vec![Tonality::major(C).unwrap(), Tonality::major(G).unwrap()],
            vec![ModulationSpec::new(kind, start, end)],
        )
    }

    #[test]
    fn test_single_section_is_valid() {
        let p = PieceParameters::new(4, vec![Tonality::major(C).unwrap()], vec![]);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_count_mismatch() {
        let p = PieceParameters::new(4, vec![Tonality::major(C).unwrap()], vec![
            ModulationSpec::new(ModulationKind::PerfectCadence, 1, 2),
        ]);
        assert!(matches!(
            p.validate(),
            Err(HarmonyError::SectionCountMismatch { .. })
        ));
    }

    #[test]
    fn test_window_length_enforced_per_kind() {
        // a pivot window of 2 chords is too short
        let p = two_keys(ModulationKind::PivotChord, 4, 5, 10);
        assert!(matches!(
            p.validate(),
            Err(HarmonyError::WindowLengthMismatch { .. })
        ));
        // a cadence window of 3 chords is too long
        let p = two_keys(ModulationKind::PerfectCadence, 4, 6, 10);
        assert!(matches!(
            p.validate(),
            Err(HarmonyError::WindowLengthMismatch { .. })
        ));
        assert!(two_keys(ModulationKind::PivotChord, 4, 7, 10).validate().is_ok());
        assert!(two_keys(ModulationKind::PerfectCadence, 6, 7, 10)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_window_bounds() {
        let p = two_keys(ModulationKind::PerfectCadence, 9, 10, 10);
        assert!(matches!(
            p.validate(),
            Err(HarmonyError::WindowOutOfRange { .. })
        ));
        let p = two_keys(ModulationKind::PerfectCadence, 5, 4, 10);
        assert!(matches!(p.validate(), Err(HarmonyError::InvertedWindow { .. })));
    }

    #[test]
    fn test_ratio_bounds() {
        let p = two_keys(ModulationKind::PerfectCadence, 6, 7, 10).with_section_options(
            0,
            SectionOptions {
                min_chromatic_ratio: 0.8,
                max_chromatic_ratio: 0.2,
                ..SectionOptions::default()
            },
        );
        assert!(matches!(
            p.validate(),
            Err(HarmonyError::InvalidRatioBounds { .. })
        ));
    }
}
