//! Section and phrase geometry
//!
//! The modulation list fully determines where each section starts and how
//! long it lasts. A perfect-cadence boundary closes the old key and the new
//! one starts one chord later; the other three kinds start the new key *on*
//! the modulation window, so consecutive sections overlap (pivot) or abut
//! exactly (alteration, secondary dominant).

use crate::error::{HarmonyError, HarmonyResult};
use crate::params::ModulationSpec;
use cadenza_core::ModulationKind;
use log::debug;
use serde::{Deserialize, Serialize};

/// A phrase window `[start, end]`, inclusive on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// First chord of the phrase
    pub start: usize,
    /// Last chord of the phrase
    pub end: usize,
}

/// Derived section windows and phrase boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    /// First chord position of each section
    pub starts: Vec<usize>,
    /// Chord count of each section
    pub durations: Vec<usize>,
    /// Phrases, for the downstream voice-leading realiser
    pub phrases: Vec<Phrase>,
}

impl SectionLayout {
    /// Derive the layout of `size` chords cut by the given modulations.
    ///
    /// Fails when any section would end up empty or too short for the
    /// structure its closing modulation imposes.
    pub fn derive(size: usize, modulations: &[ModulationSpec]) -> HarmonyResult<Self> {
        let sections = modulations.len() + 1;
        let mut starts = vec![0i64; sections];
        let mut durations = vec![0i64; sections];

        for (i, m) in modulations.iter().enumerate() {
            let (start, end) = (m.start as i64, m.end as i64);
            let (next_start, prev_duration) = match m.kind {
                ModulationKind::PerfectCadence => (end + 1, end - starts[i] + 1),
                ModulationKind::PivotChord => (start, end - 2 - starts[i] + 1),
                ModulationKind::Alteration => (start, start - starts[i]),
                ModulationKind::SecondaryDominant => (start, start - starts[i] + 1),
            };
            starts[i + 1] = next_start;
            durations[i] = prev_duration;
        }
        durations[sections - 1] = size as i64 - starts[sections - 1];

        for i in 0..sections {
            if durations[i] < 1 || starts[i] < 0 || starts[i] + durations[i] > size as i64 {
                return Err(HarmonyError::EmptySection {
                    index: i,
                    duration: durations[i],
                });
            }
        }
        for (i, m) in modulations.iter().enumerate() {
            match m.kind {
                // the cadence needs two chords inside the closing section
                ModulationKind::PerfectCadence if durations[i] < 2 => {
                    return Err(HarmonyError::CadenceSectionTooShort {
                        index: i,
                        duration: durations[i],
                    });
                }
                // the new key must reach its dominant within two chords
                ModulationKind::Alteration if durations[i + 1] < 2 => {
                    return Err(HarmonyError::AlterationSectionTooShort {
                        index: i + 1,
                        duration: durations[i + 1],
                    });
                }
                // pivot cadence positions must fall inside the new section
                ModulationKind::PivotChord if (m.end as i64) >= starts[i + 1] + durations[i + 1] => {
                    return Err(HarmonyError::EmptySection {
                        index: i + 1,
                        duration: durations[i + 1],
                    });
                }
                ModulationKind::SecondaryDominant
                    if (m.end as i64) >= starts[i + 1] + durations[i + 1] =>
                {
                    return Err(HarmonyError::EmptySection {
                        index: i + 1,
                        duration: durations[i + 1],
                    });
                }
                _ => {}
            }
        }

        let layout = SectionLayout {
            starts: starts.iter().map(|&s| s as usize).collect(),
            durations: durations.iter().map(|&d| d as usize).collect(),
            phrases: derive_phrases(size, modulations),
        };
        debug!(
            "layout: starts {:?}, durations {:?}, {} phrases",
            layout.starts,
            layout.durations,
            layout.phrases.len()
        );
        Ok(layout)
    }

    /// Number of sections
    pub fn sections(&self) -> usize {
        self.starts.len()
    }

    /// Whether section `s` covers position `pos`
    pub fn covers(&self, s: usize, pos: usize) -> bool {
        (self.starts[s]..self.starts[s] + self.durations[s]).contains(&pos)
    }

    /// The earliest section containing `pos`.
    ///
    /// Overlapping positions (pivot windows) read in the old key; positions
    /// past every section start belong to the last one that reaches them.
    pub fn section_of(&self, pos: usize) -> usize {
        (0..self.sections())
            .find(|&s| self.covers(s, pos))
            .unwrap_or(self.sections() - 1)
    }
}

/// Phrase windows: a perfect-cadence modulation closes its phrase at the
/// window end, every other kind just before the window start.
fn derive_phrases(size: usize, modulations: &[ModulationSpec]) -> Vec<Phrase> {
    let mut phrases = Vec::with_capacity(modulations.len() + 1);
    let mut phrase_start = 0usize;
    for m in modulations {
        let phrase_end = match m.kind {
            ModulationKind::PerfectCadence => m.end,
            ModulationKind::PivotChord
            | ModulationKind::Alteration
            | ModulationKind::SecondaryDominant => m.start.saturating_sub(1),
        };
        if phrase_end >= phrase_start {
            phrases.push(Phrase {
                start: phrase_start,
                end: phrase_end,
            });
            phrase_start = phrase_end + 1;
        }
    }
    if phrase_start < size {
        phrases.push(Phrase {
            start: phrase_start,
            end: size - 1,
        });
    }
    phrases
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_core::ModulationKind::*;

    fn spec(kind: ModulationKind, start: usize, end: usize) -> ModulationSpec {
        ModulationSpec::new(kind, start, end)
    }

    #[test]
    fn test_single_section() {
        let layout = SectionLayout::derive(4, &[]).unwrap();
        assert_eq!(layout.starts, vec![0]);
        assert_eq!(layout.durations, vec![4]);
        assert_eq!(layout.phrases, vec![Phrase { start: 0, end: 3 }]);
    }

    #[test]
    fn test_perfect_cadence_layout() {
        // sections abut with a one-chord gap after the cadence window
        let layout = SectionLayout::derive(10, &[spec(PerfectCadence, 6, 7)]).unwrap();
        assert_eq!(layout.starts, vec![0, 8]);
        assert_eq!(layout.durations, vec![8, 2]);
        assert_eq!(
            layout.phrases,
            vec![Phrase { start: 0, end: 7 }, Phrase { start: 8, end: 9 }]
        );
    }

    #[test]
    fn test_pivot_layout_overlaps() {
        let layout = SectionLayout::derive(10, &[spec(PivotChord, 4, 7)]).unwrap();
        assert_eq!(layout.starts, vec![0, 4]);
        assert_eq!(layout.durations, vec![6, 6]);
        // overlap region is 4..=5
        assert!(layout.covers(0, 5) && layout.covers(1, 5));
        assert_eq!(layout.section_of(5), 0);
        assert_eq!(layout.section_of(6), 1);
        assert_eq!(
            layout.phrases,
            vec![Phrase { start: 0, end: 3 }, Phrase { start: 4, end: 9 }]
        );
    }

    #[test]
    fn test_alteration_layout_abuts() {
        let layout = SectionLayout::derive(6, &[spec(Alteration, 3, 4)]).unwrap();
        assert_eq!(layout.starts, vec![0, 3]);
        assert_eq!(layout.durations, vec![3, 3]);
    }

    #[test]
    fn test_secondary_dominant_layout_shares_one_chord() {
        let layout = SectionLayout::derive(6, &[spec(SecondaryDominant, 3, 4)]).unwrap();
        assert_eq!(layout.starts, vec![0, 3]);
        assert_eq!(layout.durations, vec![4, 3]);
        assert!(layout.covers(0, 3) && layout.covers(1, 3));
    }

    #[test]
    fn test_three_sections() {
        let layout = SectionLayout::derive(
            14,
            &[spec(PerfectCadence, 4, 5), spec(SecondaryDominant, 9, 10)],
        )
        .unwrap();
        assert_eq!(layout.starts, vec![0, 6, 9]);
        assert_eq!(layout.durations, vec![6, 4, 5]);
        assert_eq!(
            layout.phrases,
            vec![
                Phrase { start: 0, end: 5 },
                Phrase { start: 6, end: 8 },
                Phrase { start: 9, end: 13 }
            ]
        );
    }

    #[test]
    fn test_degenerate_sections_are_rejected() {
        // the second section would be empty
        assert!(matches!(
            SectionLayout::derive(8, &[spec(PerfectCadence, 6, 7)]),
            Err(HarmonyError::EmptySection { .. })
        ));
        // alteration at the very start leaves the old key no chord
        assert!(matches!(
            SectionLayout::derive(6, &[spec(Alteration, 0, 1)]),
            Err(HarmonyError::EmptySection { .. })
        ));
        // back-to-back alterations leave the middle key no room for its dominant
        assert!(matches!(
            SectionLayout::derive(8, &[spec(Alteration, 3, 4), spec(Alteration, 4, 5)]),
            Err(HarmonyError::AlterationSectionTooShort { .. })
        ));
    }
}
