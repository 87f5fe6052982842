//! The tonal piece: shared arrays, section and modulation composition
//!
//! [`TonalPiece`] owns the whole-piece variable arrays and composes the
//! per-section [`ChordProgression`]s and per-boundary [`Modulation`]s over
//! them. Sections receive handle slices of the shared arrays, so an
//! overlapping window is constrained by both neighbouring keys without any
//! copying. The piece also posts the branching order: section degrees
//! first (seeded random values), then states, then qualities.

use crate::error::{HarmonyError, HarmonyResult};
use crate::geometry::SectionLayout;
use crate::modulation::Modulation;
use crate::params::PieceParameters;
use crate::progression::{ChordProgression, SharedSlices};
use crate::solution::{ChordAssignment, ModulationSummary, PieceSolution, SectionSolution};
use cadenza_core::{tables, CadenceKind, ChordQuality, ChordState, Degree};
use cadenza_solver::{IntVar, Operand, SearchStats, Space, ValSel, VarSel};
use log::debug;

/// A fully constructed constraint model of one piece.
#[derive(Debug, Clone)]
pub struct TonalPiece {
    params: PieceParameters,
    layout: SectionLayout,
    space: Space,
    states: Vec<IntVar>,
    qualities: Vec<IntVar>,
    qualities_no_seventh: Vec<IntVar>,
    root_notes: Vec<IntVar>,
    has_seventh: Vec<IntVar>,
    progressions: Vec<ChordProgression>,
    modulations: Vec<Modulation>,
}

impl TonalPiece {
    /// Validate the parameters and build the whole model.
    pub fn new(params: &PieceParameters, seed: u64) -> HarmonyResult<Self> {
        params.validate()?;
        let layout = SectionLayout::derive(params.size, &params.modulations)?;
        let size = params.size;

        let mut space = Space::with_seed(seed);
        let array = |space: &mut Space, lo: i32, hi: i32| -> HarmonyResult<Vec<IntVar>> {
            (0..size)
                .map(|_| space.new_var(lo, hi).map_err(Into::into))
                .collect()
        };
        let states = array(&mut space, 0, ChordState::ThirdInversion as i32)?;
        let qualities = array(&mut space, 0, cadenza_core::QUALITY_COUNT as i32 - 1)?;
        let qualities_no_seventh = array(&mut space, 0, ChordQuality::Augmented as i32)?;
        let root_notes = array(&mut space, 0, 11)?;
        let has_seventh = array(&mut space, 0, 1)?;

        // piece-wide triad projection of the qualities
        let triad_table: Vec<i32> = tables::QUALITY_TO_TRIAD.iter().map(|&q| i32::from(q)).collect();
        for i in 0..size {
            space.post_element(
                triad_table.clone(),
                qualities[i],
                Operand::Var(qualities_no_seventh[i]),
            )?;
        }

        let sections = layout.sections();
        let mut progressions = Vec::with_capacity(sections);
        for s in 0..sections {
            let (start, duration) = (layout.starts[s], layout.durations[s]);
            let window = start..start + duration;
            let shared = SharedSlices {
                states: states[window.clone()].to_vec(),
                qualities: qualities[window.clone()].to_vec(),
                qualities_no_seventh: qualities_no_seventh[window.clone()].to_vec(),
                root_notes: root_notes[window.clone()].to_vec(),
                has_seventh: has_seventh[window].to_vec(),
            };
            progressions.push(ChordProgression::new(
                &mut space,
                start,
                duration,
                params.tonalities[s],
                shared,
                &params.section_options[s],
                s == sections - 1,
            )?);
        }

        let mut modulations = Vec::with_capacity(params.modulations.len());
        for (i, spec) in params.modulations.iter().enumerate() {
            modulations.push(Modulation::post(
                &mut space,
                *spec,
                i,
                &progressions[i],
                i + 1,
                &progressions[i + 1],
            )?);
        }

        // branching: degrees per section (random values, seeded), then
        // states, then qualities, then whatever auxiliaries remain
        for progression in &progressions {
            space.branch(
                progression.chords().to_vec(),
                VarSel::SmallestDomain,
                ValSel::Random,
            )?;
        }
        space.branch(states.clone(), VarSel::SmallestDomain, ValSel::Min)?;
        space.branch(qualities.clone(), VarSel::SmallestDomain, ValSel::Min)?;
        let all: Vec<IntVar> = (0..space.num_vars()).map(IntVar::from_index).collect();
        space.branch(all, VarSel::SmallestDomain, ValSel::Min)?;

        debug!(
            "piece model: {} chords, {} sections, {} modulations, {} variables",
            size,
            sections,
            modulations.len(),
            space.num_vars()
        );
        Ok(TonalPiece {
            params: params.clone(),
            layout,
            space,
            states,
            qualities,
            qualities_no_seventh,
            root_notes,
            has_seventh,
            progressions,
            modulations,
        })
    }

    /// The root space of the model, ready for an engine
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// The derived section geometry
    pub fn layout(&self) -> &SectionLayout {
        &self.layout
    }

    /// The validated input parameters
    pub fn params(&self) -> &PieceParameters {
        &self.params
    }

    /// Triad-projection variables, one per position
    pub fn qualities_no_seventh(&self) -> &[IntVar] {
        &self.qualities_no_seventh
    }

    /// Post an extra cadence of the given kind at a local position of one
    /// section, before the model is handed to an engine.
    ///
    /// Perfect, plagal and deceptive cadences need `pos + 1` inside the
    /// section; a half cadence only `pos`.
    pub fn post_cadence(
        &mut self,
        section: usize,
        pos: usize,
        kind: CadenceKind,
    ) -> HarmonyResult<()> {
        let Some(progression) = self.progressions.get(section) else {
            return Err(HarmonyError::CadenceOutOfRange { section, pos });
        };
        let span = match kind {
            CadenceKind::Half => 1,
            _ => 2,
        };
        if pos + span > progression.duration() {
            return Err(HarmonyError::CadenceOutOfRange { section, pos });
        }
        crate::progression::post_cadence(&mut self.space, progression, pos, kind)
    }

    /// Read a solved space back into a [`PieceSolution`].
    ///
    /// Every variable of a solution space is assigned; a missing or
    /// out-of-range code here is a model bug, not a user error.
    pub fn extract(&self, solved: &Space, stats: SearchStats) -> PieceSolution {
        let value = |var: IntVar| -> i32 {
            solved
                .value(var)
                .expect("solution space has an unassigned variable")
        };
        let degree_at = |var: IntVar| -> Degree {
            Degree::from_code(value(var)).expect("solved degree out of range")
        };
        let state_at = |var: IntVar| -> ChordState {
            ChordState::from_code(value(var)).expect("solved state out of range")
        };
        let quality_at = |var: IntVar| -> ChordQuality {
            ChordQuality::from_code(value(var)).expect("solved quality out of range")
        };

        let sections: Vec<SectionSolution> = self
            .progressions
            .iter()
            .map(|progression| SectionSolution {
                start: progression.start(),
                duration: progression.duration(),
                tonality: progression.tonality(),
                degrees: progression.chords().iter().map(|&v| degree_at(v)).collect(),
                states: progression
                    .shared()
                    .states
                    .iter()
                    .map(|&v| state_at(v))
                    .collect(),
                qualities: progression
                    .shared()
                    .qualities
                    .iter()
                    .map(|&v| quality_at(v))
                    .collect(),
            })
            .collect();

        let chords: Vec<ChordAssignment> = (0..self.params.size)
            .map(|pos| {
                let s = self.layout.section_of(pos);
                let local = pos - self.layout.starts[s];
                let progression = &self.progressions[s];
                ChordAssignment {
                    degree: sections[s].degrees[local],
                    state: state_at(self.states[pos]),
                    quality: quality_at(self.qualities[pos]),
                    root_note: value(self.root_notes[pos]) as u8,
                    bass_degree: value(progression.bass_degrees()[local]) as u8,
                    has_seventh: value(self.has_seventh[pos]) == 1,
                    is_chromatic: value(progression.is_chromatic()[local]) == 1,
                }
            })
            .collect();

        let modulations: Vec<ModulationSummary> = self
            .modulations
            .iter()
            .map(|m| ModulationSummary {
                kind: m.kind(),
                start: m.start(),
                end: m.end(),
                from: self.params.tonalities[m.from_section()],
                to: self.params.tonalities[m.to_section()],
            })
            .collect();

        PieceSolution {
            chords,
            sections,
            modulations,
            phrases: self.layout.phrases.clone(),
            stats,
        }
    }
}
