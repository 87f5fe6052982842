//! Modulations: the cross-section constraint layer
//!
//! A [`Modulation`] connects two consecutive sections and posts constraints
//! specific to its kind onto their variables. The sections' shared
//! state/quality/root handles already tie any overlapping positions
//! together; what a modulation adds is the stylised entry into the new key.

use crate::error::HarmonyResult;
use crate::params::ModulationSpec;
use crate::progression::{post_cadence, ChordProgression};
use cadenza_core::{CadenceKind, Degree, ModulationKind, Tonality};
use cadenza_solver::{Lit, Operand, Space};
use log::debug;

const V: i32 = Degree::Fifth as i32;
const VI: i32 = Degree::Sixth as i32;
const VII: i32 = Degree::Seventh as i32;

/// Diatonic interval number of each semitone interval: unison, seconds,
/// thirds, the fourth, the tritone as an augmented fourth, the fifth,
/// sixths and sevenths.
const SEMITONE_TO_DEGREE_INTERVAL: [i32; 12] = [0, 1, 1, 2, 2, 3, 3, 4, 5, 5, 6, 6];

/// The scale degree of the old key that prepares the new key's leading
/// tone: one diatonic step below it.
fn secondary_dominant_target(from: Tonality, to: Tonality) -> i32 {
    let semitones = (i32::from(to.tonic()) - i32::from(from.tonic())).rem_euclid(12);
    (SEMITONE_TO_DEGREE_INTERVAL[semitones as usize] + 6) % 7
}

/// Pitch class to old-key triad quality, `-1` where the pitch class is
/// foreign to the key. Drives the "altered note" test of the alteration
/// modulation: a foreign root is altered by definition.
fn pc_to_old_triad_quality(from: Tonality) -> Vec<i32> {
    (0..12u8)
        .map(|pc| match from.pc_degree(pc) {
            Some(d) => {
                let degree = cadenza_core::ALL_DEGREES[usize::from(d)];
                i32::from(from.chord_quality(degree).triad().code())
            }
            None => -1,
        })
        .collect()
}

/// One key boundary and its posted constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulation {
    kind: ModulationKind,
    start: usize,
    end: usize,
    /// Index of the section modulated from
    from_section: usize,
    /// Index of the section modulated to
    to_section: usize,
}

impl Modulation {
    /// Post the modulation's constraints onto the two sections.
    ///
    /// The window geometry has been validated; local indices computed here
    /// always land inside the sections.
    pub fn post(
        space: &mut Space,
        spec: ModulationSpec,
        from_section: usize,
        from: &ChordProgression,
        to_section: usize,
        to: &ChordProgression,
    ) -> HarmonyResult<Self> {
        let modulation = Modulation {
            kind: spec.kind,
            start: spec.start,
            end: spec.end,
            from_section,
            to_section,
        };
        debug!(
            "modulation {} over [{}, {}]: {} -> {}",
            spec.kind,
            spec.start,
            spec.end,
            from.tonality(),
            to.tonality()
        );
        match spec.kind {
            ModulationKind::PerfectCadence => modulation.post_perfect_cadence(space, from)?,
            ModulationKind::PivotChord => modulation.post_pivot_chord(space, from, to)?,
            ModulationKind::Alteration => modulation.post_alteration(space, from, to)?,
            ModulationKind::SecondaryDominant => {
                modulation.post_secondary_dominant(space, from, to)?;
            }
        }
        Ok(modulation)
    }

    /// The old key closes with a perfect authentic cadence on its last two
    /// chords; the new key simply starts afterwards
    fn post_perfect_cadence(&self, space: &mut Space, from: &ChordProgression) -> HarmonyResult<()> {
        post_cadence(space, from, from.duration() - 2, CadenceKind::Perfect)
    }

    /// The shared window is read in both keys; the pivot itself (the old
    /// key's last chord) must be diatonic and not VII, and the window closes
    /// with a perfect cadence in the new key
    fn post_pivot_chord(
        &self,
        space: &mut Space,
        from: &ChordProgression,
        to: &ChordProgression,
    ) -> HarmonyResult<()> {
        let pivot = from.duration() - 1;
        space.post_lit(Lit::Le(from.chords()[pivot], VI))?;
        let cadence_pos = self.end - 1 - to.start();
        post_cadence(space, to, cadence_pos, CadenceKind::Perfect)
    }

    /// The old key ends plainly; the new key opens on a diatonic non-V
    /// chord whose triad differs from what the old key builds on the same
    /// root, and reaches its dominant within two chords
    fn post_alteration(
        &self,
        space: &mut Space,
        from: &ChordProgression,
        to: &ChordProgression,
    ) -> HarmonyResult<()> {
        let from_last = from.duration() - 1;
        space.post_lit(Lit::Le(from.chords()[from_last], VI))?;
        space.post_lit(Lit::Eq(from.shared().has_seventh[from_last], 0))?;

        let first = to.chords()[0];
        space.post_lit(Lit::Le(first, VII))?;
        space.post_lit(Lit::Ne(first, V))?;
        space.post_lit(Lit::Eq(to.shared().has_seventh[0], 0))?;

        // the altered-note test: quality in the new key differs from the
        // old key's triad on that pitch class (foreign pitch: trivially so)
        let old_quality = space.new_var(-1, 3)?;
        space.post_element(
            pc_to_old_triad_quality(from.tonality()),
            to.shared().root_notes[0],
            Operand::Var(old_quality),
        )?;
        space.post_lit(Lit::VarNe(old_quality, to.shared().qualities_no_seventh[0]))?;

        // the new dominant appears within two chords of the section start
        let mut alternatives = vec![Lit::Eq(to.chords()[1], V)];
        if to.duration() > 2 {
            alternatives.push(Lit::Eq(to.chords()[2], V));
        }
        space.post_clause(alternatives)?;
        Ok(())
    }

    /// The old key's chord on the window start carries the degree that
    /// prepares the new leading tone; the window end sounds the new key's
    /// dominant, which the shared position reinterprets as a V/x of the old
    /// key
    fn post_secondary_dominant(
        &self,
        space: &mut Space,
        from: &ChordProgression,
        to: &ChordProgression,
    ) -> HarmonyResult<()> {
        let target = secondary_dominant_target(from.tonality(), to.tonality());
        let lead = self.start - from.start();
        space.post_clause(vec![
            Lit::Eq(from.roots()[lead], target),
            Lit::Eq(from.thirds()[lead], target),
            Lit::Eq(from.fifths()[lead], target),
        ])?;
        space.post_lit(Lit::Eq(to.chords()[self.end - to.start()], V))?;
        Ok(())
    }

    /// How the key change is made
    pub fn kind(&self) -> ModulationKind {
        self.kind
    }

    /// First chord position of the window
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last chord position of the window
    pub fn end(&self) -> usize {
        self.end
    }

    /// Index of the section modulated from
    pub fn from_section(&self) -> usize {
        self.from_section
    }

    /// Index of the section modulated to
    pub fn to_section(&self) -> usize {
        self.to_section
    }
}
