//! Chord progressions: the intra-key constraint layer
//!
//! One [`ChordProgression`] per key section. It owns the degree variables of
//! its window plus the auxiliary bass/chromatic/note-function variables, and
//! holds handles into the piece-wide state/quality/root arrays for the same
//! window — handle identity is what lets two overlapping sections constrain
//! the same chord from two keys at once.

use crate::error::HarmonyResult;
use crate::params::SectionOptions;
use cadenza_core::{tables, CadenceKind, ChordQuality, ChordState, Degree, Mode, Tonality};
use cadenza_solver::{IntVar, Lit, Operand, Space};
use log::debug;
use smallvec::SmallVec;

const I: i32 = Degree::First as i32;
const IV: i32 = Degree::Fourth as i32;
const V: i32 = Degree::Fifth as i32;
const VI: i32 = Degree::Sixth as i32;
const VII: i32 = Degree::Seventh as i32;
const VDA: i32 = Degree::FifthAppoggiatura as i32;
const V_OF_II: i32 = Degree::FiveOfTwo as i32;
const V_OF_VII: i32 = Degree::FiveOfSeven as i32;
const B_II: i32 = Degree::FlatTwo as i32;

const MAJOR: i32 = ChordQuality::Major as i32;
const DOM7: i32 = ChordQuality::DominantSeventh as i32;
const DIM7: i32 = ChordQuality::DiminishedSeventh as i32;
const MIN9_DOM: i32 = ChordQuality::MinorNinthDominant as i32;

const FUND: i32 = ChordState::Fundamental as i32;
const FIRST_INV: i32 = ChordState::FirstInversion as i32;
const THIRD_INV: i32 = ChordState::ThirdInversion as i32;

fn table_i32(table: &[u8]) -> Vec<i32> {
    table.iter().map(|&x| i32::from(x)).collect()
}

/// Column `col` of the bass table, indexed by degree: the scale degree of
/// one chord tone (root/third/fifth/seventh) per chord degree
fn chord_tone_table(col: usize) -> Vec<i32> {
    (0..cadenza_core::DEGREE_COUNT)
        .map(|d| i32::from(tables::BASS_BY_DEGREE_AND_STATE[d * cadenza_core::STATE_COUNT + col]))
        .collect()
}

/// Shared piece-array handles for one section window.
#[derive(Debug, Clone)]
pub struct SharedSlices {
    /// Inversion states, one per chord of the window
    pub states: Vec<IntVar>,
    /// Chord qualities
    pub qualities: Vec<IntVar>,
    /// Triad projection of the qualities
    pub qualities_no_seventh: Vec<IntVar>,
    /// Root pitch classes
    pub root_notes: Vec<IntVar>,
    /// Seventh-presence booleans
    pub has_seventh: Vec<IntVar>,
}

/// One key section of the piece and its posted constraints.
#[derive(Debug, Clone)]
pub struct ChordProgression {
    start: usize,
    duration: usize,
    tonality: Tonality,
    min_chromatic: i32,
    max_chromatic: i32,
    min_seventh: i32,
    max_seventh: i32,
    /// Owned: chord degrees of the window
    chords: Vec<IntVar>,
    /// Owned: bass scale degrees
    bass_degrees: Vec<IntVar>,
    /// Owned: chromaticism booleans
    is_chromatic: Vec<IntVar>,
    /// Owned: scale degree of each chord tone, for seventh preparation
    roots: Vec<IntVar>,
    thirds: Vec<IntVar>,
    fifths: Vec<IntVar>,
    sevenths: Vec<IntVar>,
    shared: SharedSlices,
}

impl ChordProgression {
    /// Create the section's variables and post its constraints.
    ///
    /// `shared` holds the piece-array handles for exactly this window;
    /// `is_last` marks the final section of the piece, which must close on
    /// a seventh-free diatonic chord other than VII.
    pub fn new(
        space: &mut Space,
        start: usize,
        duration: usize,
        tonality: Tonality,
        shared: SharedSlices,
        options: &SectionOptions,
        is_last: bool,
    ) -> HarmonyResult<Self> {
        let min_chromatic = (options.min_chromatic_ratio * duration as f64) as i32;
        let max_chromatic = (options.max_chromatic_ratio * duration as f64) as i32;
        let min_seventh = (options.min_seventh_ratio * duration as f64) as i32;
        let max_seventh = (options.max_seventh_ratio * duration as f64) as i32;

        let new_vars = |space: &mut Space, lo: i32, hi: i32| -> HarmonyResult<Vec<IntVar>> {
            (0..duration)
                .map(|_| space.new_var(lo, hi).map_err(Into::into))
                .collect()
        };
        let chords = new_vars(space, 0, cadenza_core::DEGREE_COUNT as i32 - 1)?;
        let bass_degrees = new_vars(space, 0, 6)?;
        let is_chromatic = new_vars(space, 0, 1)?;
        let roots = new_vars(space, 0, 6)?;
        let thirds = new_vars(space, 0, 6)?;
        let fifths = new_vars(space, 0, 6)?;
        let sevenths = new_vars(space, 0, 6)?;

        let progression = ChordProgression {
            start,
            duration,
            tonality,
            min_chromatic,
            max_chromatic,
            min_seventh,
            max_seventh,
            chords,
            bass_degrees,
            is_chromatic,
            roots,
            thirds,
            fifths,
            sevenths,
            shared,
        };
        progression.post_tonal_progression(space)?;
        if is_last {
            progression.post_final_close(space)?;
        }
        debug!(
            "section {} at {} for {} chords: chromatic [{}, {}], sevenths [{}, {}]",
            tonality,
            start,
            duration,
            min_chromatic,
            max_chromatic,
            min_seventh,
            max_seventh
        );
        Ok(progression)
    }

    /// All intra-key rules of one section
    fn post_tonal_progression(&self, space: &mut Space) -> HarmonyResult<()> {
        self.post_chord_transitions(space)?;
        self.post_chord_tones(space)?;
        self.post_qualities(space)?;
        self.post_states(space)?;
        self.post_states_vs_sevenths(space)?;
        self.post_root_notes(space)?;
        self.post_bass_degrees(space)?;
        self.post_chromatic_count(space)?;
        self.post_seventh_count(space)?;
        self.post_appoggiatura_resolution(space)?;
        self.post_flat_two_inversion(space)?;
        self.post_repeated_degree_rules(space)?;
        self.post_dominant_bass_motion(space)?;
        self.post_seventh_preparation(space)?;
        self.post_mode_exclusions(space)?;
        self.post_diminished_seventh_inversion(space)?;
        Ok(())
    }

    /// Degree successions follow the transition table
    fn post_chord_transitions(&self, space: &mut Space) -> HarmonyResult<()> {
        let table = table_i32(&tables::TONAL_TRANSITIONS);
        for i in 0..self.duration.saturating_sub(1) {
            space.post_element2d(
                table.clone(),
                cadenza_core::DEGREE_COUNT,
                self.chords[i],
                self.chords[i + 1],
                Operand::Const(1),
            )?;
        }
        Ok(())
    }

    /// Root/third/fifth/seventh scale degrees follow the chord degree
    fn post_chord_tones(&self, space: &mut Space) -> HarmonyResult<()> {
        for (col, tones) in [
            (0, &self.roots),
            (1, &self.thirds),
            (2, &self.fifths),
            (3, &self.sevenths),
        ] {
            let table = chord_tone_table(col);
            for i in 0..self.duration {
                space.post_element(table.clone(), self.chords[i], Operand::Var(tones[i]))?;
            }
        }
        Ok(())
    }

    /// Qualities follow the degree, per the mode's table
    fn post_qualities(&self, space: &mut Space) -> HarmonyResult<()> {
        let table = table_i32(tables::degree_qualities(self.tonality.mode()));
        for i in 0..self.duration {
            space.post_element2d(
                table.clone(),
                cadenza_core::QUALITY_COUNT,
                self.chords[i],
                self.shared.qualities[i],
                Operand::Const(1),
            )?;
        }
        Ok(())
    }

    /// States follow the degree, per the mode's table
    fn post_states(&self, space: &mut Space) -> HarmonyResult<()> {
        let table = table_i32(tables::degree_states(self.tonality.mode()));
        for i in 0..self.duration {
            space.post_element2d(
                table.clone(),
                cadenza_core::STATE_COUNT,
                self.chords[i],
                self.shared.states[i],
                Operand::Const(1),
            )?;
        }
        Ok(())
    }

    /// A chord without a seventh cannot invert past the fifth; a chord
    /// without a ninth cannot invert past the seventh
    fn post_states_vs_sevenths(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration {
            let state = self.shared.states[i];
            space.post_implication(
                &[Lit::Eq(self.shared.has_seventh[i], 0)],
                &[Lit::Le(state, THIRD_INV - 1)],
            )?;
            space.post_implication(
                &[Lit::Le(self.shared.qualities[i], DOM7 - 1)],
                &[Lit::Le(state, THIRD_INV - 1)],
            )?;
            space.post_implication(
                &[Lit::Le(self.shared.qualities[i], MIN9_DOM - 1)],
                &[Lit::Le(state, THIRD_INV)],
            )?;
        }
        Ok(())
    }

    /// Root pitch classes follow the degree in this key
    fn post_root_notes(&self, space: &mut Space) -> HarmonyResult<()> {
        let tonic_notes: Vec<i32> = cadenza_core::ALL_DEGREES
            .iter()
            .map(|&d| i32::from(self.tonality.degree_note(d)))
            .collect();
        for i in 0..self.duration {
            space.post_element(
                tonic_notes.clone(),
                self.chords[i],
                Operand::Var(self.shared.root_notes[i]),
            )?;
        }
        Ok(())
    }

    /// The bass scale degree is a table function of (degree, state)
    fn post_bass_degrees(&self, space: &mut Space) -> HarmonyResult<()> {
        let table = table_i32(&tables::BASS_BY_DEGREE_AND_STATE);
        for i in 0..self.duration {
            space.post_element2d(
                table.clone(),
                cadenza_core::STATE_COUNT,
                self.chords[i],
                self.shared.states[i],
                Operand::Var(self.bass_degrees[i]),
            )?;
        }
        Ok(())
    }

    /// Chromaticism booleans and their section count.
    ///
    /// A chord is chromatic iff its degree is a secondary dominant, bII or
    /// the augmented sixth — or it is V carrying a diminished seventh.
    fn post_chromatic_count(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration {
            let chord = self.chords[i];
            let quality = self.shared.qualities[i];
            let flag = self.is_chromatic[i];
            space.post_implication(&[Lit::Ge(chord, V_OF_II)], &[Lit::Eq(flag, 1)])?;
            space.post_implication(
                &[Lit::Le(chord, VDA), Lit::Ne(chord, V)],
                &[Lit::Eq(flag, 0)],
            )?;
            space.post_implication(
                &[Lit::Eq(chord, V), Lit::Eq(quality, DIM7)],
                &[Lit::Eq(flag, 1)],
            )?;
            space.post_implication(
                &[Lit::Eq(chord, V), Lit::Ne(quality, DIM7)],
                &[Lit::Eq(flag, 0)],
            )?;
        }
        space.post_sum(
            self.is_chromatic.clone(),
            self.min_chromatic,
            self.max_chromatic,
        )?;
        Ok(())
    }

    /// Seventh booleans and their section count
    fn post_seventh_count(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration {
            let quality = self.shared.qualities[i];
            let flag = self.shared.has_seventh[i];
            space.post_implication(&[Lit::Ge(quality, DOM7)], &[Lit::Eq(flag, 1)])?;
            space.post_implication(&[Lit::Le(quality, DOM7 - 1)], &[Lit::Eq(flag, 0)])?;
        }
        space.post_sum(
            self.shared.has_seventh.clone(),
            self.min_seventh,
            self.max_seventh,
        )?;
        Ok(())
    }

    /// The fifth-degree appoggiatura resolves onto a fundamental V that is
    /// major or dominant
    fn post_appoggiatura_resolution(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration.saturating_sub(1) {
            space.post_implication(
                &[Lit::Eq(self.chords[i], VDA)],
                &[
                    Lit::Eq(self.shared.states[i + 1], FUND),
                    Lit::In(
                        self.shared.qualities[i + 1],
                        SmallVec::from_slice(&[MAJOR, DOM7]),
                    ),
                ],
            )?;
        }
        Ok(())
    }

    /// The Neapolitan sits in first inversion
    fn post_flat_two_inversion(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration {
            space.post_implication(
                &[Lit::Eq(self.chords[i], B_II)],
                &[Lit::Eq(self.shared.states[i], FIRST_INV)],
            )?;
        }
        Ok(())
    }

    /// Two successive chords on one degree must differ in state or quality,
    /// and a degree never sounds three times in a row
    fn post_repeated_degree_rules(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration.saturating_sub(1) {
            space.post_clause(vec![
                Lit::VarNe(self.chords[i], self.chords[i + 1]),
                Lit::VarNe(self.shared.states[i], self.shared.states[i + 1]),
                Lit::VarNe(self.shared.qualities[i], self.shared.qualities[i + 1]),
            ])?;
        }
        for i in 0..self.duration.saturating_sub(2) {
            space.post_clause(vec![
                Lit::VarNe(self.chords[i], self.chords[i + 1]),
                Lit::VarNe(self.chords[i + 2], self.chords[i]),
            ])?;
        }
        Ok(())
    }

    /// Tritone resolution by bass step.
    ///
    /// A dominant-functioning chord in first inversion pushes the bass up a
    /// diatonic step; in third inversion it pulls the bass down one.
    fn post_dominant_bass_motion(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration.saturating_sub(1) {
            let chord = self.chords[i];
            let quality = self.shared.qualities[i];
            let state = self.shared.states[i];
            let dominant_v = [
                Lit::Eq(chord, V),
                Lit::In(quality, SmallVec::from_slice(&[MAJOR, DOM7, DIM7])),
            ];
            let secondary = [Lit::Ge(chord, V_OF_II), Lit::Le(chord, V_OF_VII)];
            for (delta, inv) in [(1, FIRST_INV), (-1, THIRD_INV)] {
                let step = Lit::VarEqShiftMod {
                    x: self.bass_degrees[i + 1],
                    y: self.bass_degrees[i],
                    delta,
                    modulus: 7,
                };
                let mut conds = dominant_v.to_vec();
                conds.push(Lit::Eq(state, inv));
                space.post_implication(&conds, &[step.clone()])?;
                let mut conds = secondary.to_vec();
                conds.push(Lit::Eq(state, inv));
                space.post_implication(&conds, &[step])?;
            }
        }
        Ok(())
    }

    /// A non-dominant seventh on a diatonic degree must be prepared: the
    /// dissonant note already sounds in the previous chord
    fn post_seventh_preparation(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 1..self.duration {
            space.post_implication_any(
                &[
                    Lit::Eq(self.shared.has_seventh[i], 1),
                    Lit::Ne(self.shared.qualities[i], DOM7),
                    Lit::Le(self.chords[i], VII),
                ],
                &[
                    Lit::VarEq(self.sevenths[i], self.roots[i - 1]),
                    Lit::VarEq(self.sevenths[i], self.thirds[i - 1]),
                    Lit::VarEq(self.sevenths[i], self.fifths[i - 1]),
                ],
            )?;
        }
        Ok(())
    }

    /// The dominant of the leading-tone degree only exists in minor
    fn post_mode_exclusions(&self, space: &mut Space) -> HarmonyResult<()> {
        if self.tonality.mode() == Mode::Major {
            for i in 0..self.duration {
                space.post_lit(Lit::Ne(self.chords[i], V_OF_VII))?;
            }
        }
        Ok(())
    }

    /// Diminished sevenths outside VII sound in first inversion
    fn post_diminished_seventh_inversion(&self, space: &mut Space) -> HarmonyResult<()> {
        for i in 0..self.duration {
            space.post_implication(
                &[
                    Lit::Eq(self.shared.qualities[i], DIM7),
                    Lit::Ne(self.chords[i], VII),
                ],
                &[Lit::Eq(self.shared.states[i], FIRST_INV)],
            )?;
        }
        Ok(())
    }

    /// The piece closes on a seventh-free diatonic chord other than VII
    fn post_final_close(&self, space: &mut Space) -> HarmonyResult<()> {
        let last = self.duration - 1;
        space.post_lit(Lit::Le(self.chords[last], VI))?;
        space.post_lit(Lit::Eq(self.shared.has_seventh[last], 0))?;
        Ok(())
    }

    /// First chord position in the piece
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of chords
    pub fn duration(&self) -> usize {
        self.duration
    }

    /// The section's key
    pub fn tonality(&self) -> Tonality {
        self.tonality
    }

    /// Degree variables (local indexing)
    pub fn chords(&self) -> &[IntVar] {
        &self.chords
    }

    /// Bass scale-degree variables
    pub fn bass_degrees(&self) -> &[IntVar] {
        &self.bass_degrees
    }

    /// Chromaticism booleans
    pub fn is_chromatic(&self) -> &[IntVar] {
        &self.is_chromatic
    }

    /// Root scale degrees of the chords
    pub fn roots(&self) -> &[IntVar] {
        &self.roots
    }

    /// Third scale degrees of the chords
    pub fn thirds(&self) -> &[IntVar] {
        &self.thirds
    }

    /// Fifth scale degrees of the chords
    pub fn fifths(&self) -> &[IntVar] {
        &self.fifths
    }

    /// Seventh scale degrees of the chords
    pub fn sevenths(&self) -> &[IntVar] {
        &self.sevenths
    }

    /// Shared piece-array handles of this window
    pub fn shared(&self) -> &SharedSlices {
        &self.shared
    }
}

/// Post a cadence of the given kind at local position `pos` of a section.
///
/// Perfect and deceptive cadences span `pos` and `pos + 1`; a half cadence
/// constrains `pos` alone.
pub fn post_cadence(
    space: &mut Space,
    progression: &ChordProgression,
    pos: usize,
    kind: CadenceKind,
) -> HarmonyResult<()> {
    let chords = progression.chords();
    let shared = progression.shared();
    match kind {
        CadenceKind::Perfect => {
            space.post_lit(Lit::Eq(chords[pos], V))?;
            space.post_lit(Lit::Eq(shared.states[pos], FUND))?;
            space.post_lit(Lit::Eq(chords[pos + 1], I))?;
            space.post_lit(Lit::Eq(shared.states[pos + 1], FUND))?;
            space.post_lit(Lit::Eq(shared.has_seventh[pos + 1], 0))?;
        }
        CadenceKind::Plagal => {
            space.post_lit(Lit::Eq(chords[pos], IV))?;
            space.post_lit(Lit::Eq(shared.states[pos], FUND))?;
            space.post_lit(Lit::Eq(chords[pos + 1], I))?;
            space.post_lit(Lit::Eq(shared.states[pos + 1], FUND))?;
        }
        CadenceKind::Half => {
            space.post_lit(Lit::Eq(chords[pos], V))?;
            space.post_lit(Lit::Eq(shared.states[pos], FUND))?;
        }
        CadenceKind::Deceptive => {
            space.post_lit(Lit::Eq(chords[pos], V))?;
            space.post_lit(Lit::Eq(shared.states[pos], FUND))?;
            space.post_lit(Lit::Eq(chords[pos + 1], VI))?;
            space.post_lit(Lit::Eq(shared.states[pos + 1], FUND))?;
        }
    }
    Ok(())
}
