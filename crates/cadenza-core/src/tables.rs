//! Static rule tables of tonal harmony
//!
//! Row-major rectangles indexed by degree code (rows) and state/quality code
//! (columns). Together they define the whole "theory" the constraint layer
//! consumes: legal degree successions, legal inversions and qualities per
//! degree, the bass scale degree per (degree, state), and the projection of
//! qualities onto triad classes.

use crate::degree::{Degree, DEGREE_COUNT};
use crate::quality::{ChordQuality, ChordState, QUALITY_COUNT, STATE_COUNT};
use crate::tonality::Mode;

/// Legal degree successions, `1` iff row degree may be followed by column
/// degree.
///
/// Encodes the standard functional rules: tension chords resolve (V, V/X,
/// VII), chords reaching V also reach the fifth-degree appoggiatura, chords
/// reaching X also reach V/X, and bII and the augmented sixth resolve to V
/// or its appoggiatura.
#[rustfmt::skip]
pub const TONAL_TRANSITIONS: [u8; DEGREE_COUNT * DEGREE_COUNT] = [
//   I    II   III  IV   V    VI   VII  Vda  V/II V/III V/IV V/V V/VI V/VII bII  Aug6
     1,   1,   1,   1,   1,   1,   1,   0,   1,   1,   1,   1,   1,   1,   1,   1,   // I
     1,   1,   0,   1,   1,   0,   0,   1,   0,   0,   1,   1,   0,   0,   0,   0,   // II
     0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   1,   0,   0,   0,   // III
     1,   1,   0,   1,   1,   0,   1,   1,   1,   0,   0,   1,   0,   1,   1,   1,   // IV
     1,   0,   0,   1,   1,   1,   0,   0,   0,   0,   1,   0,   1,   0,   0,   0,   // V
     0,   1,   0,   1,   1,   0,   0,   1,   1,   0,   1,   1,   0,   0,   1,   1,   // VI
     1,   0,   1,   0,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   // VII
     0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   // Vda
     0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   // V/II
     0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   1,   0,   0,   0,   // V/III
     0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   1,   0,   0,   // V/IV
     0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   // V/V
     0,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   // V/VI
     0,   0,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   0,   0,   // V/VII
     0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   // bII
     0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   // Aug6
];

/// Legal inversion states per degree, `1` iff the row degree may take the
/// column state.
#[rustfmt::skip]
pub const DEGREE_STATES: [u8; DEGREE_COUNT * STATE_COUNT] = [
//   fund 1st  2nd  3rd  4th
     1,   1,   0,   0,   0,   // I
     1,   1,   0,   0,   0,   // II
     1,   0,   0,   0,   0,   // III
     1,   1,   0,   0,   0,   // IV
     1,   1,   1,   1,   0,   // V
     1,   0,   0,   0,   0,   // VI
     1,   1,   1,   0,   0,   // VII
     0,   0,   1,   0,   0,   // Vda
     1,   1,   1,   1,   0,   // V/II
     1,   1,   1,   1,   0,   // V/III
     1,   1,   1,   1,   0,   // V/IV
     1,   1,   1,   1,   0,   // V/V
     1,   1,   1,   1,   0,   // V/VI
     1,   1,   1,   1,   0,   // V/VII
     1,   1,   0,   0,   0,   // bII
     1,   0,   0,   0,   0,   // Aug6
];

/// Legal qualities per degree in a major key.
#[rustfmt::skip]
pub const MAJOR_DEGREE_QUALITIES: [u8; DEGREE_COUNT * QUALITY_COUNT] = [
//   M    m    dim  aug  aug6 7    M7   m7   dim7 hd7  mM7  M9   m9
     1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   // I
     0,   1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   // II
     0,   1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   // III
     1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   // IV
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   1,   0,   // V
     0,   1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   // VI
     0,   0,   1,   0,   0,   0,   0,   0,   0,   1,   0,   0,   0,   // VII
     1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   // Vda
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/II
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/III
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/IV
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/V
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/VI
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/VII
     1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   // bII
     0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   // Aug6
];

/// Legal qualities per degree in a minor key.
#[rustfmt::skip]
pub const MINOR_DEGREE_QUALITIES: [u8; DEGREE_COUNT * QUALITY_COUNT] = [
//   M    m    dim  aug  aug6 7    M7   m7   dim7 hd7  mM7  M9   m9
     0,   1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   // I
     0,   0,   1,   0,   0,   0,   0,   0,   0,   1,   0,   0,   0,   // II
     1,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   0,   0,   // III
     0,   1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   // IV
     1,   1,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   1,   // V
     1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   // VI
     1,   0,   1,   0,   0,   0,   0,   0,   1,   0,   0,   0,   0,   // VII
     0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   // Vda
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/II
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/III
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/IV
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/V
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/VI
     1,   0,   0,   0,   0,   1,   0,   0,   1,   0,   0,   0,   0,   // V/VII
     1,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   // bII
     0,   0,   0,   0,   1,   0,   0,   0,   0,   0,   0,   0,   0,   // Aug6
];

/// Scale degree sounding in the bass for each (degree, state) pair.
///
/// Columns are root/third/fifth/seventh/ninth of the chord, i.e. fundamental
/// state through fourth inversion. Entries are diatonic scale degrees 0..=6.
/// The augmented-sixth row is irregular: its "seventh" slot is the fourth
/// degree (the augmented-sixth interval partner) and its "ninth" slot the
/// second.
#[rustfmt::skip]
pub const BASS_BY_DEGREE_AND_STATE: [u8; DEGREE_COUNT * STATE_COUNT] = [
//   fund 1st  2nd  3rd  4th
     0,   2,   4,   6,   1,   // I
     1,   3,   5,   0,   2,   // II
     2,   4,   6,   1,   3,   // III
     3,   5,   0,   2,   4,   // IV
     4,   6,   1,   3,   5,   // V
     5,   0,   2,   4,   6,   // VI
     6,   1,   3,   5,   0,   // VII
     0,   2,   4,   6,   1,   // Vda
     5,   0,   2,   4,   6,   // V/II
     6,   1,   3,   5,   0,   // V/III
     0,   2,   4,   6,   1,   // V/IV
     1,   3,   5,   0,   2,   // V/V
     2,   4,   6,   1,   3,   // V/VI
     3,   5,   0,   2,   4,   // V/VII
     1,   3,   5,   0,   2,   // bII
     5,   0,   2,   3,   1,   // Aug6
];

/// Projection of each quality onto its triad class, indexed by quality code.
pub const QUALITY_TO_TRIAD: [u8; QUALITY_COUNT] = [0, 1, 2, 3, 3, 0, 0, 1, 2, 2, 1, 0, 0];

/// Whether degree `a` may be followed by degree `b`
pub fn transition_allowed(a: Degree, b: Degree) -> bool {
    TONAL_TRANSITIONS[a.code() as usize * DEGREE_COUNT + b.code() as usize] == 1
}

/// Whether degree `d` may appear in state `s`
pub fn state_allowed(d: Degree, s: ChordState) -> bool {
    DEGREE_STATES[d.code() as usize * STATE_COUNT + s.code() as usize] == 1
}

/// The quality table for a mode
pub fn degree_qualities(mode: Mode) -> &'static [u8; DEGREE_COUNT * QUALITY_COUNT] {
    match mode {
        Mode::Major => &MAJOR_DEGREE_QUALITIES,
        Mode::Minor => &MINOR_DEGREE_QUALITIES,
    }
}

/// The state table for a mode.
///
/// Both modes currently share one table; callers go through this seam so a
/// dedicated minor table can be swapped in without touching the constraint
/// layer.
pub fn degree_states(_mode: Mode) -> &'static [u8; DEGREE_COUNT * STATE_COUNT] {
    &DEGREE_STATES
}

/// Whether degree `d` may take quality `q` in the given mode
pub fn quality_allowed(mode: Mode, d: Degree, q: ChordQuality) -> bool {
    degree_qualities(mode)[d.code() as usize * QUALITY_COUNT + q.code() as usize] == 1
}

/// Scale degree in the bass of degree `d` in state `s`
pub fn bass_degree(d: Degree, s: ChordState) -> u8 {
    BASS_BY_DEGREE_AND_STATE[d.code() as usize * STATE_COUNT + s.code() as usize]
}
