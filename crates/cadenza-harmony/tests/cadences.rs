//! Cadence vocabulary on hand-built models
//!
//! These tests drive a [`TonalPiece`] and the engine directly instead of
//! going through `solve`, posting extra cadences before the search starts.

use cadenza_core::{CadenceKind, ChordState, Degree, Tonality};
use cadenza_harmony::{HarmonyError, PieceParameters, PieceSolution, TonalPiece};
use cadenza_solver::{DfsEngine, EngineOutcome};

fn c_major() -> Tonality {
    Tonality::major(0).unwrap()
}

fn solve_piece(piece: &TonalPiece) -> PieceSolution {
    let mut engine = DfsEngine::new(piece.space().clone());
    match engine.next() {
        EngineOutcome::Solution(space) => piece.extract(&space, engine.stats()),
        other => panic!("expected a solution, got {other:?}"),
    }
}

#[test]
fn plagal_cadence_closes_the_piece() {
    let params = PieceParameters::new(5, vec![c_major()], vec![]);
    let mut piece = TonalPiece::new(&params, 3).unwrap();
    piece.post_cadence(0, 3, CadenceKind::Plagal).unwrap();
    let solution = solve_piece(&piece);
    assert_eq!(solution.sections[0].degrees[3], Degree::Fourth);
    assert_eq!(solution.sections[0].degrees[4], Degree::First);
    assert_eq!(solution.sections[0].states[3], ChordState::Fundamental);
    assert_eq!(solution.sections[0].states[4], ChordState::Fundamental);
}

#[test]
fn deceptive_cadence_lands_on_the_submediant() {
    let params = PieceParameters::new(5, vec![c_major()], vec![]);
    let mut piece = TonalPiece::new(&params, 3).unwrap();
    piece.post_cadence(0, 2, CadenceKind::Deceptive).unwrap();
    let solution = solve_piece(&piece);
    assert_eq!(solution.sections[0].degrees[2], Degree::Fifth);
    assert_eq!(solution.sections[0].degrees[3], Degree::Sixth);
    assert_eq!(solution.sections[0].states[2], ChordState::Fundamental);
}

#[test]
fn half_cadence_pauses_on_the_dominant() {
    let params = PieceParameters::new(6, vec![c_major()], vec![]);
    let mut piece = TonalPiece::new(&params, 3).unwrap();
    piece.post_cadence(0, 2, CadenceKind::Half).unwrap();
    let solution = solve_piece(&piece);
    assert_eq!(solution.sections[0].degrees[2], Degree::Fifth);
    assert_eq!(solution.sections[0].states[2], ChordState::Fundamental);
}

#[test]
fn cadence_positions_are_bounds_checked() {
    let params = PieceParameters::new(4, vec![c_major()], vec![]);
    let mut piece = TonalPiece::new(&params, 3).unwrap();
    assert!(matches!(
        piece.post_cadence(0, 3, CadenceKind::Perfect),
        Err(HarmonyError::CadenceOutOfRange { .. })
    ));
    assert!(matches!(
        piece.post_cadence(1, 0, CadenceKind::Half),
        Err(HarmonyError::CadenceOutOfRange { .. })
    ));
    // a half cadence on the last chord fits
    assert!(piece.post_cadence(0, 3, CadenceKind::Half).is_ok());
}
