//! Pseudo-legal move generation.
//!
//! Each piece kind has its own generator, selected by `match`. Generators
//! look at occupancy only. Whether a move exposes the mover's king is decided
//! afterwards by the legality filter.

use crate::board::CastleSide;
use crate::{Board, EngineError};
use chess_core::{Color, Piece, PieceKind, Square};
use std::collections::BTreeSet;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Destinations reachable by the `kind` piece on `at`, ignoring king safety.
///
/// Fails with `InvalidState` if `at` is empty or holds another kind.
pub fn pseudo_legal_moves(
    board: &Board,
    at: Square,
    kind: PieceKind,
) -> Result<BTreeSet<Square>, EngineError> {
    match board.piece_at(at) {
        Some(piece) if piece.kind == kind => Ok(destinations(board, at, piece)),
        _ => Err(EngineError::InvalidState { at }),
    }
}

/// Squares the piece on `at` attacks. Empty if `at` is empty.
///
/// Differs from the pseudo-legal destinations for pawns, which attack both
/// forward diagonals whatever stands there, and for kings, whose castling
/// moves are not attacks.
pub fn attacks(board: &Board, at: Square) -> BTreeSet<Square> {
    let mut out = BTreeSet::new();
    let Some(piece) = board.piece_at(at) else {
        return out;
    };
    match piece.kind {
        PieceKind::Pawn => {
            for d_col in [-1, 1] {
                out.extend(at.offset(d_col, piece.color.forward()));
            }
        }
        PieceKind::King => leaper_moves(board, at, piece.color, &KING_OFFSETS, &mut out),
        _ => out = destinations(board, at, piece),
    }
    out
}

/// Returns true if any piece of `by` attacks `target`.
///
/// With `include_king` unset the enemy king contributes no attacks. Castling
/// uses that form so that king generation never recurses into itself.
pub fn is_square_attacked(board: &Board, target: Square, by: Color, include_king: bool) -> bool {
    board
        .pieces_of(by)
        .filter(|(_, p)| include_king || p.kind != PieceKind::King)
        .any(|(at, _)| attacks(board, at).contains(&target))
}

pub(crate) fn destinations(board: &Board, at: Square, piece: Piece) -> BTreeSet<Square> {
    let mut out = BTreeSet::new();
    let color = piece.color;
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, at, color, &mut out),
        PieceKind::Knight => leaper_moves(board, at, color, &KNIGHT_OFFSETS, &mut out),
        PieceKind::Bishop => slider_moves(board, at, color, &BISHOP_DIRECTIONS, &mut out),
        PieceKind::Rook => slider_moves(board, at, color, &ROOK_DIRECTIONS, &mut out),
        PieceKind::Queen => {
            slider_moves(board, at, color, &ROOK_DIRECTIONS, &mut out);
            slider_moves(board, at, color, &BISHOP_DIRECTIONS, &mut out);
        }
        PieceKind::King => {
            leaper_moves(board, at, color, &KING_OFFSETS, &mut out);
            castling_moves(board, at, color, &mut out);
        }
    }
    out
}

fn is_enemy(board: &Board, sq: Square, color: Color) -> bool {
    board.piece_at(sq).is_some_and(|p| p.color != color)
}

fn pawn_moves(board: &Board, at: Square, color: Color, out: &mut BTreeSet<Square>) {
    let forward = color.forward();

    if let Some(one) = at.offset(0, forward) {
        if board.piece_at(one).is_none() {
            out.insert(one);
            if at.row() == color.pawn_row() {
                if let Some(two) = at.offset(0, 2 * forward) {
                    if board.piece_at(two).is_none() {
                        out.insert(two);
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        let Some(diagonal) = at.offset(d_col, forward) else {
            continue;
        };
        if is_enemy(board, diagonal, color) || is_en_passant_capture(board, diagonal, color) {
            out.insert(diagonal);
        }
    }
}

/// The en-passant target counts only while the double-stepped pawn still
/// stands behind it.
fn is_en_passant_capture(board: &Board, target: Square, color: Color) -> bool {
    if board.en_passant() != Some(target) || board.piece_at(target).is_some() {
        return false;
    }
    target
        .offset(0, -color.forward())
        .and_then(|victim| board.piece_at(victim))
        .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != color)
}

fn leaper_moves(
    board: &Board,
    at: Square,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut BTreeSet<Square>,
) {
    for &(d_col, d_row) in offsets {
        if let Some(to) = at.offset(d_col, d_row) {
            if board.piece_at(to).map_or(true, |p| p.color != color) {
                out.insert(to);
            }
        }
    }
}

fn slider_moves(
    board: &Board,
    at: Square,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut BTreeSet<Square>,
) {
    for &(d_col, d_row) in directions {
        let mut current = at;
        while let Some(next) = current.offset(d_col, d_row) {
            match board.piece_at(next) {
                None => {
                    out.insert(next);
                    current = next;
                }
                Some(blocker) => {
                    if blocker.color != color {
                        out.insert(next);
                    }
                    break;
                }
            }
        }
    }
}

/// Castling destinations for a king on its start square.
///
/// Requires the right for that wing, a friendly rook on the corner, empty
/// squares between king and rook, and no enemy attack on the king's square
/// or on any square between it and the rook.
fn castling_moves(board: &Board, at: Square, color: Color, out: &mut BTreeSet<Square>) {
    if at.row() != color.home_row() || at.col() != 4 {
        return;
    }
    let enemy = color.opposite();
    for side in CastleSide::BOTH {
        if !board.castling().has(color, side) {
            continue;
        }
        let rook_square = at.offset(side.rook_offset(), 0);
        let rook = rook_square.and_then(|sq| board.piece_at(sq));
        if rook != Some(Piece::new(PieceKind::Rook, color)) {
            continue;
        }

        let span = side.rook_offset().unsigned_abs() as i8;
        let path: Vec<Square> = (1..span)
            .filter_map(|n| at.offset(n * side.step(), 0))
            .collect();
        if path.iter().any(|&sq| board.piece_at(sq).is_some()) {
            continue;
        }
        let threatened = std::iter::once(at)
            .chain(path.iter().copied())
            .any(|sq| is_square_attacked(board, sq, enemy, false));
        if threatened {
            continue;
        }

        if let Some(to) = at.offset(2 * side.step(), 0) {
            out.insert(to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn squares(list: &[&str]) -> BTreeSet<Square> {
        list.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn wrong_kind_is_invalid_state() {
        let board = Board::new();
        assert_eq!(
            pseudo_legal_moves(&board, sq("b1"), PieceKind::Bishop),
            Err(EngineError::InvalidState { at: sq("b1") })
        );
        assert_eq!(
            pseudo_legal_moves(&board, sq("e4"), PieceKind::Pawn),
            Err(EngineError::InvalidState { at: sq("e4") })
        );
    }

    #[test]
    fn knight_from_start() {
        let board = Board::new();
        let moves = pseudo_legal_moves(&board, sq("g1"), PieceKind::Knight).unwrap();
        assert_eq!(moves, squares(&["f3", "h3"]));
    }

    #[test]
    fn pawn_single_and_double_step() {
        let board = Board::new();
        let white = pseudo_legal_moves(&board, sq("e2"), PieceKind::Pawn).unwrap();
        assert_eq!(white, squares(&["e3", "e4"]));
        let black = pseudo_legal_moves(&board, sq("d7"), PieceKind::Pawn).unwrap();
        assert_eq!(black, squares(&["d6", "d5"]));
    }

    #[test]
    fn pawn_double_step_needs_both_squares() {
        let board = Board::from_placement("4k3/8/8/8/4n3/8/4P3/4K3", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, sq("e2"), PieceKind::Pawn).unwrap();
        assert_eq!(moves, squares(&["e3"]));

        let board = Board::from_placement("4k3/8/8/8/8/4n3/4P3/4K3", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, sq("e2"), PieceKind::Pawn).unwrap();
        assert!(moves.is_empty());
    }

    #[test]
    fn pawn_captures_only_enemies() {
        let board = Board::from_placement("4k3/8/8/3p1N2/4P3/8/8/4K3", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, sq("e4"), PieceKind::Pawn).unwrap();
        assert_eq!(moves, squares(&["d5", "e5"]));
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let board = Board::from_placement("4k3/8/8/1p6/8/3R1P2/8/4K3", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, sq("d3"), PieceKind::Rook).unwrap();
        assert_eq!(
            moves,
            squares(&["d1", "d2", "d4", "d5", "d6", "d7", "d8", "a3", "b3", "c3", "e3"])
        );

        let board = Board::from_placement("4k3/8/8/1p6/8/3B4/8/4K3", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, sq("d3"), PieceKind::Bishop).unwrap();
        assert_eq!(
            moves,
            squares(&["c4", "b5", "e4", "f5", "g6", "h7", "c2", "b1", "e2", "f1"])
        );
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let board = Board::from_placement("4k3/8/8/8/3Q4/8/8/4K3", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, sq("d4"), PieceKind::Queen).unwrap();
        assert_eq!(moves.len(), 27);
    }

    #[test]
    fn pawn_attacks_ignore_occupancy() {
        let board = Board::from_placement("4k3/8/8/8/8/8/4P3/4K3", Color::White).unwrap();
        assert_eq!(attacks(&board, sq("e2")), squares(&["d3", "f3"]));
        assert!(is_square_attacked(&board, sq("d3"), Color::White, true));
        assert!(!is_square_attacked(&board, sq("e3"), Color::White, true));
    }

    #[test]
    fn king_attacks_can_be_excluded() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/4K3", Color::White).unwrap();
        assert!(is_square_attacked(&board, sq("d2"), Color::White, true));
        assert!(!is_square_attacked(&board, sq("d2"), Color::White, false));
    }

    #[test]
    fn castling_offered_when_clear() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, Square::E1, PieceKind::King).unwrap();
        assert!(moves.contains(&Square::G1));
        assert!(moves.contains(&Square::C1));
    }

    #[test]
    fn castling_blocked_by_piece_between() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/RN2K1NR", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, Square::E1, PieceKind::King).unwrap();
        assert!(!moves.contains(&Square::G1));
        assert!(!moves.contains(&Square::C1));
    }

    #[test]
    fn castling_refused_through_attacked_square() {
        // black rook on b8 covers b1, on the queenside rook's path
        let board = Board::from_placement("1r2k3/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, Square::E1, PieceKind::King).unwrap();
        assert!(moves.contains(&Square::G1));
        assert!(!moves.contains(&Square::C1));
    }

    #[test]
    fn castling_refused_in_check() {
        let board = Board::from_placement("4r1k1/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        let moves = pseudo_legal_moves(&board, Square::E1, PieceKind::King).unwrap();
        assert!(!moves.contains(&Square::G1));
        assert!(!moves.contains(&Square::C1));
    }

    #[test]
    fn castling_needs_the_rook() {
        let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        board.set_piece(Square::H1, None);
        let moves = pseudo_legal_moves(&board, Square::E1, PieceKind::King).unwrap();
        assert!(!moves.contains(&Square::G1));
        assert!(moves.contains(&Square::C1));
    }

    #[test]
    fn en_passant_needs_the_victim() {
        let mut board = Board::new();
        board.commit(sq("e2"), sq("e4"), None).unwrap();
        board.commit(sq("a7"), sq("a6"), None).unwrap();
        board.commit(sq("e4"), sq("e5"), None).unwrap();
        board.commit(sq("d7"), sq("d5"), None).unwrap();
        let moves = pseudo_legal_moves(&board, sq("e5"), PieceKind::Pawn).unwrap();
        assert!(moves.contains(&sq("d6")));

        board.set_piece(sq("d5"), None);
        let moves = pseudo_legal_moves(&board, sq("e5"), PieceKind::Pawn).unwrap();
        assert!(!moves.contains(&sq("d6")));
    }
}
