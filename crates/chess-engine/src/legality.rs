//! Legality filter.
//!
//! A pseudo-legal move is legal when the mover's king is not attacked after
//! it is played. The move is simulated on the board itself and rolled back
//! from a value snapshot, so castling, en-passant and discovered checks all
//! go through the same attack scan.

use crate::movegen::{destinations, is_square_attacked};
use crate::{Board, EngineError};
use chess_core::{Piece, PieceKind, Square};

/// Legal destinations of the piece on `at`.
///
/// Fails with `InvalidState` if `at` is empty. The board is left exactly as
/// it was found.
pub fn legal_moves(board: &mut Board, at: Square) -> Result<Vec<Square>, EngineError> {
    let piece = board
        .piece_at(at)
        .ok_or(EngineError::InvalidState { at })?;
    Ok(legal_destinations(board, at, piece))
}

pub(crate) fn legal_destinations(board: &mut Board, at: Square, piece: Piece) -> Vec<Square> {
    destinations(board, at, piece)
        .into_iter()
        .filter(|&to| leaves_king_safe(board, at, to, piece))
        .collect()
}

/// Plays `at -> to` on the board, tests the mover's king and rolls back.
///
/// A pawn arriving on its last rank is replaced by a queen for the test.
fn leaves_king_safe(board: &mut Board, at: Square, to: Square, piece: Piece) -> bool {
    let snapshot = board.snapshot();
    board.relocate(at, to, piece);
    if piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row() {
        board.set_piece(to, Some(Piece::new(PieceKind::Queen, piece.color)));
    }
    let king = board.king_square(piece.color);
    let safe = !is_square_attacked(board, king, piece.color.opposite(), true);
    board.restore(snapshot);
    safe
}
