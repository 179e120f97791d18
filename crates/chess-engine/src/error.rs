//! Error type for engine operations.

use chess_core::{PlacementError, Square, SquareError};
use thiserror::Error;

/// Errors returned by the rules engine.
///
/// `IllegalMove`, `PromotionRequired` and `GameOver` are expected when moves
/// come from untrusted input. The board is left untouched when any of them is
/// returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    OutOfBounds(#[from] SquareError),

    #[error("square {at} does not hold the expected piece")]
    InvalidState { at: Square },

    #[error("illegal move {from}-{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("pawn move {from}-{to} reaches the last rank and needs a promotion piece")]
    PromotionRequired { from: Square, to: Square },

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    #[error("the game has already ended")]
    GameOver,

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid placement: {0}")]
    Placement(#[from] PlacementError),
}
