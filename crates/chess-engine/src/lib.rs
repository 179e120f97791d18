//! Two-player chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - piece placement, side to move, castling rights, en-passant
//!   target and the legal-move map of the side to move
//! - [`Game`] - the gameplay entry point with history, repetition tracking
//!   and the result
//! - [`MoveRecorder`] - algebraic notation and the 50-move counter
//! - Pseudo-legal generation, the legality filter and game-state queries
//!
//! # Architecture
//!
//! Moves are generated per piece kind and then filtered by simulating each
//! candidate on the board and rolling it back from a value snapshot. The
//! legal-move map is rebuilt in full after every move.
//!
//! # Example
//!
//! ```
//! use chess_engine::Game;
//! use chess_core::Square;
//!
//! let mut game = Game::new();
//! let e2: Square = "e2".parse().unwrap();
//! let e4: Square = "e4".parse().unwrap();
//! game.make_move(e2, e4).unwrap();
//! assert_eq!(game.notation(), "1. e4");
//! ```

mod board;
mod error;
mod game;
pub mod legality;
pub mod movegen;
pub mod recorder;
pub mod rules;

pub use board::{Board, CastleSide, CastlingRights, PositionDigest, Snapshot};
pub use error::EngineError;
pub use game::{Game, GameMove};
pub use legality::legal_moves;
pub use movegen::{attacks, is_square_attacked, pseudo_legal_moves};
pub use recorder::{MoveRecorder, Outcome};
pub use rules::{
    has_insufficient_material, in_check, is_checkmated, is_stalemated, DrawReason, GameResult,
    WinReason,
};
