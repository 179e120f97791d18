//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and the
//! session wrapper:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for requested moves
//! - [`Placement`] for the piece grid and its digest text

mod color;
mod mov;
mod piece;
mod placement;
mod square;

pub use color::Color;
pub use mov::{Move, MoveParseError};
pub use piece::{Piece, PieceError, PieceKind};
pub use placement::{Placement, PlacementError};
pub use square::{File, Rank, Square, SquareColor, SquareError};
