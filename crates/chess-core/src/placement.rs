//! Piece placement grid and its digest text.
//!
//! The text form lists ranks from rank 8 down to rank 1 separated by `/`.
//! Each rank run-length-encodes empty squares as a digit and writes pieces as
//! a single letter, uppercase for White. It is the placement field of FEN and
//! nothing more: no side to move, castling or en-passant fields.

use crate::{Piece, PieceError, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing placement text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("expected 8 ranks, got {0}")]
    RankCount(usize),

    #[error("invalid character '{ch}' in rank {rank}")]
    InvalidCharacter { ch: char, rank: u8 },

    #[error("rank {rank} has {squares} squares, expected 8")]
    SquareCount { rank: u8, squares: u32 },
}

/// An 8x8 grid of optional pieces, indexed `[row][col]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Placement {
    grid: [[Option<Piece>; 8]; 8],
}

impl Placement {
    /// The standard starting placement.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    /// An empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard starting layout.
    pub fn startpos() -> Self {
        // STARTPOS is well formed
        Self::parse(Self::STARTPOS).unwrap_or_default()
    }

    /// Parses placement text.
    pub fn parse(text: &str) -> Result<Self, PlacementError> {
        let ranks: Vec<&str> = text.trim().split('/').collect();
        if ranks.len() != 8 {
            return Err(PlacementError::RankCount(ranks.len()));
        }

        let mut placement = Placement::empty();
        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = 8 - row as u8;
            let mut col: u32 = 0;
            for ch in rank_text.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    col += skip;
                    continue;
                }
                let piece = Piece::from_fen_char(ch).map_err(|_: PieceError| {
                    PlacementError::InvalidCharacter { ch, rank }
                })?;
                if col < 8 {
                    placement.grid[row][col as usize] = Some(piece);
                }
                col += 1;
            }
            if col != 8 {
                return Err(PlacementError::SquareCount { rank, squares: col });
            }
        }

        Ok(placement)
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.grid[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Removes and returns the piece on `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize].take()
    }

    /// Iterates over occupied squares in reading order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// The same position seen from the other side of the board.
    pub fn rotate_180(&self) -> Self {
        let mut rotated = Placement::empty();
        for (sq, piece) in self.pieces() {
            rotated.set(sq.rotate_180(), Some(piece));
        }
        rotated
    }

    /// Writes the placement text.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(72);
        for (row, cells) in self.grid.iter().enumerate() {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0u8;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
        }
        out
    }
}

impl FromStr for Placement {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Placement::parse(s)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Placement({})", self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, PieceKind};

    #[test]
    fn parse_startpos() {
        let p = Placement::startpos();
        assert_eq!(
            p.get(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            p.get(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(p.get("e4".parse().unwrap()), None);
        assert_eq!(p.pieces().count(), 32);
    }

    #[test]
    fn text_round_trip() {
        for text in [
            Placement::STARTPOS,
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R",
            "8/8/8/8/8/8/8/8",
            "4k3/8/8/8/8/8/8/4K2R",
        ] {
            assert_eq!(Placement::parse(text).unwrap().to_text(), text);
        }
    }

    #[test]
    fn no_trailing_separator() {
        let text = Placement::startpos().to_string();
        assert!(!text.ends_with('/'));
        assert_eq!(text.matches('/').count(), 7);
    }

    #[test]
    fn rank_count() {
        assert_eq!(
            Placement::parse("8/8/8/8/8/8/8"),
            Err(PlacementError::RankCount(7))
        );
    }

    #[test]
    fn invalid_character() {
        assert_eq!(
            Placement::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR"),
            Err(PlacementError::InvalidCharacter { ch: 'X', rank: 2 })
        );
    }

    #[test]
    fn wrong_square_count() {
        assert_eq!(
            Placement::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementError::SquareCount { rank: 8, squares: 9 })
        );
        assert_eq!(
            Placement::parse("7/8/8/8/8/8/8/8"),
            Err(PlacementError::SquareCount { rank: 8, squares: 7 })
        );
    }

    #[test]
    fn rotation_swaps_sides_of_the_board() {
        let p = Placement::parse("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let r = p.rotate_180();
        assert_eq!(r.to_text(), "3K3R/8/8/8/8/8/8/3k4");
        assert_eq!(r.rotate_180(), p);
    }

    #[test]
    fn take_and_set() {
        let mut p = Placement::startpos();
        let pawn = p.take("e2".parse().unwrap());
        assert_eq!(pawn, Some(Piece::new(PieceKind::Pawn, Color::White)));
        p.set("e4".parse().unwrap(), pawn);
        assert_eq!(
            p.to_text(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"
        );
    }
}
