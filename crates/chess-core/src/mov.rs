//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing coordinate move text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid move text: '{0}'")]
pub struct MoveParseError(pub String);

/// A requested move: origin, destination and the promotion choice if any.
///
/// A `Move` carries no legality information. The engine decides whether it
/// can be played in a given position.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a move without promotion.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a promoting move.
    #[inline]
    pub const fn promoting(from: Square, to: Square, kind: PieceKind) -> Self {
        Move {
            from,
            to,
            promotion: Some(kind),
        }
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_coordinate(self) -> String {
        match self.promotion.and_then(PieceKind::symbol) {
            Some(c) => format!("{}{}{}", self.from, self.to, c.to_ascii_lowercase()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses coordinate notation.
    pub fn from_coordinate(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(PieceKind::from_symbol(c).ok()?.promotion().ok()?),
            None => None,
        };
        Some(Move {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_coordinate(s).ok_or_else(|| MoveParseError(s.to_string()))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_coordinate())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_text() {
        let m = Move::new(Square::E1, Square::G1);
        assert_eq!(m.to_coordinate(), "e1g1");

        let e7: Square = "e7".parse().unwrap();
        let promo = Move::promoting(e7, Square::E8, PieceKind::Knight);
        assert_eq!(promo.to_coordinate(), "e7e8n");
    }

    #[test]
    fn parse_coordinate_text() {
        let m: Move = "e2e4".parse().unwrap();
        assert_eq!(m.from.to_algebraic(), "e2");
        assert_eq!(m.to.to_algebraic(), "e4");
        assert_eq!(m.promotion, None);

        let promo = Move::from_coordinate("a2a1Q").unwrap();
        assert_eq!(promo.promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn parse_rejects_bad_text() {
        assert!(Move::from_coordinate("e2").is_none());
        assert!(Move::from_coordinate("e2e9").is_none());
        assert!(Move::from_coordinate("e2e4qq").is_none());
        // kings and pawns are not promotion choices
        assert!(Move::from_coordinate("e7e8k").is_none());
        assert!(Move::from_coordinate("e7e8p").is_none());
        assert_eq!(
            "nope".parse::<Move>(),
            Err(MoveParseError("nope".to_string()))
        );
    }

    #[test]
    fn debug_display() {
        let m = Move::new(Square::G1, "f3".parse().unwrap());
        assert_eq!(format!("{:?}", m), "Move(g1f3)");
        assert_eq!(format!("{}", m), "g1f3");
    }
}
