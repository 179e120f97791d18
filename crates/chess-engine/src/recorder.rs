//! Move notation and the move list.
//!
//! Tokens follow standard algebraic notation: "e4", "Nf3", "Bxc6", "O-O",
//! "exd6", "e8=Q", "Nbd2", "R1e1", "Qxf7#".

use crate::rules::{in_check, is_checkmated};
use crate::{Board, EngineError, GameResult};
use chess_core::{Color, PieceKind, Square};
use std::fmt;

/// Plies without a pawn move or capture after which the game is drawn.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Terminal tag of a move list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
    #[default]
    Undetermined,
}

impl Outcome {
    /// Score token: "1-0", "0-1", "1/2-1/2", or empty while undetermined.
    pub const fn token(self) -> &'static str {
        match self {
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "1/2-1/2",
            Outcome::Undetermined => "",
        }
    }
}

impl From<GameResult> for Outcome {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::Win {
                winner: Color::White,
                ..
            } => Outcome::WhiteWins,
            GameResult::Win {
                winner: Color::Black,
                ..
            } => Outcome::BlackWins,
            GameResult::Draw(_) => Outcome::Draw,
        }
    }
}

/// Append-only list of notation tokens with its outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRecorder {
    tokens: Vec<String>,
    outcome: Outcome,
    quiet_plies: u32,
}

impl MoveRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move given the boards before and after it and returns its
    /// token.
    ///
    /// `before` must still have the mover to move so its legal-move map can
    /// disambiguate. The check suffix is decided on `after`.
    pub fn record(
        &mut self,
        before: &Board,
        after: &Board,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<String, EngineError> {
        let piece = before
            .piece_at(from)
            .ok_or(EngineError::InvalidState { at: from })?;
        let is_pawn = piece.kind == PieceKind::Pawn;
        let is_capture =
            before.piece_at(to).is_some() || (is_pawn && before.en_passant() == Some(to));

        let mut token = String::new();
        if piece.kind == PieceKind::King && from.col().abs_diff(to.col()) == 2 {
            token.push_str(if to.col() > from.col() { "O-O" } else { "O-O-O" });
        } else {
            if let Some(symbol) = piece.kind.symbol() {
                token.push(symbol);
            }
            if !is_pawn && piece.kind != PieceKind::King {
                token.push_str(&disambiguation(before, from, to, piece.kind));
            }
            if is_capture {
                if is_pawn {
                    token.push(from.file().to_char());
                }
                token.push('x');
            }
            token.push_str(&to.to_algebraic());
            if let Some(symbol) = promotion.and_then(PieceKind::symbol) {
                token.push('=');
                token.push(symbol);
            }
        }

        let opponent = piece.color.opposite();
        if is_checkmated(after, opponent) {
            token.push('#');
        } else if in_check(after, opponent) {
            token.push('+');
        }

        if is_pawn || is_capture {
            self.quiet_plies = 0;
        } else {
            self.quiet_plies += 1;
        }
        self.tokens.push(token.clone());
        Ok(token)
    }

    /// Fixes the outcome. Returns false if one was already set.
    pub fn set_outcome(&mut self, outcome: Outcome) -> bool {
        if self.outcome != Outcome::Undetermined || outcome == Outcome::Undetermined {
            return false;
        }
        self.outcome = outcome;
        true
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Plies since the last pawn move or capture.
    pub fn quiet_plies(&self) -> u32 {
        self.quiet_plies
    }

    /// Returns true once 50 full moves passed without a pawn move or capture.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.quiet_plies >= FIFTY_MOVE_PLIES
    }

    /// Number of completed full moves.
    pub fn full_moves(&self) -> usize {
        self.tokens.len() / 2
    }
}

/// Origin qualifier needed to tell `from` apart from other pieces of the same
/// kind that can also legally reach `to`: file if that is unique, else rank,
/// else both.
fn disambiguation(before: &Board, from: Square, to: Square, kind: PieceKind) -> String {
    let rivals: Vec<Square> = before
        .legal_moves()
        .iter()
        .filter(|(&origin, dests)| {
            origin != from
                && dests.contains(&to)
                && before.piece_at(origin).map(|p| p.kind) == Some(kind)
        })
        .map(|(&origin, _)| origin)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|sq| sq.col() != from.col()) {
        return from.file().to_string();
    }
    if rivals.iter().all(|sq| sq.row() != from.row()) {
        return from.rank().to_string();
    }
    from.to_algebraic()
}

impl fmt::Display for MoveRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.tokens.len() + 1);
        for (i, token) in self.tokens.iter().enumerate() {
            if i % 2 == 0 {
                parts.push(format!("{}. {}", i / 2 + 1, token));
            } else {
                parts.push(token.clone());
            }
        }
        if self.outcome != Outcome::Undetermined {
            parts.push(self.outcome.token().to_string());
        }
        write!(f, "{}", parts.join(" "))
    }
}
