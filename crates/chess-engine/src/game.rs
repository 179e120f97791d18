//! Full game management with history tracking.
//!
//! The [`Game`] struct is the gameplay entry point. It owns:
//! - the current [`Board`] and its legal-move map
//! - the move list with notation
//! - the placement histogram used for repetition
//! - the result once the game has ended

use crate::recorder::{MoveRecorder, Outcome};
use crate::rules::{self, DrawReason, GameResult, WinReason};
use crate::{Board, EngineError, PositionDigest};
use chess_core::{Color, Move, PieceKind, Square};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move as requested.
    pub mov: Move,
    /// Notation token for the move.
    pub notation: String,
}

/// A chess game between two players.
///
/// Unlike [`Board`], which holds a single position, `Game` keeps the history
/// needed for repetition and the 50-move rule, and fixes the result as soon
/// as a move ends the game.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    recorder: MoveRecorder,
    position_counts: HashMap<PositionDigest, u32>,
    moves: Vec<GameMove>,
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    /// Creates a game from a custom starting board.
    pub fn from_board(board: Board) -> Self {
        let mut position_counts = HashMap::new();
        position_counts.insert(board.digest(), 1);
        let mut game = Game {
            board,
            recorder: MoveRecorder::new(),
            position_counts,
            moves: Vec::new(),
            result: None,
        };
        // the setup itself may already be finished
        game.check_game_end();
        game
    }

    /// Creates a game from placement text and the side to move.
    pub fn from_placement(text: &str, side_to_move: Color) -> Result<Self, EngineError> {
        Ok(Self::from_board(Board::from_placement(text, side_to_move)?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn recorder(&self) -> &MoveRecorder {
        &self.recorder
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Legal destinations per origin square for the side to move.
    pub fn legal_moves(&self) -> &BTreeMap<Square, Vec<Square>> {
        self.board.legal_moves()
    }

    pub fn legal_moves_from(&self, from: Square) -> &[Square] {
        self.board.legal_moves_from(from)
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Plays a non-promoting move.
    ///
    /// Fails with `IllegalMove` if `to` is not a legal destination from
    /// `from`, and with `PromotionRequired` if a pawn would reach its last
    /// rank. The game is unchanged on error.
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<(), EngineError> {
        self.ensure_in_progress()?;
        if !self.board.is_legal(from, to) {
            return Err(EngineError::IllegalMove { from, to });
        }
        if self.is_promotion(from, to) {
            return Err(EngineError::PromotionRequired { from, to });
        }
        self.apply(from, to, None)
    }

    /// Plays a pawn move to the last rank, replacing the pawn with `kind`.
    ///
    /// Fails with `IllegalArgument` for a king or pawn `kind`, or when `from`
    /// does not hold a pawn of the side to move that lands on its last rank.
    pub fn promote(&mut self, from: Square, to: Square, kind: PieceKind) -> Result<(), EngineError> {
        self.ensure_in_progress()?;
        let kind = kind
            .promotion()
            .map_err(|e| EngineError::IllegalArgument(e.to_string()))?;
        if !self.is_promotion(from, to) {
            return Err(EngineError::IllegalArgument(format!(
                "{}-{} is not a pawn promotion",
                from, to
            )));
        }
        if !self.board.is_legal(from, to) {
            return Err(EngineError::IllegalMove { from, to });
        }
        self.apply(from, to, Some(kind))
    }

    /// Plays a [`Move`], routing it to [`make_move`](Game::make_move) or
    /// [`promote`](Game::promote).
    pub fn play(&mut self, mov: Move) -> Result<(), EngineError> {
        match mov.promotion {
            Some(kind) => self.promote(mov.from, mov.to, kind),
            None => self.make_move(mov.from, mov.to),
        }
    }

    /// Ends the game with `color` resigning.
    pub fn resign(&mut self, color: Color) -> Result<GameResult, EngineError> {
        self.conclude(GameResult::Win {
            winner: color.opposite(),
            reason: WinReason::Resignation,
        })
    }

    /// Ends the game with `color` out of time.
    pub fn time_out(&mut self, color: Color) -> Result<GameResult, EngineError> {
        self.conclude(GameResult::Win {
            winner: color.opposite(),
            reason: WinReason::Timeout,
        })
    }

    /// Ends the game with a result decided elsewhere.
    pub fn conclude(&mut self, result: GameResult) -> Result<GameResult, EngineError> {
        self.ensure_in_progress()?;
        self.finish(result);
        Ok(result)
    }

    /// Starts over from the standard position.
    pub fn reset(&mut self) {
        *self = Game::new();
        info!("game reset");
    }

    pub fn in_check(&self, color: Color) -> bool {
        rules::in_check(&self.board, color)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.in_check(self.board.side_to_move())
    }

    pub fn is_checkmated(&self, color: Color) -> bool {
        rules::is_checkmated(&self.board, color)
    }

    pub fn is_stalemated(&self, color: Color) -> bool {
        rules::is_stalemated(&self.board, color)
    }

    pub fn has_insufficient_material(&self) -> bool {
        rules::has_insufficient_material(&self.board)
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.recorder.is_fifty_move_draw()
    }

    /// Returns true if any placement has occurred at least three times.
    pub fn is_threefold_repetition(&self) -> bool {
        self.position_counts.values().any(|&n| n >= 3)
    }

    /// Counts how many times the current placement has occurred.
    pub fn position_count(&self) -> u32 {
        self.position_counts
            .get(&self.board.digest())
            .copied()
            .unwrap_or(0)
    }

    /// Returns true if the position is drawn with `color` to move.
    pub fn is_draw(&self, color: Color) -> bool {
        self.has_insufficient_material()
            || self.is_stalemated(color)
            || self.is_fifty_move_draw()
            || self.is_threefold_repetition()
    }

    /// The move list, e.g. "1. e4 e5 2. Nf3 Nc6", followed by the score once
    /// the game has ended.
    pub fn notation(&self) -> String {
        self.recorder.to_string()
    }

    pub fn outcome(&self) -> Outcome {
        self.recorder.outcome()
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        match self.result {
            Some(_) => Err(EngineError::GameOver),
            None => Ok(()),
        }
    }

    fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.board.piece_at(from).is_some_and(|p| {
            p.kind == PieceKind::Pawn
                && p.color == self.board.side_to_move()
                && to.row() == p.color.promotion_row()
        })
    }

    fn apply(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(), EngineError> {
        let before = self.board.clone();
        self.board.commit(from, to, promotion)?;
        let notation = self
            .recorder
            .record(&before, &self.board, from, to, promotion)?;
        *self.position_counts.entry(self.board.digest()).or_insert(0) += 1;

        let mov = Move {
            from,
            to,
            promotion,
        };
        debug!(%mov, %notation, "move applied");
        self.moves.push(GameMove { mov, notation });

        self.check_game_end();
        Ok(())
    }

    /// Fixes the result if the position after the last move ends the game.
    fn check_game_end(&mut self) {
        let to_move = self.board.side_to_move();
        let result = if self.is_checkmated(to_move) {
            Some(GameResult::Win {
                winner: to_move.opposite(),
                reason: WinReason::Checkmate,
            })
        } else if self.is_stalemated(to_move) {
            Some(GameResult::Draw(DrawReason::Stalemate))
        } else if self.has_insufficient_material() {
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        } else if self.is_fifty_move_draw() {
            Some(GameResult::Draw(DrawReason::FiftyMoveRule))
        } else if self.is_threefold_repetition() {
            Some(GameResult::Draw(DrawReason::ThreefoldRepetition))
        } else {
            None
        };

        if let Some(result) = result {
            self.finish(result);
        }
    }

    fn finish(&mut self, result: GameResult) {
        self.result = Some(result);
        self.recorder.set_outcome(result.into());
        info!(
            code = result.code(),
            reason = result.reason(),
            plies = self.moves.len(),
            "game over"
        );
    }
}
