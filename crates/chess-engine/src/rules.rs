//! Game-state evaluation: check, mate, stalemate and material.
//!
//! Repetition and the 50-move rule need game history and are answered by
//! [`Game`](crate::Game).

use crate::movegen::is_square_attacked;
use crate::Board;
use chess_core::{Color, PieceKind, SquareColor};
use std::fmt;

/// Why a game was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinReason {
    Checkmate,
    Resignation,
    Timeout,
}

/// Why a game was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    /// 100 plies without a pawn move or capture.
    FiftyMoveRule,
    /// The same placement seen three times.
    ThreefoldRepetition,
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win { winner: Color, reason: WinReason },
    Draw(DrawReason),
}

impl GameResult {
    /// Result code seen from White: 1 win, -1 loss, 0 draw.
    pub fn code(self) -> i8 {
        match self {
            GameResult::Win {
                winner: Color::White,
                ..
            } => 1,
            GameResult::Win {
                winner: Color::Black,
                ..
            } => -1,
            GameResult::Draw(_) => 0,
        }
    }

    /// Reason string used in `ENDGAME` messages.
    pub fn reason(self) -> &'static str {
        match self {
            GameResult::Win { reason, .. } => match reason {
                WinReason::Checkmate => "checkmate",
                WinReason::Resignation => "resignation",
                WinReason::Timeout => "timed_out",
            },
            GameResult::Draw(reason) => match reason {
                DrawReason::Stalemate => "stalemate",
                DrawReason::InsufficientMaterial => "insufficient_material",
                DrawReason::FiftyMoveRule => "50_move_draw",
                DrawReason::ThreefoldRepetition => "3-fold_repetition",
            },
        }
    }

    /// Rebuilds a result from an `ENDGAME` code and reason.
    ///
    /// `time` is accepted as an alias of `timed_out`.
    pub fn from_code(code: i8, reason: &str) -> Option<Self> {
        let winner = match code {
            1 => Some(Color::White),
            -1 => Some(Color::Black),
            0 => None,
            _ => return None,
        };
        match (winner, reason) {
            (Some(winner), "checkmate") => Some(GameResult::Win {
                winner,
                reason: WinReason::Checkmate,
            }),
            (Some(winner), "resignation") => Some(GameResult::Win {
                winner,
                reason: WinReason::Resignation,
            }),
            (Some(winner), "timed_out" | "time") => Some(GameResult::Win {
                winner,
                reason: WinReason::Timeout,
            }),
            (None, "stalemate") => Some(GameResult::Draw(DrawReason::Stalemate)),
            (None, "insufficient_material") => {
                Some(GameResult::Draw(DrawReason::InsufficientMaterial))
            }
            (None, "50_move_draw") => Some(GameResult::Draw(DrawReason::FiftyMoveRule)),
            (None, "3-fold_repetition") => Some(GameResult::Draw(DrawReason::ThreefoldRepetition)),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Win { winner, reason } => write!(f, "{} wins ({:?})", winner, reason),
            GameResult::Draw(reason) => write!(f, "draw ({:?})", reason),
        }
    }
}

/// Returns true if any enemy piece attacks `color`'s king.
pub fn in_check(board: &Board, color: Color) -> bool {
    is_square_attacked(board, board.king_square(color), color.opposite(), true)
}

/// Returns true if `color` has at least one legal move.
///
/// Uses the cached legal-move map when `color` is to move.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    if board.side_to_move() == color {
        board.has_legal_move()
    } else {
        board.with_side_to_move(color).has_legal_move()
    }
}

pub fn is_checkmated(board: &Board, color: Color) -> bool {
    in_check(board, color) && !has_legal_move(board, color)
}

pub fn is_stalemated(board: &Board, color: Color) -> bool {
    !in_check(board, color) && !has_legal_move(board, color)
}

#[derive(Default)]
struct MinorPieces {
    light_bishops: u32,
    dark_bishops: u32,
    knights: u32,
}

impl MinorPieces {
    fn is_bare(&self) -> bool {
        self.light_bishops == 0 && self.dark_bishops == 0 && self.knights == 0
    }

    fn bishops_on_one_color(&self) -> bool {
        self.light_bishops == 0 || self.dark_bishops == 0
    }

    fn has_bishops(&self) -> bool {
        self.light_bishops + self.dark_bishops > 0
    }
}

/// Returns true when neither side can force mate.
///
/// Any queen, rook or pawn, or two knights of one color, is enough material.
/// Otherwise the position is dead when both sides are bare, when there are no
/// knights and every bishop stands on one square color, or when one side is
/// bare and the other holds a lone knight or bishops of a single color.
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut minors = [MinorPieces::default(), MinorPieces::default()];
    for (sq, piece) in board.placement().pieces() {
        let side = &mut minors[piece.color.index()];
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Queen | PieceKind::Rook | PieceKind::Pawn => return false,
            PieceKind::Knight => {
                if side.knights == 1 {
                    return false;
                }
                side.knights += 1;
            }
            PieceKind::Bishop => match sq.color() {
                SquareColor::Light => side.light_bishops += 1,
                SquareColor::Dark => side.dark_bishops += 1,
            },
        }
    }

    let [white, black] = &minors;
    let no_knights = white.knights == 0 && black.knights == 0;
    let all_bishops_one_color = (white.light_bishops == 0 && black.light_bishops == 0)
        || (white.dark_bishops == 0 && black.dark_bishops == 0);
    let lone_side = |strong: &MinorPieces, bare: &MinorPieces| {
        bare.is_bare()
            && ((strong.knights == 0 && strong.bishops_on_one_color())
                || (!strong.has_bishops() && strong.knights == 1))
    };

    (white.is_bare() && black.is_bare())
        || (no_knights && all_bishops_one_color)
        || lone_side(white, black)
        || lone_side(black, white)
}
