//! Line protocol between a session and its peer.
//!
//! Inbound lines:
//!
//! - `STARTGAME <white|black> [opponent]` - start a fresh game
//! - `MOVE <from> <to>` - play a move, squares in algebraic form
//! - `PROMOTE <from> <to> <code>` - play a promotion, code 1..4 (N, B, R, Q)
//! - `ENDGAME <1|-1|0> <reason>` - the peer ended the game
//! - `RESIGN`, `PING`, `QUIT`
//!
//! Outbound lines mirror accepted moves and report rejections and results.

use chess_core::{Color, PieceError, PieceKind, Square, SquareError};
use chess_engine::GameResult;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("{command} is missing its {argument} argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error(transparent)]
    Square(#[from] SquareError),
    #[error("invalid piece code '{0}'")]
    InvalidCode(String),
    #[error(transparent)]
    Piece(#[from] PieceError),
    #[error("expected 'white' or 'black', got '{0}'")]
    InvalidColor(String),
    #[error("unknown result {code} {reason}")]
    InvalidResult { code: String, reason: String },
}

/// Commands received from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartGame {
        color: Color,
        opponent: Option<String>,
    },
    Move {
        from: Square,
        to: Square,
    },
    Promote {
        from: Square,
        to: Square,
        kind: PieceKind,
    },
    EndGame {
        result: GameResult,
    },
    Resign,
    Ping,
    Quit,
    /// Unrecognised line, kept verbatim.
    Unknown(String),
}

impl Command {
    /// Parses one protocol line. Keywords are case-insensitive.
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();
        let keyword = parts.next().unwrap_or("").to_ascii_uppercase();

        match keyword.as_str() {
            "STARTGAME" => {
                let color = parse_color(required(&mut parts, "STARTGAME", "color")?)?;
                let rest: Vec<&str> = parts.collect();
                let opponent = (!rest.is_empty()).then(|| rest.join(" "));
                Ok(Command::StartGame { color, opponent })
            }
            "MOVE" => {
                let from: Square = required(&mut parts, "MOVE", "from")?.parse()?;
                let to: Square = required(&mut parts, "MOVE", "to")?.parse()?;
                Ok(Command::Move { from, to })
            }
            "PROMOTE" => {
                let from: Square = required(&mut parts, "PROMOTE", "from")?.parse()?;
                let to: Square = required(&mut parts, "PROMOTE", "to")?.parse()?;
                let code = required(&mut parts, "PROMOTE", "code")?;
                let code: u8 = code
                    .parse()
                    .map_err(|_| ProtocolError::InvalidCode(code.to_string()))?;
                let kind = PieceKind::from_code(code)?.promotion()?;
                Ok(Command::Promote { from, to, kind })
            }
            "ENDGAME" => {
                let code = required(&mut parts, "ENDGAME", "result")?;
                let reason = required(&mut parts, "ENDGAME", "reason")?;
                let invalid = || ProtocolError::InvalidResult {
                    code: code.to_string(),
                    reason: reason.to_string(),
                };
                let value: i8 = code.parse().map_err(|_| invalid())?;
                let result = GameResult::from_code(value, reason).ok_or_else(invalid)?;
                Ok(Command::EndGame { result })
            }
            "RESIGN" => Ok(Command::Resign),
            "PING" => Ok(Command::Ping),
            "QUIT" => Ok(Command::Quit),
            _ => Ok(Command::Unknown(input.to_string())),
        }
    }
}

fn required<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ProtocolError> {
    parts
        .next()
        .ok_or(ProtocolError::MissingArgument { command, argument })
}

fn parse_color(token: &str) -> Result<Color, ProtocolError> {
    match token.to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        _ => Err(ProtocolError::InvalidColor(token.to_string())),
    }
}

/// Events sent to the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A move was accepted.
    Move { from: Square, to: Square },
    /// A promotion was accepted.
    Promote {
        from: Square,
        to: Square,
        kind: PieceKind,
    },
    /// A move was refused and the board is unchanged.
    Rejected {
        from: Square,
        to: Square,
        reason: &'static str,
    },
    EndGame(GameResult),
    Pong,
    /// An inbound line could not be parsed and was dropped.
    Error(String),
}

impl Event {
    /// Formats the event as one protocol line.
    pub fn to_line(&self) -> String {
        match self {
            Event::Move { from, to } => format!("MOVE {} {}", from, to),
            Event::Promote { from, to, kind } => {
                format!("PROMOTE {} {} {}", from, to, kind.code())
            }
            Event::Rejected { from, to, reason } => format!("REJECTED {} {} {}", from, to, reason),
            Event::EndGame(result) => format!("ENDGAME {} {}", result.code(), result.reason()),
            Event::Pong => "PONG".to_string(),
            Event::Error(message) => format!("ERROR {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::{DrawReason, WinReason};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn parse_moves() {
        assert_eq!(
            Command::parse("MOVE e2 e4").unwrap(),
            Command::Move {
                from: sq("e2"),
                to: sq("e4")
            }
        );
        assert_eq!(
            Command::parse("  promote e7 e8 1\n").unwrap(),
            Command::Promote {
                from: sq("e7"),
                to: sq("e8"),
                kind: PieceKind::Knight
            }
        );
    }

    #[test]
    fn parse_rejects_bad_arguments() {
        assert_eq!(
            Command::parse("MOVE e2"),
            Err(ProtocolError::MissingArgument {
                command: "MOVE",
                argument: "to"
            })
        );
        assert!(matches!(
            Command::parse("MOVE e2 e9"),
            Err(ProtocolError::Square(SquareError::InvalidNotation(_)))
        ));
        assert_eq!(
            Command::parse("PROMOTE e7 e8 5"),
            Err(ProtocolError::Piece(PieceError::NotPromotable(PieceKind::King)))
        );
        assert_eq!(
            Command::parse("PROMOTE e7 e8 0"),
            Err(ProtocolError::Piece(PieceError::NotPromotable(PieceKind::Pawn)))
        );
        assert_eq!(
            Command::parse("PROMOTE e7 e8 q"),
            Err(ProtocolError::InvalidCode("q".to_string()))
        );
    }

    #[test]
    fn parse_start_and_end() {
        assert_eq!(
            Command::parse("STARTGAME black Deep Thought").unwrap(),
            Command::StartGame {
                color: Color::Black,
                opponent: Some("Deep Thought".to_string())
            }
        );
        assert_eq!(
            Command::parse("STARTGAME white").unwrap(),
            Command::StartGame {
                color: Color::White,
                opponent: None
            }
        );
        assert!(matches!(
            Command::parse("STARTGAME red"),
            Err(ProtocolError::InvalidColor(_))
        ));
        assert_eq!(
            Command::parse("ENDGAME -1 time").unwrap(),
            Command::EndGame {
                result: GameResult::Win {
                    winner: Color::Black,
                    reason: WinReason::Timeout
                }
            }
        );
        assert!(matches!(
            Command::parse("ENDGAME 0 checkmate"),
            Err(ProtocolError::InvalidResult { .. })
        ));
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(Command::parse("PING").unwrap(), Command::Ping);
        assert_eq!(Command::parse("resign").unwrap(), Command::Resign);
        assert_eq!(Command::parse("QUIT").unwrap(), Command::Quit);
        assert_eq!(
            Command::parse("HELLO there").unwrap(),
            Command::Unknown("HELLO there".to_string())
        );
        assert_eq!(Command::parse("").unwrap(), Command::Unknown(String::new()));
    }

    #[test]
    fn event_lines() {
        assert_eq!(
            Event::Move {
                from: sq("g1"),
                to: sq("f3")
            }
            .to_line(),
            "MOVE g1 f3"
        );
        assert_eq!(
            Event::Promote {
                from: sq("a7"),
                to: sq("a8"),
                kind: PieceKind::Queen
            }
            .to_line(),
            "PROMOTE a7 a8 4"
        );
        assert_eq!(
            Event::Rejected {
                from: sq("e2"),
                to: sq("e5"),
                reason: "illegal_move"
            }
            .to_line(),
            "REJECTED e2 e5 illegal_move"
        );
        assert_eq!(
            Event::EndGame(GameResult::Draw(DrawReason::FiftyMoveRule)).to_line(),
            "ENDGAME 0 50_move_draw"
        );
        assert_eq!(Event::Pong.to_line(), "PONG");
        assert_eq!(
            Event::Error("invalid piece code 'q'".to_string()).to_line(),
            "ERROR invalid piece code 'q'"
        );
    }
}
