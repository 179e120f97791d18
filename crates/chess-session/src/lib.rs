//! Text-protocol session around the chess engine.
//!
//! A [`Session`] owns one [`chess_engine::Game`] and a [`Clock`]. It turns
//! protocol [`Command`]s into engine calls and reports what the peer should
//! see as [`Event`]s.
//!
//! # Protocol
//!
//! - `STARTGAME <white|black> [opponent]` - reset and start the clock
//! - `MOVE <from> <to>` / `PROMOTE <from> <to> <code>` - relayed back when accepted
//! - `ENDGAME <1|-1|0> <reason>` - sent when a result is fixed
//! - `RESIGN`, `PING` / `PONG`, `QUIT`

pub mod clock;
pub mod config;
pub mod protocol;
mod session;

pub use clock::Clock;
pub use config::{ConfigError, SessionConfig, TimeControlConfig};
pub use protocol::{Command, Event, ProtocolError};
pub use session::{GameSummary, Session};

use thiserror::Error;

/// Failures of the session binary.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
