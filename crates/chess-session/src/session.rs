//! One game driven by protocol commands.

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::protocol::{Command, Event, ProtocolError};
use chess_core::{Color, Square};
use chess_engine::{EngineError, Game, GameResult};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Serializable record of a game, printed when it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub opponent: Option<String>,
    pub local_color: String,
    pub moves: Vec<String>,
    pub notation: String,
    /// "1-0", "0-1", "1/2-1/2", or empty while the game is running.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub final_position: String,
    pub clock: String,
}

pub struct Session {
    config: SessionConfig,
    game: Game,
    clock: Clock,
    local_color: Color,
    opponent: Option<String>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let clock = Clock::from_config(&config.time_control);
        let local_color = Color::from_is_white(config.play_as_white);
        Self {
            config,
            game: Game::new(),
            clock,
            local_color,
            opponent: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn local_color(&self) -> Color {
        self.local_color
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Parses and applies one protocol line.
    pub fn handle_line(&mut self, line: &str) -> Vec<Event> {
        self.handle_parsed(line, Command::parse(line))
    }

    /// Applies an already parsed line. A parse failure leaves the game
    /// untouched and is answered with an `ERROR` event.
    pub fn handle_parsed(
        &mut self,
        line: &str,
        parsed: Result<Command, ProtocolError>,
    ) -> Vec<Event> {
        match parsed {
            Ok(command) => self.handle(command),
            Err(err) => {
                warn!(%line, %err, "malformed command");
                vec![Event::Error(format!("{}: {}", err, line.trim()))]
            }
        }
    }

    /// Applies one command and returns the events to send back.
    pub fn handle(&mut self, command: Command) -> Vec<Event> {
        debug!(?command, "command received");
        match command {
            Command::StartGame { color, opponent } => {
                self.start(color, opponent);
                Vec::new()
            }
            Command::Move { from, to } => {
                let outcome = self.game.make_move(from, to);
                self.after_move(from, to, outcome, Event::Move { from, to })
            }
            Command::Promote { from, to, kind } => {
                let outcome = self.game.promote(from, to, kind);
                self.after_move(from, to, outcome, Event::Promote { from, to, kind })
            }
            Command::EndGame { result } => {
                match self.game.conclude(result) {
                    Ok(result) => {
                        self.clock.stop();
                        info!(%result, "game ended by peer");
                    }
                    Err(err) => warn!(%err, "ignoring ENDGAME"),
                }
                Vec::new()
            }
            Command::Resign => match self.game.resign(self.local_color) {
                Ok(result) => self.finished(result),
                Err(err) => {
                    warn!(%err, "ignoring RESIGN");
                    Vec::new()
                }
            },
            Command::Ping => vec![Event::Pong],
            Command::Quit => Vec::new(),
            Command::Unknown(line) => {
                if !line.is_empty() {
                    warn!(%line, "unknown command");
                }
                Vec::new()
            }
        }
    }

    /// Advances the clock. Returns the timeout result if a flag fell.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Event> {
        let flagged = self.clock.tick(elapsed)?;
        match self.game.time_out(flagged) {
            Ok(result) => {
                info!(side = %flagged, "flag fell");
                Some(Event::EndGame(result))
            }
            Err(_) => None,
        }
    }

    pub fn summary(&self) -> GameSummary {
        let result = self.game.result();
        GameSummary {
            opponent: self.opponent.clone(),
            local_color: self.local_color.to_string(),
            moves: self.game.recorder().tokens().to_vec(),
            notation: self.game.notation(),
            outcome: self.game.outcome().token().to_string(),
            result_code: result.map(GameResult::code),
            reason: result.map(|r| r.reason().to_string()),
            final_position: self.game.board().digest().to_string(),
            clock: self.clock.to_string(),
        }
    }

    fn start(&mut self, color: Color, opponent: Option<String>) {
        self.game.reset();
        self.clock.reset();
        self.clock.start();
        self.local_color = color;
        info!(%color, opponent = opponent.as_deref().unwrap_or("-"), "game started");
        self.opponent = opponent;
    }

    fn after_move(
        &mut self,
        from: Square,
        to: Square,
        outcome: Result<(), EngineError>,
        relay: Event,
    ) -> Vec<Event> {
        if let Err(err) = outcome {
            warn!(%from, %to, %err, "move rejected");
            return vec![Event::Rejected {
                from,
                to,
                reason: rejection_reason(&err),
            }];
        }
        self.clock.hit();
        let mut events = vec![relay];
        if let Some(result) = self.game.result() {
            events.extend(self.finished(result));
        }
        events
    }

    fn finished(&mut self, result: GameResult) -> Vec<Event> {
        self.clock.stop();
        vec![Event::EndGame(result)]
    }
}

fn rejection_reason(err: &EngineError) -> &'static str {
    match err {
        EngineError::IllegalMove { .. } => "illegal_move",
        EngineError::PromotionRequired { .. } => "promotion_required",
        EngineError::IllegalArgument(_) => "illegal_argument",
        EngineError::GameOver => "game_over",
        _ => "invalid",
    }
}
