//! Session configuration loaded from TOML.
//!
//! Every field is optional; a missing file or an empty document yields a
//! one-minute game without increment, played as White.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Starting time and per-move increment, both in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeControlConfig {
    pub initial_seconds: u64,
    pub increment_seconds: u64,
}

impl Default for TimeControlConfig {
    fn default() -> Self {
        Self {
            initial_seconds: 60,
            increment_seconds: 0,
        }
    }
}

impl TimeControlConfig {
    pub fn initial(&self) -> Duration {
        Duration::from_secs(self.initial_seconds)
    }

    pub fn increment(&self) -> Duration {
        Duration::from_secs(self.increment_seconds)
    }
}

/// Top-level session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub time_control: TimeControlConfig,
    /// Color of the local player until a `STARTGAME` says otherwise.
    pub play_as_white: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_control: TimeControlConfig::default(),
            play_as_white: true,
        }
    }
}

impl SessionConfig {
    /// Loads the configuration at `path`, or the defaults when no path is
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if it is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
