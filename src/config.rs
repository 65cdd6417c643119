//! TOML configuration
//!
//! Read from `<data-dir>/config.toml` unless another path is given. Every
//! field has a default, so a missing file or a partial one is fine; a file
//! that does not parse or holds out-of-range values is an error.
//!
//! ```toml
//! [storage]
//! backend = "sqlite"
//!
//! [tracking]
//! default_window_days = 14
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DayModeThresholds, ReminderWindows, SCORE_MAX};

/// File name looked up inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Largest accepted reporting window
pub const MAX_WINDOW_DAYS: u32 = 366;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where documents are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per collection
    #[default]
    Json,
    /// A single SQLite database file
    Sqlite,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(ConfigError::Invalid(format!(
                "unknown backend '{}', expected json or sqlite",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Window used by reports and rates when a call does not give one
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
    /// `done_at` threshold for new score habits
    #[serde(default = "default_score_done_at")]
    pub score_done_at: u8,
}

fn default_window_days() -> u32 {
    30
}
fn default_score_done_at() -> u8 {
    7
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
            score_done_at: default_score_done_at(),
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub day_mode: DayModeThresholds,
    #[serde(default)]
    pub reminders: ReminderWindows,
}

impl LedgerConfig {
    /// Parse and validate a TOML string
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load a config file, or use defaults if there is none
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = self.tracking.default_window_days;
        if window == 0 || window > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "tracking.default_window_days must be within 1..={}, got {}",
                MAX_WINDOW_DAYS, window
            )));
        }
        if self.tracking.score_done_at > SCORE_MAX {
            return Err(ConfigError::Invalid(format!(
                "tracking.score_done_at must be within 0..={}, got {}",
                SCORE_MAX, self.tracking.score_done_at
            )));
        }

        self.day_mode
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("day_mode: {}", e)))?;
        self.reminders
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("reminders: {}", e)))?;

        Ok(())
    }
}
