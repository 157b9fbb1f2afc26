//! TOML configuration for the `lodging` binary.
//!
//! Every section and field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::BookingPolicy;
use crate::records::FileNames;

/// Configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the record files live.
    pub data: DataConfig,
    /// Booking limits.
    pub policy: PolicyConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Data directory and record file names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub hosts: String,
    pub guests: String,
    pub lodgings: String,
    pub bookings: String,
    pub history: String,
    pub cancellations: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        let names = FileNames::default();
        Self {
            dir: PathBuf::from("data"),
            hosts: names.hosts,
            guests: names.guests,
            lodgings: names.lodgings,
            bookings: names.bookings,
            history: names.history,
            cancellations: names.cancellations,
        }
    }
}

impl DataConfig {
    pub fn file_names(&self) -> FileNames {
        FileNames {
            hosts: self.hosts.clone(),
            guests: self.guests.clone(),
            lodgings: self.lodgings.clone(),
            bookings: self.bookings.clone(),
            history: self.history.clone(),
            cancellations: self.cancellations.clone(),
        }
    }
}

/// Booking limits, mirrored into [`BookingPolicy`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub max_nights: u16,
    pub max_notes_len: usize,
    pub horizon_years: u8,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = BookingPolicy::default();
        Self {
            max_nights: policy.max_nights,
            max_notes_len: policy.max_notes_len,
            horizon_years: policy.horizon_years,
        }
    }
}

impl From<PolicyConfig> for BookingPolicy {
    fn from(config: PolicyConfig) -> Self {
        Self {
            max_nights: config.max_nights,
            max_notes_len: config.max_notes_len,
            horizon_years: config.horizon_years,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"lodging_store=debug"`.
    pub level: String,
    pub format: LogFormat,
    /// `"stdout"`, `"stderr"`, or a file path to append to.
    pub output: String,
    /// ANSI colors, only applied when the output is a terminal.
    pub color: bool,
    /// Include the event target.
    pub target: bool,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
            output: "stderr".to_string(),
            color: true,
            target: false,
            timestamps: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
