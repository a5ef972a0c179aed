//! Core configuration.
//!
//! # Responsibility
//! - Describe tunables for logging, the task tree and the timeline.
//! - Stay format-agnostic: callers deserialize with any serde backend.
//!
//! # Invariants
//! - Every section has a usable default; missing keys fall back to it.
//! - `validate()` must pass before the config is handed to `init_logging_from`.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::model::task::Timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_UNNAMED_LABEL: &str = "Unnamed task";

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `tree.unnamed_label` is blank after trim.
    EmptyUnnamedLabel,
    /// `logging.level` is not one of trace|debug|info|warn|error.
    InvalidLogLevel(String),
    /// `logging.log_dir` is empty or relative.
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUnnamedLabel => write!(f, "tree.unnamed_label must not be blank"),
            Self::InvalidLogLevel(message) => write!(f, "invalid logging.level: {message}"),
            Self::InvalidLogDir(message) => write!(f, "invalid logging.log_dir: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub tree: TreeConfig,
    pub timeline: TimelineConfig,
}

impl CoreConfig {
    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level).map_err(ConfigError::InvalidLogLevel)?;
        if let Some(log_dir) = &self.logging.log_dir {
            normalize_log_dir(log_dir).map_err(ConfigError::InvalidLogDir)?;
        }
        if self.tree.unnamed_label.trim().is_empty() {
            return Err(ConfigError::EmptyUnnamedLabel);
        }
        Ok(())
    }
}

/// File logging settings. `log_dir = None` leaves logging uninitialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Task tree settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Prefix of generated labels; the tree appends its own counter.
    pub unnamed_label: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            unnamed_label: DEFAULT_UNNAMED_LABEL.to_string(),
        }
    }
}

/// Time axis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Zero point of the numeric axis.
    pub epoch: Timestamp,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            epoch: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}
