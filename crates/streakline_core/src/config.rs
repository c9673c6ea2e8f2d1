//! TOML-based core configuration.
//!
//! ```toml
//! [database]
//! path = "/var/lib/streakline/habits.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/streakline"
//!
//! [ledger]
//! completion_window = 31
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use crate::logging::{default_log_level, normalize_level};
use crate::service::completion_ledger::{DEFAULT_COMPLETION_WINDOW, MAX_COMPLETION_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_DB_FILE_NAME: &str = "streakline.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Default number of entries returned by completion listings.
    #[serde(default = "default_completion_window")]
    pub completion_window: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            completion_window: DEFAULT_COMPLETION_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl CoreConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level).map_err(|err| ConfigError::Invalid {
            field: "logging.level",
            message: err.to_string(),
        })?;

        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid {
                    field: "logging.dir",
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }

        let window = self.ledger.completion_window;
        if window == 0 || window > MAX_COMPLETION_WINDOW {
            return Err(ConfigError::Invalid {
                field: "ledger.completion_window",
                message: format!("expected 1..={MAX_COMPLETION_WINDOW}, got {window}"),
            });
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database.path",
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE_NAME)
}

fn default_level() -> String {
    default_log_level().to_string()
}

fn default_completion_window() -> u32 {
    DEFAULT_COMPLETION_WINDOW
}
