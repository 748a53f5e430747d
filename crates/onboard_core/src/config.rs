//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve the data directory, log directory and log level.
//! - Read `ONBOARD_*` environment variables; explicit overrides win.
//!
//! # Invariants
//! - Resolved directories are absolute.
//! - The log level is always one of the canonical level names.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "ONBOARD_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "ONBOARD_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ONBOARD_LOG_DIR";

/// SQLite file inside the data directory.
pub const DB_FILE_NAME: &str = "onboard.sqlite3";
const DEFAULT_DATA_DIR: &str = ".onboard";
const LOG_SUBDIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPath(&'static str),
    CurrentDir(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath(name) => write!(f, "{name} must not be empty"),
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
            Self::InvalidLogLevel(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    data_dir: PathBuf,
    log_dir: Option<PathBuf>,
    log_level: &'static str,
}

impl AppConfig {
    /// Configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_dir = match value(DATA_DIR_ENV) {
            Some(dir) => absolute(Path::new(dir.trim()))?,
            None => absolute(Path::new(DEFAULT_DATA_DIR))?,
        };
        let log_dir = value(LOG_DIR_ENV)
            .map(|dir| absolute(Path::new(dir.trim())))
            .transpose()?;
        let log_level = match value(LOG_LEVEL_ENV) {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            data_dir,
            log_dir,
            log_level,
        })
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("data dir"));
        }
        self.data_dir = absolute(dir)?;
        Ok(self)
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// `ONBOARD_LOG_DIR` when set, else `<data_dir>/logs`.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_SUBDIR))
    }

    pub fn log_level(&self) -> &'static str {
        self.log_level
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|err| ConfigError::CurrentDir(err.to_string()))?;
    Ok(cwd.join(path))
}
