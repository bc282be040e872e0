//! Runtime configuration for hosts embedding the tracker.
//!
//! Values come from `EXAMTRACK_*` environment variables; anything unset keeps
//! its default. Blank values count as unset.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "EXAMTRACK_DB_PATH";
pub const LOG_DIR_ENV: &str = "EXAMTRACK_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "EXAMTRACK_LOG_LEVEL";
pub const MIGRATION_INTERVAL_ENV: &str = "EXAMTRACK_MIGRATION_INTERVAL_SECS";
pub const SEED_DEFAULTS_ENV: &str = "EXAMTRACK_SEED_DEFAULTS";

pub const DEFAULT_DB_FILE_NAME: &str = "examtrack.sqlite3";
pub const DEFAULT_MIGRATION_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid value `{value}` for {key}; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
    pub migration_interval: Duration,
    /// Seed example exams when no upcoming collection is stored.
    pub seed_defaults: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level(),
            migration_interval: DEFAULT_MIGRATION_INTERVAL,
            seed_defaults: true,
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&level).map_err(|_| ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                value: level.clone(),
                expected: "trace|debug|info|warn|error",
            })?;
        }
        if let Some(raw) = read(MIGRATION_INTERVAL_ENV) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: MIGRATION_INTERVAL_ENV,
                    value: raw.clone(),
                    expected: "a positive number of seconds",
                })?;
            config.migration_interval = Duration::from_secs(secs);
        }
        if let Some(raw) = read(SEED_DEFAULTS_ENV) {
            config.seed_defaults = parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: SEED_DEFAULTS_ENV,
                value: raw.clone(),
                expected: "true|false",
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
