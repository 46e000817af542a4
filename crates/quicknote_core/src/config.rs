//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database location, logging options and service tunables.
//! - Keep parsing separate from `std::env` so it can be tested.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Malformed values are rejected, never silently replaced.

use crate::service::note_service::{ServiceConfig, DEFAULT_PAGE_SIZE};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "QUICKNOTE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "QUICKNOTE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "QUICKNOTE_LOG_DIR";
pub const ENV_DEFAULT_PAGE_SIZE: &str = "QUICKNOTE_DEFAULT_PAGE_SIZE";
pub const ENV_VALIDATE_PATCH: &str = "QUICKNOTE_VALIDATE_PATCH";

const DEFAULT_DB_FILE_NAME: &str = "quicknote.sqlite3";

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub service: ServiceConfig,
}

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

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let db_path = value(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = value(ENV_LOG_LEVEL)
            .unwrap_or_else(|| crate::logging::default_log_level().to_string());
        let log_dir = value(ENV_LOG_DIR).map(PathBuf::from);

        let default_page_size = match value(ENV_DEFAULT_PAGE_SIZE) {
            Some(raw) => parse_page_size(&raw)?,
            None => DEFAULT_PAGE_SIZE,
        };
        let validate_partial_updates = match value(ENV_VALIDATE_PATCH) {
            Some(raw) => parse_bool(ENV_VALIDATE_PATCH, &raw)?,
            None => true,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            service: ServiceConfig {
                default_page_size,
                validate_partial_updates,
            },
        })
    }
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_DEFAULT_PAGE_SIZE,
            value: raw.to_string(),
            expected: "a positive integer",
        }),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            expected: "true|false",
        }),
    }
}
