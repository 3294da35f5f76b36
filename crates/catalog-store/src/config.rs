//! Database configuration
//!
//! Settings come from environment variables layered over defaults:
//!
//! | variable                   | default               |
//! |----------------------------|-----------------------|
//! | `DATABASE_URI`             | `sqlite://catalog.db` |
//! | `DATABASE_BUSY_TIMEOUT_MS` | `5000`                |

use catalog_core_types::Sensitive;
use config::{Config, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{config_error, Result};

pub const DEFAULT_DATABASE_URI: &str = "sqlite://catalog.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    database_uri: String,
    database_busy_timeout_ms: u64,
}

/// Connection settings
///
/// The URI is kept as `Sensitive` so that printing the config never leaks
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_uri: Sensitive<String>,
    pub busy_timeout: Duration,
}

impl DbConfig {
    pub fn new(database_uri: impl Into<String>) -> Self {
        Self {
            database_uri: Sensitive::new(database_uri.into()),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// Private in-memory database; gone when the connection closes
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default().try_parsing(true))
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Environment::default().try_parsing(true).source(Some(vars)))
    }

    fn load(env: Environment) -> Result<Self> {
        let raw: RawSettings = Config::builder()
            .set_default("database_uri", DEFAULT_DATABASE_URI)
            .and_then(|b| b.set_default("database_busy_timeout_ms", DEFAULT_BUSY_TIMEOUT_MS))
            .map_err(|e| config_error(e.to_string()))?
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| config_error(e.to_string()))?;

        if raw.database_uri.trim().is_empty() {
            return Err(config_error("DATABASE_URI is empty"));
        }

        Ok(Self {
            database_uri: Sensitive::new(raw.database_uri),
            busy_timeout: Duration::from_millis(raw.database_busy_timeout_ms),
        })
    }

    /// Resolve the URI into a target
    ///
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
    /// `sqlite:<path>` and bare paths. Any other `scheme://` is rejected;
    /// the error names the scheme but never the full URI.
    pub fn target(&self) -> Result<DbTarget> {
        let uri = self.database_uri.expose().trim();

        if uri == "sqlite::memory:" || uri == ":memory:" {
            return Ok(DbTarget::Memory);
        }
        if let Some(path) = uri.strip_prefix("sqlite://") {
            return file_target(path);
        }
        if let Some((scheme, _)) = uri.split_once("://") {
            return Err(config_error(format!(
                "unsupported database scheme '{}'",
                scheme
            )));
        }
        if let Some(path) = uri.strip_prefix("sqlite:") {
            return file_target(path);
        }
        file_target(uri)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URI)
    }
}

fn file_target(path: &str) -> Result<DbTarget> {
    if path.is_empty() {
        return Err(config_error("database path is empty"));
    }
    Ok(DbTarget::File(PathBuf::from(path)))
}
