//! Store configuration.
//!
//! Settings come from defaults, an optional TOML file, and `USERDB__*`
//! environment variables, in that order of precedence (later wins).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::StoreResult;

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    pub path: PathBuf,
    /// Maximum pool connections.
    pub max_connections: u32,
    /// Seconds to wait on a locked database before failing.
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("users.db"),
            max_connections: 5,
            busy_timeout_secs: 30,
        }
    }
}

/// Top-level store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database: DatabaseConfig,
}

impl StoreConfig {
    /// Load configuration from an optional TOML file plus environment
    /// overrides (`USERDB__DATABASE__PATH` and friends).
    pub fn load(file: Option<&Path>) -> StoreResult<Self> {
        let mut builder = Config::builder()
            .set_default("database.path", "users.db")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("database.busy_timeout_secs", 30_i64)?;

        if let Some(path) = file {
            builder =
                builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let built = builder
            .add_source(Environment::with_prefix("USERDB").separator("__"))
            .build()?;

        Ok(built.try_deserialize()?)
    }
}
