//! Database handle: pool creation and schema lifecycle.
//!
//! The handle is owned by the caller and injected into stores. Opening a
//! database resets the `users` schema, so data does not survive a reopen;
//! the store is scoped to one process lifetime by contract.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::StoreResult;

/// Schema for the user store, applied on every open.
const SCHEMA: &str = r#"
DROP TABLE IF EXISTS users;

CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    hashed_password TEXT NOT NULL,
    session_id TEXT,
    reset_token TEXT,
    is_admin BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_email ON users(email);
CREATE INDEX idx_users_session ON users(session_id);
"#;

/// Database connection pool plus schema lifecycle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) the database file and reset the schema.
    ///
    /// Parent directories are created if missing. The schema is dropped
    /// and recreated, so any rows from a previous open are discarded.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        Self::open_with(&DatabaseConfig {
            path: path.to_path_buf(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open the database described by `config`.
    pub async fn open_with(config: &DatabaseConfig) -> StoreResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            path: Some(config.path.clone()),
        };
        db.initialize_schema().await?;
        debug!(path = %config.path.display(), "opened user database");

        Ok(db)
    }

    /// Create an in-memory database (for tests and ephemeral use).
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // A second connection to :memory: would see a different, empty
        // database, so the pool is pinned to one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool, path: None };
        db.initialize_schema().await?;

        Ok(db)
    }

    /// Drop and recreate the schema.
    async fn initialize_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file path, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the database connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check if the database is healthy.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}
