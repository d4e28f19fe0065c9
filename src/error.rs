//! Typed errors for store operations.

use thiserror::Error;

/// Error type for user store operations.
///
/// Validation failures are reported before any SQL runs, so a rejected
/// filter or update never leaves partial state behind.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filter set was empty, named an unknown field, or carried a value of
    /// a kind the field cannot match on.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Update named a missing user, an unknown attribute, a read-only
    /// attribute, or a value the attribute cannot store.
    #[error("invalid update: {0}")]
    InvalidUpdate(String),

    /// No row matched the filter set.
    #[error("no matching user: {0}")]
    NotFound(String),

    /// Underlying driver failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl StoreError {
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }

    pub fn invalid_update(msg: impl Into<String>) -> Self {
        Self::InvalidUpdate(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
