//! Embedded SQLite user store
//!
//! This library provides the persistence layer for an authentication
//! service: a [`Database`] handle over a local SQLite file and a
//! [`UserStore`] for adding, finding, and updating user records.

pub mod config;
pub mod db;
pub mod error;
pub mod user;

pub use config::{DatabaseConfig, StoreConfig};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use user::{FieldValue, User, UserField, UserStore};
