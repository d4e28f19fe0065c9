//! User store: persistence operations for user records.

use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{FieldValue, User, UserField};
use crate::error::{StoreError, StoreResult};

/// Store owning persistence operations for user records.
///
/// The connection pool is injected at construction; the caller controls
/// its lifetime (see [`crate::db::Database`]).
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Create a store over an injected connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user and return it with the generated id populated.
    ///
    /// The insert is unconditional: no duplicate-email check is made.
    #[instrument(skip(self, hashed_password))]
    pub async fn add_user(&self, email: &str, hashed_password: &str) -> StoreResult<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, hashed_password)
            VALUES (?, ?)
            "#,
        )
        .bind(email)
        .bind(hashed_password)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, "inserted user");

        self.get(id).await?.ok_or_else(|| {
            StoreError::not_found(format!("user with id {} missing after insert", id))
        })
    }

    /// Return the first user matching every filter in `filters`.
    ///
    /// Field names are validated against [`UserField`] before any SQL
    /// runs: an empty filter set, an unknown name, or a value of a kind
    /// the field cannot match on is an [`StoreError::InvalidFilter`].
    /// A [`FieldValue::Null`] filter matches rows where the column is
    /// NULL. Row order beyond the storage default is unspecified.
    #[instrument(skip(self, filters))]
    pub async fn find_user_by(&self, filters: &[(&str, FieldValue)]) -> StoreResult<User> {
        let pairs = validate_filters(filters)?;

        let mut sql = String::from(
            "SELECT id, email, hashed_password, session_id, reset_token, is_admin, created_at \
             FROM users WHERE 1=1",
        );
        for (field, value) in &pairs {
            // Column names come from the enum, never from caller input.
            if matches!(value, FieldValue::Null) {
                sql.push_str(&format!(" AND {} IS NULL", field.column()));
            } else {
                sql.push_str(&format!(" AND {} = ?", field.column()));
            }
        }
        sql.push_str(" LIMIT 1");

        let mut query = sqlx::query_as::<_, User>(&sql);
        for (_, value) in &pairs {
            query = match value {
                FieldValue::Int(v) => query.bind(*v),
                FieldValue::Text(v) => query.bind(v.as_str()),
                FieldValue::Bool(v) => query.bind(*v),
                FieldValue::Null => query,
            };
        }

        let user = query.fetch_optional(&self.pool).await?;
        user.ok_or_else(|| StoreError::not_found(describe_filters(filters)))
    }

    /// Apply `changes` to the user with `id` in a single statement.
    ///
    /// The row must exist and every change must name a settable field of
    /// an acceptable kind, otherwise an [`StoreError::InvalidUpdate`] is
    /// returned and nothing is written. An empty change set is a no-op.
    #[instrument(skip(self, changes))]
    pub async fn update_user(&self, id: i64, changes: &[(&str, FieldValue)]) -> StoreResult<()> {
        if self.get(id).await?.is_none() {
            return Err(StoreError::invalid_update(format!(
                "user with id {} not found",
                id
            )));
        }

        let pairs = validate_changes(changes)?;
        if pairs.is_empty() {
            return Ok(());
        }

        let assignments: Vec<String> = pairs
            .iter()
            .map(|(field, _)| format!("{} = ?", field.column()))
            .collect();
        let sql = format!("UPDATE users SET {} WHERE id = ?", assignments.join(", "));

        let mut query = sqlx::query(&sql);
        for (_, value) in &pairs {
            query = match value {
                FieldValue::Int(v) => query.bind(*v),
                FieldValue::Text(v) => query.bind(v.as_str()),
                FieldValue::Bool(v) => query.bind(*v),
                FieldValue::Null => query.bind(None::<String>),
            };
        }
        query = query.bind(id);

        query.execute(&self.pool).await?;
        debug!(user_id = id, fields = pairs.len(), "updated user");

        Ok(())
    }

    /// Fetch a user by primary key.
    async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, session_id, reset_token, is_admin, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Validate a filter set against the schema description.
fn validate_filters<'a>(
    filters: &'a [(&'a str, FieldValue)],
) -> StoreResult<Vec<(UserField, &'a FieldValue)>> {
    if filters.is_empty() {
        return Err(StoreError::invalid_filter("no filter fields given"));
    }

    filters
        .iter()
        .map(|(name, value)| {
            let field: UserField = name.parse().map_err(StoreError::InvalidFilter)?;
            if !field.accepts(value) {
                return Err(StoreError::invalid_filter(format!(
                    "field {} does not accept {}",
                    field, value
                )));
            }
            Ok((field, value))
        })
        .collect()
}

/// Validate an update set against the schema description.
///
/// An empty set is valid and yields an empty result; the caller treats it
/// as a no-op.
fn validate_changes<'a>(
    changes: &'a [(&'a str, FieldValue)],
) -> StoreResult<Vec<(UserField, &'a FieldValue)>> {
    changes
        .iter()
        .map(|(name, value)| {
            let field: UserField = name.parse().map_err(|_| {
                StoreError::invalid_update(format!("user has no attribute {}", name))
            })?;
            if !field.is_settable() {
                return Err(StoreError::invalid_update(format!(
                    "user attribute {} cannot be updated",
                    field
                )));
            }
            if matches!(value, FieldValue::Null) {
                if !field.is_nullable() {
                    return Err(StoreError::invalid_update(format!(
                        "user attribute {} cannot be null",
                        field
                    )));
                }
            } else if !field.accepts(value) {
                return Err(StoreError::invalid_update(format!(
                    "user attribute {} does not accept {}",
                    field, value
                )));
            }
            Ok((field, value))
        })
        .collect()
}

/// Render a filter set for error messages.
fn describe_filters(filters: &[(&str, FieldValue)]) -> String {
    filters
        .iter()
        .map(|(name, value)| format!("{} = {}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}
