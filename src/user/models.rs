//! User data model and the static schema description behind filter
//! validation.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub session_id: Option<String>,
    pub reset_token: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
}

/// Columns of the `users` table.
///
/// Filter and update sets are validated against this enumeration, so an
/// unknown field name never reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Email,
    HashedPassword,
    SessionId,
    ResetToken,
    IsAdmin,
    CreatedAt,
}

impl UserField {
    /// Every column, in table order.
    pub const ALL: [UserField; 7] = [
        UserField::Id,
        UserField::Email,
        UserField::HashedPassword,
        UserField::SessionId,
        UserField::ResetToken,
        UserField::IsAdmin,
        UserField::CreatedAt,
    ];

    /// SQL column name.
    pub fn column(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Email => "email",
            UserField::HashedPassword => "hashed_password",
            UserField::SessionId => "session_id",
            UserField::ResetToken => "reset_token",
            UserField::IsAdmin => "is_admin",
            UserField::CreatedAt => "created_at",
        }
    }

    /// Whether `update_user` may assign this field.
    ///
    /// `id` is immutable once assigned and `created_at` belongs to the
    /// database.
    pub fn is_settable(self) -> bool {
        !matches!(self, UserField::Id | UserField::CreatedAt)
    }

    /// Whether the column admits SQL NULL.
    pub fn is_nullable(self) -> bool {
        matches!(self, UserField::SessionId | UserField::ResetToken)
    }

    /// Whether `value` has a kind this column can store or match on.
    ///
    /// `Null` is acceptable for any field in a filter position (it means
    /// `IS NULL`); assignment of `Null` is checked separately against
    /// [`UserField::is_nullable`].
    pub fn accepts(self, value: &FieldValue) -> bool {
        match (self, value) {
            (_, FieldValue::Null) => true,
            (UserField::Id, FieldValue::Int(_)) => true,
            (
                UserField::Email
                | UserField::HashedPassword
                | UserField::SessionId
                | UserField::ResetToken
                | UserField::CreatedAt,
                FieldValue::Text(_),
            ) => true,
            (UserField::IsAdmin, FieldValue::Bool(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl std::str::FromStr for UserField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(UserField::Id),
            "email" => Ok(UserField::Email),
            "hashed_password" => Ok(UserField::HashedPassword),
            "session_id" => Ok(UserField::SessionId),
            "reset_token" => Ok(UserField::ResetToken),
            "is_admin" => Ok(UserField::IsAdmin),
            "created_at" => Ok(UserField::CreatedAt),
            _ => Err(format!("unknown user field: {}", s)),
        }
    }
}

/// A value bound into a filter or update pair.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Bool(bool),
    Null,
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{:?}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Null => write!(f, "null"),
        }
    }
}
