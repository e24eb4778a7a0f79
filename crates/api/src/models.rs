//! Database row types and request/response bodies

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// A user account row. Carries the stored password hash and therefore
/// never implements `Serialize`; responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

/// Public representation of a user account.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// OAuth2 password-grant style login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Distinguishes an absent field from an explicit `null`: absent
/// deserializes to `None`, `null` to `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    /// Absent keeps the current value; explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub full_name: Option<Option<String>>,
    /// New plaintext password; re-hashed before storage.
    pub password: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: i64,
    pub student_no: String,
    pub name: String,
    pub grade: Option<String>,
    pub major: Option<String>,
    pub class_name: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct StudentCreateRequest {
    pub student_no: String,
    pub name: String,
    pub grade: Option<String>,
    pub major: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentUpdateRequest {
    pub student_no: Option<String>,
    pub name: Option<String>,
    /// Absent keeps the current value; explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub grade: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub major: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub class_name: Option<Option<String>>,
}

/// Largest page a list endpoint will return.
pub const MAX_LIMIT: i64 = 100;

/// Offset/limit pagination parameters. Raw values are clamped through
/// the accessors; negative or oversized input never reaches the query.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    offset: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

impl ListParams {
    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(0, MAX_LIMIT)
    }
}

fn default_limit() -> i64 {
    MAX_LIMIT
}
