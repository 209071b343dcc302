//! User models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role carried by a user record
///
/// Only `admin` unlocks anything in the console. Unrecognized roles are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::Other(raw) => raw,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" | "" => UserRole::User,
            "admin" => UserRole::Admin,
            _ => UserRole::Other(raw),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// User record as returned by `GET /users/admin`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, with = "crate::models::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Signed-in user as returned by `GET /users/me`
///
/// The API leaves the role out of this response, so `role` is usually `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default, with = "crate::models::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CurrentUser {
    /// Role for display, `unknown` when the API did not send one
    pub fn role_label(&self) -> &str {
        self.role.as_ref().map_or("unknown", UserRole::as_str)
    }
}

impl From<UserRecord> for CurrentUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: Some(user.role),
            created_at: user.created_at,
        }
    }
}

/// Body of `PUT /users/{id}`
///
/// `password` is left out of the JSON when `None`, which tells the API to keep the
/// stored secret.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// Body of `POST /users/`
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}
