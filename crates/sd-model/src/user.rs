//! User records.
//!
//! A user is the backend's account record. The same shape is returned by
//! the auth endpoints, the profile endpoints and the admin listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page::PageQuery;

/// A backend user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier.
    pub id: u64,
    /// Display/login name.
    pub username: String,
    /// Email address (the login identifier).
    pub email: String,
    /// Role name, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns the role, or `"user"` when the backend did not send one.
    #[must_use]
    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or("user")
    }
}

/// Body of `PUT /users/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    /// Returns true when the request would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Body of `PUT /users/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Filter for `GET /users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Pagination.
    pub page: PageQuery,
    /// Free-text search.
    pub keyword: Option<String>,
}

impl UserQuery {
    /// Query parameters in wire order, values unencoded.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.to_pairs();
        if let Some(keyword) = self.keyword.as_deref().filter(|k| !k.is_empty()) {
            pairs.push(("keyword", keyword.to_string()));
        }
        pairs
    }
}
