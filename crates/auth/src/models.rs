//! User model for the auth service.

use chrono::{DateTime, Utc};
use serde::Serialize;

use minimart_core::{Email, UserId, UserRole, Username};

/// A registered user.
///
/// The password hash lives only in the repository layer and is never
/// attached to this model, so serializing a `User` can never leak it.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Database ID.
    pub id: UserId,
    /// Unique username.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Role (`user` or `admin`).
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
