//! User account model.

use chrono::{DateTime, Utc};
use pawshop_core::{Email, UserId};

/// A registered shop user.
///
/// The password hash and token columns live on the same row but are only
/// surfaced by the repository methods that need them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// A user row joined with its password hash, for credential checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithPassword {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
}
