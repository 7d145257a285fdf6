//! Session-stored types.

use pawshop_core::{Email, UserId};
use serde::{Deserialize, Serialize};

/// Session keys used by the storefront.
pub mod session_keys {
    /// Key for the current logged-in user snapshot.
    pub const CURRENT_USER: &str = "current_user";
    /// Key for the per-session CSRF token.
    pub const CSRF_TOKEN: &str = "csrf_token";
    /// Key for one-shot flash messages.
    pub const FLASH: &str = "flash";
}

/// Immutable snapshot of the logged-in user, stored in the session.
///
/// Deliberately small: anything that can change (cart, products) is
/// re-read from the database on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
}
