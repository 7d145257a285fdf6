//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong password or user not found).
    ///
    /// The message is identical for both cases so login attempts cannot
    /// probe which addresses are registered.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("E-Mail exists already, please pick a different one.")]
    EmailTaken,

    /// Form input failed validation; the message is shown to the user.
    #[error("{0}")]
    ValidationFailed(String),

    /// Password reset or API token has expired.
    #[error("Unknown token or already expired.")]
    TokenExpired,

    /// Password reset or API token is malformed or revoked.
    #[error("Unknown token or already expired.")]
    TokenInvalid,

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    PasswordHash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}
