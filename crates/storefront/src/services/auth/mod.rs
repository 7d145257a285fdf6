//! Authentication service.
//!
//! Handles registration, password login, password resets, and API token
//! issuance.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use secrecy::SecretString;
use sqlx::PgPool;

use pawshop_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;
use crate::services::token;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 5;

/// Length of the per-user API key generated at registration.
const API_KEY_LENGTH: usize = 32;

/// Raw entropy bytes behind a password reset token.
const RESET_TOKEN_BYTES: usize = 32;

/// How long a password reset token stays valid.
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email, password, and confirmation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ValidationFailed` if any form field is invalid.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| {
            AuthError::ValidationFailed("Please enter a valid email.".to_string())
        })?;
        validate_password(password)?;
        if password != confirm_password {
            return Err(AuthError::ValidationFailed(
                "Passwords have to match!".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        let api_key = generate_api_key();

        let user = self
            .users
            .create(&email, &password_hash, &api_key)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Database(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password alike.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let row = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &row.password_hash)?;

        self.users
            .get_by_id(row.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Start a password reset for an email address.
    ///
    /// Returns `None` for an unknown email; the caller shows a flash
    /// message either way so the form cannot probe registered addresses.
    /// On success the generated token is already persisted with its
    /// expiry and ready to be emailed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Database` if the token cannot be stored.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };
        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };

        let reset_token = generate_reset_token();
        let expires_at: DateTime<Utc> = Utc::now() + RESET_TOKEN_TTL;
        self.users
            .set_reset_token(user.id, &reset_token, expires_at)
            .await?;

        Ok(Some((user, reset_token)))
    }

    /// Find the user a reset token belongs to, if it is still valid.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for an unknown or expired token.
    pub async fn find_reset_user(&self, reset_token: &str) -> Result<User, AuthError> {
        self.users
            .get_by_reset_token(reset_token)
            .await?
            .ok_or(AuthError::TokenExpired)
    }

    /// Complete a password reset: re-hash and clear the token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ValidationFailed` for a weak password.
    /// Returns `AuthError::TokenExpired` if the id/token pair no longer
    /// matches an unexpired row.
    pub async fn complete_password_reset(
        &self,
        user_id: UserId,
        reset_token: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .complete_password_reset(user_id, reset_token, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::TokenExpired,
                other => AuthError::Database(other),
            })
    }

    /// Issue a signed API token for email/password credentials.
    ///
    /// The token is persisted on the user row; only the most recently
    /// issued token verifies, so this also revokes earlier tokens.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for bad credentials.
    pub async fn issue_api_token(
        &self,
        email: &str,
        password: &str,
        jwt_secret: &SecretString,
    ) -> Result<(User, String), AuthError> {
        let user = self.login(email, password).await?;

        let api_token = token::sign(user.id, jwt_secret)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        self.users.set_api_token(user.id, &api_token).await?;

        Ok((user, api_token))
    }
}

/// Validate a password: at least 5 characters, letters and digits only.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH || !password.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(AuthError::ValidationFailed(
            "Please enter a password with only numbers and text and at least 5 characters."
                .to_string(),
        ));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Random alphanumeric API key for a new account.
fn generate_api_key() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(API_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Random url-safe password reset token.
fn generate_reset_token() -> String {
    let bytes: [u8; RESET_TOKEN_BYTES] = rand::rng().random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_accepts_alphanumeric() {
        assert!(validate_password("abc12").is_ok());
        assert!(validate_password("longerpassword123").is_ok());
    }

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(validate_password("ab1").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_password_rejects_symbols() {
        assert!(validate_password("abc 12").is_err());
        assert!(validate_password("abc!def").is_err());
    }

    #[test]
    fn test_validation_message() {
        let err = validate_password("ab").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter a password with only numbers and text and at least 5 characters."
        );
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("secret99").unwrap();
        assert!(verify_password("secret99", &hash).is_ok());
        assert!(verify_password("wrong99", &hash).is_err());
    }

    #[test]
    fn test_uniform_invalid_credentials_message() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password."
        );
    }

    #[test]
    fn test_api_key_shape() {
        let key = generate_api_key();
        assert_eq!(key.len(), API_KEY_LENGTH);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_reset_token_is_url_safe() {
        let token = generate_reset_token();
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
        assert!(token.len() >= 40);
    }

    #[test]
    fn test_reset_tokens_differ() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }
}
