//! Signed API tokens for the JSON API.
//!
//! Tokens are JWTs carrying the user id and an expiry. Signature
//! verification alone is not sufficient to authenticate; callers must
//! also compare against the token stored on the user row (see
//! [`crate::middleware::TokenAuth`]).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pawshop_core::UserId;

/// How long an issued API token stays valid.
const TOKEN_TTL: Duration = Duration::hours(1);

/// Errors from signing or verifying an API token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,
    /// The token is malformed or the signature does not verify.
    #[error("token invalid")]
    Invalid,
    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The user id.
    sub: i32,
    /// Expiry as a unix timestamp.
    exp: i64,
}

/// Sign a token for a user, valid for one hour.
///
/// # Errors
///
/// Returns `TokenError::Signing` if encoding fails.
pub fn sign(user_id: UserId, secret: &SecretString) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user_id.as_i32(),
        exp: (Utc::now() + TOKEN_TTL).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify a token's signature and expiry, returning the user id.
///
/// # Errors
///
/// Returns `TokenError::Expired` for an expired token and
/// `TokenError::Invalid` for anything else that fails verification.
pub fn verify(token: &str, secret: &SecretString) -> Result<UserId, TokenError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    Ok(UserId::new(data.claims.sub))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kJ8#mN2$pQ5&rS9!tU3@vW6^xY1*zA4%")
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let token = sign(UserId::new(42), &secret()).unwrap();
        let user_id = verify(&token, &secret()).unwrap();
        assert_eq!(user_id, UserId::new(42));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(UserId::new(42), &secret()).unwrap();
        let other = SecretString::from("aB7#cD1$eF5&gH9!iJ3@kL6^mN2*oP8%");
        assert!(matches!(
            verify(&token, &other),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            verify("not.a.token", &secret()),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Hand-roll a claim that expired an hour ago
        let claims = Claims {
            sub: 7,
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret().expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verify(&token, &secret()),
            Err(TokenError::Expired)
        ));
    }
}
