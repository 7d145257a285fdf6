//! Session-backed CSRF protection for HTML forms.
//!
//! Every rendered form carries a hidden `_csrf` field holding the token
//! stored in the session; mutating handlers compare the submitted value
//! against the session copy and reject mismatches with 403.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use rand::Rng;
use tower_sessions::Session;

use crate::models::session_keys;

const TOKEN_LENGTH: usize = 32;

/// Extractor that yields the session's CSRF token, minting one on first use.
///
/// Handlers that render forms embed `token.0` as the hidden `_csrf` field.
pub struct CsrfToken(pub String);

/// Rejection when the session is unavailable.
pub struct CsrfRejection;

impl IntoResponse for CsrfRejection {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable").into_response()
    }
}

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = CsrfRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(CsrfRejection)?;

        if let Ok(Some(token)) = session.get::<String>(session_keys::CSRF_TOKEN).await {
            return Ok(Self(token));
        }

        let token = generate_token();
        session
            .insert(session_keys::CSRF_TOKEN, &token)
            .await
            .map_err(|_| CsrfRejection)?;

        Ok(Self(token))
    }
}

/// Verify a submitted form token against the session copy.
///
/// # Errors
///
/// Returns `AppError::Forbidden` on a missing or mismatched token.
pub async fn verify_csrf(session: &Session, submitted: &str) -> crate::error::Result<()> {
    let stored: Option<String> = session
        .get(session_keys::CSRF_TOKEN)
        .await
        .map_err(|e| crate::error::AppError::Internal(format!("session read failed: {e}")))?;

    match stored {
        Some(token) if constant_time_eq(token.as_bytes(), submitted.as_bytes()) => Ok(()),
        _ => Err(crate::error::AppError::Forbidden(
            "Invalid CSRF token".to_string(),
        )),
    }
}

/// Generate a random alphanumeric token.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Compare without leaking the mismatch position through timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
