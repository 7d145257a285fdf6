//! Bearer-token authentication for the JSON API.
//!
//! Verification is two explicit steps: the JWT signature must check out,
//! and the presented token must equal the one stored on the user row.
//! Storing a new token on login therefore revokes every earlier one.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::UserRepository;
use crate::models::CurrentUser;
use crate::services::token;
use crate::state::AppState;

/// Extractor that authenticates an API request via bearer token.
///
/// The token is read from the `Authorization: Bearer` header, falling
/// back to a `token` query parameter.
pub struct TokenAuth(pub CurrentUser);

/// Rejection for failed token authentication. Always a 401 JSON envelope.
pub struct TokenRejection;

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authenticated." })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for TokenAuth {
    type Rejection = TokenRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = extract_token(parts).ok_or(TokenRejection)?;

        // Step 1: signature and expiry
        let user_id =
            token::verify(&presented, &state.config().jwt_secret).map_err(|_| TokenRejection)?;

        // Step 2: equality with the stored token
        let users = UserRepository::new(state.pool());
        let stored = users
            .get_api_token(user_id)
            .await
            .map_err(|_| TokenRejection)?;
        if stored.as_deref() != Some(presented.as_str()) {
            return Err(TokenRejection);
        }

        let user = users
            .get_by_id(user_id)
            .await
            .map_err(|_| TokenRejection)?
            .ok_or(TokenRejection)?;

        Ok(Self(CurrentUser {
            id: user.id,
            email: user.email,
        }))
    }
}

/// Pull the token out of the request: bearer header first, query second.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(axum::http::header::AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return Some(token.to_owned());
    }

    let query = parts.uri.query()?;
    for pair in query.split('&') {
        if let Some(token) = pair.strip_prefix("token=") {
            return Some(token.to_owned());
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_for(uri: &str, auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(axum::http::header::AUTHORIZATION, auth);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let parts = parts_for("/api/admin/products", Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_from_query() {
        let parts = parts_for("/api/users/user?token=abc.def.ghi", None);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_header_wins_over_query() {
        let parts = parts_for("/api/users/user?token=query-token", Some("Bearer header-token"));
        assert_eq!(extract_token(&parts).as_deref(), Some("header-token"));
    }

    #[test]
    fn test_missing_token() {
        let parts = parts_for("/api/users/user", None);
        assert!(extract_token(&parts).is_none());
    }
}
