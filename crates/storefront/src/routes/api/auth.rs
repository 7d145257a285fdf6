//! API authentication handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

use super::error_response;

/// JSON login request body.
#[derive(Debug, Deserialize)]
pub struct ApiLoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` - exchange credentials for a signed token.
///
/// The issued token is also stored on the user row; issuing a new one
/// revokes all earlier tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<ApiLoginRequest>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool());
    match auth
        .issue_api_token(&body.email, &body.password, &state.config().jwt_secret)
        .await
    {
        Ok((user, token)) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "token": token,
                "userId": user.id,
            })),
        )
            .into_response()),
        Err(AuthError::InvalidCredentials) => Ok(error_response(
            StatusCode::UNAUTHORIZED,
            &AuthError::InvalidCredentials.to_string(),
        )),
        Err(other) => Err(other.into()),
    }
}
