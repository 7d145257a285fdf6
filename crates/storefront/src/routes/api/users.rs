//! API user handlers.

use axum::{Json, response::IntoResponse, response::Response};
use serde_json::json;

use crate::middleware::TokenAuth;

/// `GET /api/users/user?token=` - the authenticated user's profile.
pub async fn current_user(TokenAuth(user): TokenAuth) -> Response {
    Json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "email": user.email,
        }
    }))
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use pawshop_core::{Email, UserId};

    use crate::models::CurrentUser;

    #[tokio::test]
    async fn test_profile_envelope_carries_success_true() {
        let user = CurrentUser {
            id: UserId::new(7),
            email: Email::parse("buyer@example.com").unwrap(),
        };

        let response = current_user(TokenAuth(user)).await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], serde_json::json!(true));
        assert_eq!(body["user"]["id"], serde_json::json!(7));
        assert_eq!(body["user"]["email"], serde_json::json!("buyer@example.com"));
    }
}
