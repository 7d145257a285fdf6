//! JSON API route handlers.
//!
//! Every response carries a `success` boolean; errors leave as a
//! `{ "success": false, "message": ... }` envelope. Authentication is
//! bearer-token based (see [`crate::middleware::TokenAuth`]), never the
//! session cookie.

pub mod admin;
pub mod auth;
pub mod products;
pub mod users;

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

/// Build the JSON error envelope.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_envelope_carries_success_false() {
        let response = error_response(StatusCode::NOT_FOUND, "Product not found.");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Product not found."));
    }
}
