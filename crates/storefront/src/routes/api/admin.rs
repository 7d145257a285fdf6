//! API admin handlers.

use axum::{Json, extract::State, response::IntoResponse, response::Response};
use serde_json::json;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::TokenAuth;
use crate::state::AppState;

/// `GET /api/admin/products` - the token user's own products.
pub async fn products(
    State(state): State<AppState>,
    TokenAuth(user): TokenAuth,
) -> Result<Response> {
    let products = ProductRepository::new(state.pool())
        .list_owned(user.id)
        .await?;

    let products: Vec<_> = products
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id,
                "title": p.title,
                "price": p.price,
                "description": p.description,
                "imageUrl": state.config().absolute_image_url(&p.image_path),
            })
        })
        .collect();

    Ok(Json(json!({ "success": true, "products": products })).into_response())
}
