//! API product handlers.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use pawshop_core::ProductId;

use crate::db::{ProductRepository, products::NewProduct};
use crate::error::{AppError, Result};
use crate::middleware::TokenAuth;
use crate::routes::admin::{ProductForm, validate_fields};
use crate::services::images;
use crate::state::AppState;

use super::error_response;

/// Default limit for the top-rated listing, effectively "all".
const DEFAULT_TOP_RATED_LIMIT: i64 = 999;

/// Query parameters for the top-rated listing.
#[derive(Debug, Deserialize)]
pub struct TopRatedQuery {
    pub limit: Option<i64>,
}

/// JSON body for the like toggle.
#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub value: i32,
}

/// `GET /api/products/categories` - the fixed category list.
pub async fn categories(State(state): State<AppState>) -> Result<Response> {
    let categories = ProductRepository::new(state.pool()).list_categories().await?;

    Ok(Json(json!({ "success": true, "categories": categories })).into_response())
}

/// `GET /api/products/top-rated?limit=` - products by derived like count.
///
/// Image paths are rewritten to absolute URLs so API consumers can load
/// them without knowing the shop's host.
pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<TopRatedQuery>,
) -> Result<Response> {
    let limit = query
        .limit
        .filter(|&l| l > 0)
        .unwrap_or(DEFAULT_TOP_RATED_LIMIT);

    let products = ProductRepository::new(state.pool()).top_rated(limit).await?;

    let products: Vec<_> = products
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id,
                "title": p.title,
                "price": p.price,
                "description": p.description,
                "imageUrl": state.config().absolute_image_url(&p.image_path),
                "likes": p.like_count,
            })
        })
        .collect();

    Ok(Json(json!({ "success": true, "products": products })).into_response())
}

/// `POST /api/products` - create a product owned by the token's user.
pub async fn create(
    State(state): State<AppState>,
    TokenAuth(user): TokenAuth,
    multipart: Multipart,
) -> Result<Response> {
    let form = ProductForm::from_multipart(multipart).await?;

    let repo = ProductRepository::new(state.pool());

    let price = match validate_fields(&form) {
        Ok(price) => price,
        Err(message) => return Ok(error_response(StatusCode::UNPROCESSABLE_ENTITY, &message)),
    };

    let Some(image) = form
        .image
        .as_ref()
        .filter(|i| images::is_supported(&i.content_type))
    else {
        return Ok(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Attached file is not an image.",
        ));
    };

    let category_id = repo
        .get_category_by_tag(&form.category)
        .await?
        .map(|category| category.id);

    let image_path = images::save(
        &state.config().image_dir,
        &image.file_name,
        &image.content_type,
        &image.bytes,
    )
    .await
    .map_err(|e| AppError::Internal(format!("image save failed: {e}")))?;

    let product = repo
        .create(
            user.id,
            &NewProduct {
                title: &form.title,
                price,
                description: &form.description,
                image_path: &image_path,
                category_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Success!",
            "productId": product.id,
        })),
    )
        .into_response())
}

/// `POST /api/products/{id}` - toggle the caller's like on a product.
///
/// A positive `value` adds the user to the liker set, a non-positive one
/// removes them; both directions are idempotent. The response carries the
/// derived like count.
pub async fn like(
    State(state): State<AppState>,
    TokenAuth(user): TokenAuth,
    Path(id): Path<ProductId>,
    Json(body): Json<LikeRequest>,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());

    if repo.get_by_id(id).await?.is_none() {
        return Ok(error_response(StatusCode::NOT_FOUND, "Product not found."));
    }

    if body.value > 0 {
        repo.like(id, user.id).await?;
    } else {
        repo.unlike(id, user.id).await?;
    }

    let likes = repo.like_count(id).await?;

    Ok(Json(json!({ "success": true, "likes": likes })).into_response())
}
