//! Public catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use pawshop_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CsrfToken, OptionalAuth};
use crate::models::{Product, ProductPage};
use crate::state::AppState;

/// Query parameters for paginated listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Home page template: the paginated catalog.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct IndexTemplate {
    pub page: ProductPage,
    pub csrf: String,
    pub authenticated: bool,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/product_list.html")]
pub struct ProductListTemplate {
    pub page: ProductPage,
    pub csrf: String,
    pub authenticated: bool,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/product_detail.html")]
pub struct ProductDetailTemplate {
    pub product: Product,
    pub csrf: String,
    pub authenticated: bool,
}

fn clamp_page(query: &PageQuery) -> i64 {
    query.page.unwrap_or(1).max(1)
}

/// `GET /` - home page with the paginated catalog.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    CsrfToken(csrf): CsrfToken,
    Query(query): Query<PageQuery>,
) -> Result<IndexTemplate> {
    let page = ProductRepository::new(state.pool())
        .list_page(clamp_page(&query))
        .await?;

    Ok(IndexTemplate {
        page,
        csrf,
        authenticated: user.is_some(),
    })
}

/// `GET /products` - product listing.
pub async fn product_list(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    CsrfToken(csrf): CsrfToken,
    Query(query): Query<PageQuery>,
) -> Result<ProductListTemplate> {
    let page = ProductRepository::new(state.pool())
        .list_page(clamp_page(&query))
        .await?;

    Ok(ProductListTemplate {
        page,
        csrf,
        authenticated: user.is_some(),
    })
}

/// `GET /products/{id}` - product detail page.
pub async fn product_detail(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    CsrfToken(csrf): CsrfToken,
    Path(id): Path<ProductId>,
) -> Result<ProductDetailTemplate> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductDetailTemplate {
        product,
        csrf,
        authenticated: user.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page_defaults_to_one() {
        assert_eq!(clamp_page(&PageQuery { page: None }), 1);
    }

    #[test]
    fn test_clamp_page_floors_at_one() {
        assert_eq!(clamp_page(&PageQuery { page: Some(0) }), 1);
        assert_eq!(clamp_page(&PageQuery { page: Some(-3) }), 1);
    }

    #[test]
    fn test_clamp_page_passes_valid_pages() {
        assert_eq!(clamp_page(&PageQuery { page: Some(3) }), 3);
    }
}
