//! Cart and checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use pawshop_core::ProductId;

use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CsrfToken, RequireAuth, verify_csrf};
use crate::models::{CartLine, cart_total};
use crate::state::AppState;

/// Form data for cart mutations.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// Form data for placing an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderForm {
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/cart.html")]
pub struct CartTemplate {
    pub lines: Vec<CartLine>,
    pub csrf: String,
    pub authenticated: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/checkout.html")]
pub struct CheckoutTemplate {
    pub lines: Vec<CartLine>,
    pub total: String,
    pub csrf: String,
    pub authenticated: bool,
}

/// `GET /cart` - the current user's cart.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    CsrfToken(csrf): CsrfToken,
) -> Result<CartTemplate> {
    let lines = CartRepository::new(state.pool()).lines(user.id).await?;

    Ok(CartTemplate {
        lines,
        csrf,
        authenticated: true,
    })
}

/// `POST /cart` - add one unit of a product to the cart.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Redirect> {
    verify_csrf(&session, &form.csrf).await?;

    CartRepository::new(state.pool())
        .add_item(user.id, form.product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("product {}", form.product_id))
            }
            other => AppError::Database(other),
        })?;

    Ok(Redirect::to("/cart"))
}

/// `POST /cart-delete-item` - remove a product from the cart entirely.
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Redirect> {
    verify_csrf(&session, &form.csrf).await?;

    CartRepository::new(state.pool())
        .remove_item(user.id, form.product_id)
        .await?;

    Ok(Redirect::to("/cart"))
}

/// `GET /checkout` - checkout summary with the display-only total.
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    CsrfToken(csrf): CsrfToken,
) -> Result<CheckoutTemplate> {
    let lines = CartRepository::new(state.pool()).lines(user.id).await?;
    let total = format!("${:.2}", cart_total(&lines));

    Ok(CheckoutTemplate {
        lines,
        total,
        csrf,
        authenticated: true,
    })
}

/// `POST /create-order` - snapshot the cart into an order and clear it.
///
/// Both steps happen in one database transaction; an empty cart places an
/// empty order, matching the cart page's own guard.
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CreateOrderForm>,
) -> Result<Redirect> {
    verify_csrf(&session, &form.csrf).await?;

    let lines = CartRepository::new(state.pool()).lines(user.id).await?;
    let order = OrderRepository::new(state.pool())
        .create_from_cart(user.id, &user.email, &lines)
        .await?;

    tracing::info!(order_id = %order.id, user_id = %user.id, "order placed");

    Ok(Redirect::to("/orders"))
}
