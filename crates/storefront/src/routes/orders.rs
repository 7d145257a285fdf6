//! Order history and invoice route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use pawshop_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CsrfToken, RequireAuth};
use crate::models::{Order, OrderItem};
use crate::services::invoice;
use crate::state::AppState;

/// One order with its snapshotted items, ready for display.
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub total: String,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
    pub csrf: String,
    pub authenticated: bool,
}

/// `GET /orders` - the current user's order history.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    CsrfToken(csrf): CsrfToken,
) -> Result<OrdersTemplate> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_for_user(user.id).await?;

    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        let items = repo.items(order.id).await?;
        let total = format!("${:.2}", crate::models::order_total(&items));
        views.push(OrderView {
            order,
            items,
            total,
        });
    }

    Ok(OrdersTemplate {
        orders: views,
        csrf,
        authenticated: true,
    })
}

/// `GET /orders/{id}` - download the invoice PDF for an order.
///
/// A missing order is a 404; someone else's order is a 401.
pub async fn invoice(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Response> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if order.user_id != user.id {
        return Err(AppError::Unauthorized("not your order".to_string()));
    }

    let items = repo.items(order.id).await?;
    let bytes = invoice::render_and_store(&state.config().invoice_dir, order.id, &items).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", invoice::file_name(order.id)),
        ),
    ];

    Ok((headers, bytes).into_response())
}
