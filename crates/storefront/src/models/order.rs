//! Cart and order models.

use chrono::{DateTime, Utc};
use pawshop_core::{Email, OrderId, OrderStatus, Price, ProductId, UserId};
use rust_decimal::Decimal;

/// One cart row resolved against the live product it points at.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub image_path: String,
    pub quantity: i32,
}

impl CartLine {
    /// Line total, `quantity x unit price`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price.amount() * Decimal::from(self.quantity)
    }
}

/// Cart total across resolved lines. Display only, never stored.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::total).sum()
}

/// A placed order.
///
/// The buyer's email is snapshotted at checkout alongside the user id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub email: Email,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One snapshotted line of a placed order.
///
/// Title and unit price are copied from the product at checkout and never
/// change afterwards, even if the product is edited or deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub quantity: i32,
}

impl OrderItem {
    /// Line total, `quantity x unit price`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.unit_price.amount() * Decimal::from(self.quantity)
    }
}

/// Order total across snapshotted lines.
#[must_use]
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(price: &str, quantity: i32) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            title: "Squeaky Bone".to_string(),
            price: Price::parse(price).unwrap(),
            image_path: "images/bone.png".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line("2.50", 3).total(), Decimal::new(750, 2));
    }

    #[test]
    fn test_cart_total_sums_lines() {
        let lines = vec![line("2.50", 2), line("10.00", 1)];
        assert_eq!(cart_total(&lines), Decimal::new(1500, 2));
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }
}
