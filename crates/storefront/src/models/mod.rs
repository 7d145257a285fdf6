//! Domain models for the storefront.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{CartLine, Order, OrderItem, cart_total, order_total};
pub use product::{Category, Product, ProductPage, RatedProduct};
pub use session::{CurrentUser, Flash, session_keys};
pub use user::{User, UserWithPassword};
