//! HTTP route handlers for the shop.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (paginated catalog)
//! GET  /products                - Product listing
//! GET  /products/{id}           - Product detail
//!
//! # Cart & Orders (requires login)
//! GET  /cart                    - Cart page
//! POST /cart                    - Add one unit of a product
//! POST /cart-delete-item        - Remove a product entirely
//! GET  /checkout                - Checkout summary
//! POST /create-order            - Place the order, clear the cart
//! GET  /orders                  - Order history
//! GET  /orders/{id}             - Invoice PDF download
//!
//! # Auth
//! GET  /login        POST /login
//! GET  /signup       POST /signup
//! POST /logout
//! GET  /reset        POST /reset
//! GET  /reset/{token}
//! POST /new-password
//!
//! # Admin panel (requires login, owner-scoped)
//! GET  /admin/add-product       POST /admin/add-product
//! GET  /admin/products
//! GET  /admin/edit-product/{id} POST /admin/edit-product
//! DELETE /admin/product/{id}
//!
//! # JSON API (bearer token)
//! POST /api/auth/login          - Exchange credentials for a token
//! GET  /api/users/user          - Current user profile
//! GET  /api/products/categories - Category list (public)
//! GET  /api/products/top-rated  - Products by like count (public)
//! POST /api/products            - Create a product
//! POST /api/products/{id}       - Toggle a like
//! GET  /api/admin/products      - Own products
//!
//! # Error pages
//! GET  /404, GET /500
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod shop;

use axum::{
    Router,
    routing::{delete, get, post},
};

use axum::response::Response;

use crate::error::{not_found_response, server_error_response};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/reset", get(auth::reset_page).post(auth::reset))
        .route("/reset/{token}", get(auth::new_password_page))
        .route("/new-password", post(auth::new_password))
}

/// Create the cart and order routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).post(cart::add))
        .route("/cart-delete-item", post(cart::delete_item))
        .route("/checkout", get(cart::checkout))
        .route("/create-order", post(cart::create_order))
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::invoice))
}

/// Create the admin panel routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/add-product",
            get(admin::add_product_page).post(admin::add_product),
        )
        .route("/products", get(admin::list_products))
        .route("/edit-product/{id}", get(admin::edit_product_page))
        .route("/edit-product", post(admin::edit_product))
        .route("/product/{id}", delete(admin::delete_product))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(api::auth::login))
        .route("/users/user", get(api::users::current_user))
        .route("/products/categories", get(api::products::categories))
        .route("/products/top-rated", get(api::products::top_rated))
        .route("/products", post(api::products::create))
        .route("/products/{id}", post(api::products::like))
        .route("/admin/products", get(api::admin::products))
}

/// Create all routes for the shop.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(shop::index))
        .route("/products", get(shop::product_list))
        .route("/products/{id}", get(shop::product_detail))
        // Cart and orders
        .merge(cart_routes())
        // Auth
        .merge(auth_routes())
        // Admin panel
        .nest("/admin", admin_routes())
        // JSON API
        .nest("/api", api_routes())
        // Error pages, also reachable directly
        .route("/404", get(not_found_page))
        .route("/500", get(server_error_page))
        .fallback(fallback)
}

/// `GET /404` - the not-found page.
async fn not_found_page() -> Response {
    not_found_response()
}

/// `GET /500` - the error page, reachable directly.
async fn server_error_page() -> Response {
    server_error_response()
}

/// Fallback for unknown paths.
async fn fallback() -> Response {
    not_found_response()
}
