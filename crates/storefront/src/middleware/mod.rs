//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)

pub mod auth;
pub mod csrf;
pub mod flash;
pub mod session;
pub mod token;

pub use auth::{OptionalAuth, RequireAuth, set_current_user};
pub use csrf::{CsrfToken, verify_csrf};
pub use flash::{set_flash, take_flash};
pub use session::create_session_layer;
pub use token::TokenAuth;
