//! Database repositories.
//!
//! Each repository borrows the shared [`sqlx::PgPool`] and exposes the
//! queries one area of the application needs. Queries are written with
//! runtime binding (`query_as`/`query`) and map rows onto the domain
//! models via `FromRow`.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

pub use cart::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Create the `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database is unreachable.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Entity not found.
    #[error("Not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-violation database error onto `Conflict`.
    pub(crate) fn from_unique_violation(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}
