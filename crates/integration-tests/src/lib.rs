//! Integration tests for PawShop.
//!
//! The tests under `tests/` exercise the storefront repositories against a
//! real `PostgreSQL` server. Each test gets its own throwaway database via
//! `#[sqlx::test]`, with the storefront migrations applied.
//!
//! # Running Tests
//!
//! ```bash
//! # Point DATABASE_URL at a PostgreSQL server the tests may create
//! # databases on, then:
//! cargo test -p pawshop-integration-tests -- --ignored
//! ```
//!
//! The tests are `#[ignore]`d by default so that `cargo test` stays green
//! on machines without a database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use pawshop_core::{Email, Price};
use pawshop_storefront::db::products::NewProduct;
use pawshop_storefront::db::{ProductRepository, UserRepository};
use pawshop_storefront::models::{Product, User};
use sqlx::PgPool;

/// Insert a user directly through the repository.
///
/// The password hash and API key are opaque to every query under test, so
/// placeholder values are fine here.
///
/// # Panics
///
/// Panics if the insert fails; the caller is a test.
pub async fn seed_user(pool: &PgPool, email: &str) -> User {
    let email = Email::parse(email).expect("seed email should be valid");
    UserRepository::new(pool)
        .create(&email, "argon2-placeholder-hash", "seed-api-key")
        .await
        .expect("seed user should insert")
}

/// Insert a product owned by the given user.
///
/// # Panics
///
/// Panics if the insert fails; the caller is a test.
pub async fn seed_product(pool: &PgPool, owner: &User, title: &str) -> Product {
    ProductRepository::new(pool)
        .create(
            owner.id,
            &NewProduct {
                title,
                price: Price::parse("4.50").expect("seed price should parse"),
                description: "A bone that squeaks.",
                image_path: "images/bone.png",
                category_id: None,
            },
        )
        .await
        .expect("seed product should insert")
}
