//! Integration tests for the cart repository.
//!
//! These tests require a running `PostgreSQL` server reachable through
//! `DATABASE_URL`; each test runs against its own migrated database.
//!
//! Run with: cargo test -p pawshop-integration-tests -- --ignored

use pawshop_integration_tests::{seed_product, seed_user};
use pawshop_storefront::db::CartRepository;
use sqlx::PgPool;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_adding_same_product_twice_bumps_quantity(pool: PgPool) {
    let user = seed_user(&pool, "buyer@example.com").await;
    let product = seed_product(&pool, &user, "Squeaky Bone").await;
    let cart = CartRepository::new(&pool);

    cart.add_item(user.id, product.id)
        .await
        .expect("first add should succeed");
    cart.add_item(user.id, product.id)
        .await
        .expect("second add should succeed");

    let lines = cart.lines(user.id).await.expect("cart should resolve");
    assert_eq!(lines.len(), 1, "same product must stay one line");

    let line = lines.first().expect("one line");
    assert_eq!(line.quantity, 2);
    assert_eq!(line.product_id, product.id);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_remove_drops_entire_line_regardless_of_quantity(pool: PgPool) {
    let user = seed_user(&pool, "buyer@example.com").await;
    let product = seed_product(&pool, &user, "Squeaky Bone").await;
    let cart = CartRepository::new(&pool);

    cart.add_item(user.id, product.id)
        .await
        .expect("first add should succeed");
    cart.add_item(user.id, product.id)
        .await
        .expect("second add should succeed");

    cart.remove_item(user.id, product.id)
        .await
        .expect("remove should succeed");

    let lines = cart.lines(user.id).await.expect("cart should resolve");
    assert!(lines.is_empty(), "one removal must clear the whole line");
}
