//! Integration tests for owner scoping in the product repository.
//!
//! These tests require a running `PostgreSQL` server reachable through
//! `DATABASE_URL`; each test runs against its own migrated database.
//!
//! Run with: cargo test -p pawshop-integration-tests -- --ignored

use pawshop_core::Price;
use pawshop_integration_tests::{seed_product, seed_user};
use pawshop_storefront::db::ProductRepository;
use pawshop_storefront::db::products::NewProduct;
use sqlx::PgPool;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_update_by_non_owner_leaves_product_untouched(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let intruder = seed_user(&pool, "intruder@example.com").await;
    let product = seed_product(&pool, &owner, "Squeaky Bone").await;
    let repo = ProductRepository::new(&pool);

    let updated = repo
        .update_owned(
            product.id,
            intruder.id,
            &NewProduct {
                title: "Hijacked",
                price: Price::parse("0.01").expect("price should parse"),
                description: "Not yours anymore.",
                image_path: "images/hijacked.png",
                category_id: None,
            },
        )
        .await
        .expect("update query should run");
    assert!(!updated, "non-owner update must report no rows changed");

    let reloaded = repo
        .get_by_id(product.id)
        .await
        .expect("lookup should run")
        .expect("product should still exist");
    assert_eq!(reloaded.title, "Squeaky Bone");
    assert_eq!(reloaded.price, product.price);
    assert_eq!(reloaded.user_id, owner.id);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_delete_by_non_owner_leaves_product_in_place(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let intruder = seed_user(&pool, "intruder@example.com").await;
    let product = seed_product(&pool, &owner, "Squeaky Bone").await;
    let repo = ProductRepository::new(&pool);

    let deleted = repo
        .delete_owned(product.id, intruder.id)
        .await
        .expect("delete query should run");
    assert!(!deleted);

    let reloaded = repo.get_by_id(product.id).await.expect("lookup should run");
    assert!(reloaded.is_some(), "product must survive a foreign delete");
}
