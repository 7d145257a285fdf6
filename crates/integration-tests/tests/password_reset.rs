//! Integration tests for the reset-token lifecycle.
//!
//! These tests require a running `PostgreSQL` server reachable through
//! `DATABASE_URL`; each test runs against its own migrated database.
//!
//! Run with: cargo test -p pawshop-integration-tests -- --ignored

use chrono::{Duration, Utc};
use pawshop_integration_tests::seed_user;
use pawshop_storefront::db::{RepositoryError, UserRepository};
use sqlx::PgPool;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_expired_reset_token_authorizes_nothing(pool: PgPool) {
    let user = seed_user(&pool, "forgetful@example.com").await;
    let users = UserRepository::new(&pool);

    users
        .set_reset_token(user.id, "stale-token", Utc::now() - Duration::hours(2))
        .await
        .expect("token should store");

    let found = users
        .get_by_reset_token("stale-token")
        .await
        .expect("lookup should run");
    assert!(found.is_none(), "expired token must not resolve a user");

    let err = users
        .complete_password_reset(user.id, "stale-token", "new-argon2-hash")
        .await
        .expect_err("expired token must not change the password");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_live_reset_token_resolves_and_completes(pool: PgPool) {
    let user = seed_user(&pool, "forgetful@example.com").await;
    let users = UserRepository::new(&pool);

    users
        .set_reset_token(user.id, "fresh-token", Utc::now() + Duration::hours(1))
        .await
        .expect("token should store");

    let found = users
        .get_by_reset_token("fresh-token")
        .await
        .expect("lookup should run")
        .expect("live token must resolve its user");
    assert_eq!(found.id, user.id);

    users
        .complete_password_reset(user.id, "fresh-token", "new-argon2-hash")
        .await
        .expect("live token must complete the reset");

    // A consumed token is cleared and cannot be replayed
    let replay = users
        .complete_password_reset(user.id, "fresh-token", "another-hash")
        .await;
    assert!(matches!(replay, Err(RepositoryError::NotFound)));
}
