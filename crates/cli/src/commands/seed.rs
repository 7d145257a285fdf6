//! Seed the fixed product categories.
//!
//! The shop ships with three categories under fixed ids. Seeding is an
//! upsert keyed on id, so running it again after a rename updates the
//! stored rows instead of failing.

use tracing::info;

use super::migrate::{MigrationError, database_url};

/// The categories every deployment carries.
const CATEGORIES: [(i32, &str, &str, &str); 3] = [
    (1, "cat", "Kitty", "Cat dedicated stuff"),
    (2, "dog", "Dog", "Dog dedicated stuff"),
    (3, "other", "Other", "Other animal dedicated stuff"),
];

/// Upsert the fixed product categories.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a query fails.
pub async fn categories() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = pawshop_storefront::db::create_pool(&database_url).await?;

    for (id, tag, name, description) in CATEGORIES {
        sqlx::query(
            "
            INSERT INTO product_categories (id, tag, name, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET tag = EXCLUDED.tag,
                name = EXCLUDED.name,
                description = EXCLUDED.description
            ",
        )
        .bind(id)
        .bind(tag)
        .bind(name)
        .bind(description)
        .execute(&pool)
        .await?;

        info!(id, tag, "Seeded category");
    }

    info!("Category seeding complete!");
    Ok(())
}
