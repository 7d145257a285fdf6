//! Product repository for catalog and admin queries.

use sqlx::PgPool;

use pawshop_core::{CategoryId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Category, Product, ProductPage, RatedProduct};

/// Fields for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct NewProduct<'a> {
    pub title: &'a str,
    pub price: Price,
    pub description: &'a str,
    pub image_path: &'a str,
    pub category_id: Option<CategoryId>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one page of the catalog, newest first.
    ///
    /// Runs a count query and an offset/limit query; the page math lives
    /// in [`ProductPage`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list_page(&self, page: i64) -> Result<ProductPage, RepositoryError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, price, description, image_path, user_id, category_id, created_at
            FROM products
            ORDER BY created_at DESC, id DESC
            OFFSET $1 LIMIT $2
            ",
        )
        .bind(ProductPage::offset(page))
        .bind(ProductPage::PAGE_SIZE)
        .fetch_all(self.pool)
        .await?;

        Ok(ProductPage::new(products, page, total))
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, price, description, image_path, user_id, category_id, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product only if it belongs to the given owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        id: ProductId,
        owner: UserId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, price, description, image_path, user_id, category_id, created_at
            FROM products
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List all products owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_owned(&self, owner: UserId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, price, description, image_path, user_id, category_id, created_at
            FROM products
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        owner: UserId,
        fields: &NewProduct<'_>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (title, price, description, image_path, user_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, price, description, image_path, user_id, category_id, created_at
            ",
        )
        .bind(fields.title)
        .bind(fields.price)
        .bind(fields.description)
        .bind(fields.image_path)
        .bind(owner)
        .bind(fields.category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Replace a product's fields, scoped to its owner.
    ///
    /// Returns `false` when no row matched (missing or not owned), which
    /// the caller turns into a silent redirect.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_owned(
        &self,
        id: ProductId,
        owner: UserId,
        fields: &NewProduct<'_>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET title = $1, price = $2, description = $3, image_path = $4, category_id = $5
            WHERE id = $6 AND user_id = $7
            ",
        )
        .bind(fields.title)
        .bind(fields.price)
        .bind(fields.description)
        .bind(fields.image_path)
        .bind(fields.category_id)
        .bind(id)
        .bind(owner)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product, scoped to its owner.
    ///
    /// Cart rows and likes referencing the product are removed by ON
    /// DELETE CASCADE; order item snapshots are untouched.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(&self, id: ProductId, owner: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM products
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all product categories, by fixed id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, tag, name, description
            FROM product_categories
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Look up a category by its tag (e.g. `cat`, `dog`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_category_by_tag(
        &self,
        tag: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, tag, name, description
            FROM product_categories
            WHERE tag = $1
            ",
        )
        .bind(tag)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// The highest-liked products, like counts derived from the liker set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_rated(&self, limit: i64) -> Result<Vec<RatedProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, RatedProduct>(
            r"
            SELECT p.id, p.title, p.price, p.description, p.image_path,
                   p.user_id, p.category_id, p.created_at,
                   COUNT(l.user_id) AS like_count
            FROM products p
            LEFT JOIN product_likes l ON l.product_id = p.id
            GROUP BY p.id
            ORDER BY like_count DESC, p.id ASC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Add a user to a product's liker set. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn like(&self, product_id: ProductId, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_likes (product_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (product_id, user_id) DO NOTHING
            ",
        )
        .bind(product_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a user from a product's liker set. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unlike(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM product_likes
            WHERE product_id = $1 AND user_id = $2
            ",
        )
        .bind(product_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Derived like count for a single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn like_count(&self, product_id: ProductId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM product_likes WHERE product_id = $1
            ",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
