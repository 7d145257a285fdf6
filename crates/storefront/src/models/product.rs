//! Product catalog models.

use chrono::{DateTime, Utc};
use pawshop_core::{CategoryId, Price, ProductId, UserId};
use serde::Serialize;

/// A product in the catalog.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    /// Path of the uploaded image, relative to the image directory root.
    pub image_path: String,
    /// The admin user that owns this product.
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// A product joined with its derived like count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RatedProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub image_path: String,
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

/// A fixed product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub tag: String,
    pub name: String,
    pub description: String,
}

/// One page of the paginated catalog.
///
/// Page numbers are 1-based; the math is pure so it can be unit tested
/// without a database.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: i64,
    pub last_page: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl ProductPage {
    /// Products shown per catalog page.
    pub const PAGE_SIZE: i64 = 4;

    /// Build a page from a total row count and the rows fetched for it.
    #[must_use]
    pub fn new(products: Vec<Product>, page: i64, total: i64) -> Self {
        let last_page = total.div_ceil(Self::PAGE_SIZE).max(1);
        Self {
            products,
            page,
            last_page,
            has_previous_page: page > 1,
            has_next_page: page < last_page,
        }
    }

    /// SQL OFFSET for a 1-based page number.
    #[must_use]
    pub const fn offset(page: i64) -> i64 {
        (page - 1) * Self::PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(page: i64, total: i64) -> ProductPage {
        ProductPage::new(Vec::new(), page, total)
    }

    #[test]
    fn test_ten_products_make_three_pages() {
        let page = page_of(3, 10);
        assert_eq!(page.last_page, 3);
        assert!(page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_first_page_flags() {
        let page = page_of(1, 10);
        assert!(!page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_middle_page_flags() {
        let page = page_of(2, 10);
        assert!(page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let page = page_of(2, 8);
        assert_eq!(page.last_page, 2);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_empty_catalog_still_has_one_page() {
        let page = page_of(1, 0);
        assert_eq!(page.last_page, 1);
        assert!(!page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_offset() {
        assert_eq!(ProductPage::offset(1), 0);
        assert_eq!(ProductPage::offset(2), 4);
        assert_eq!(ProductPage::offset(3), 8);
    }
}
