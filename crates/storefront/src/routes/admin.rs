//! Admin panel route handlers.
//!
//! Every operation here is scoped to the products the logged-in user
//! owns. Editing or deleting someone else's product does not error
//! loudly; the edit flow silently redirects home, matching the listing
//! pages which only ever show your own products.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use pawshop_core::{Price, ProductId};

use crate::db::{ProductRepository, products::NewProduct};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CsrfToken, RequireAuth, verify_csrf};
use crate::models::{Category, Product};
use crate::services::images;
use crate::state::AppState;

const MIN_TITLE_LENGTH: usize = 3;
const MIN_DESCRIPTION_LENGTH: usize = 5;
const MAX_DESCRIPTION_LENGTH: usize = 400;

// =============================================================================
// Multipart Form
// =============================================================================

/// Fields collected from the product multipart form.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub product_id: Option<ProductId>,
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub image: Option<UploadedImage>,
    pub csrf: String,
}

/// An uploaded image file.
#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ProductForm {
    /// Read the multipart body into a form struct.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the body cannot be read.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
        {
            let Some(name) = field.name().map(ToOwned::to_owned) else {
                continue;
            };

            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let content_type = field.content_type().unwrap_or_default().to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?;
                    // An empty file input still submits a nameless part
                    if !file_name.is_empty() {
                        form.image = Some(UploadedImage {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                other => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("invalid field: {e}")))?;
                    match other {
                        "product_id" => form.product_id = text.trim().parse().ok(),
                        "title" => form.title = text.trim().to_owned(),
                        "price" => form.price = text.trim().to_owned(),
                        "description" => form.description = text.trim().to_owned(),
                        "category" => form.category = text.trim().to_owned(),
                        "_csrf" => form.csrf = text,
                        _ => {}
                    }
                }
            }
        }

        Ok(form)
    }
}

/// Validate the text fields, returning the parsed price.
pub(crate) fn validate_fields(form: &ProductForm) -> std::result::Result<Price, String> {
    if form.title.chars().count() < MIN_TITLE_LENGTH {
        return Err("Title must be at least 3 characters long.".to_string());
    }

    let price =
        Price::parse(&form.price).map_err(|_| "Price must be a positive number.".to_string())?;

    let description_len = form.description.chars().count();
    if !(MIN_DESCRIPTION_LENGTH..=MAX_DESCRIPTION_LENGTH).contains(&description_len) {
        return Err("Description must be between 5 and 400 characters.".to_string());
    }

    Ok(price)
}

// =============================================================================
// Templates
// =============================================================================

/// Add/edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/edit_product.html")]
pub struct EditProductTemplate {
    pub editing: bool,
    pub error: Option<String>,
    pub product_id: Option<ProductId>,
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub categories: Vec<Category>,
    pub csrf: String,
    pub authenticated: bool,
}

/// Admin product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub products: Vec<Product>,
    pub csrf: String,
    pub authenticated: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /admin/add-product` - display the empty product form.
pub async fn add_product_page(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    CsrfToken(csrf): CsrfToken,
) -> Result<EditProductTemplate> {
    let categories = ProductRepository::new(state.pool()).list_categories().await?;

    Ok(EditProductTemplate {
        editing: false,
        error: None,
        product_id: None,
        title: String::new(),
        price: String::new(),
        description: String::new(),
        category: String::new(),
        categories,
        csrf,
        authenticated: true,
    })
}

/// `POST /admin/add-product` - create a product from the multipart form.
pub async fn add_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    CsrfToken(csrf): CsrfToken,
    multipart: Multipart,
) -> Result<Response> {
    let form = ProductForm::from_multipart(multipart).await?;
    verify_csrf(&session, &form.csrf).await?;

    let repo = ProductRepository::new(state.pool());

    let rerender = |error: String, categories: Vec<Category>| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            EditProductTemplate {
                editing: false,
                error: Some(error),
                product_id: None,
                title: form.title.clone(),
                price: form.price.clone(),
                description: form.description.clone(),
                category: form.category.clone(),
                categories,
                csrf: csrf.clone(),
                authenticated: true,
            },
        )
            .into_response()
    };

    let price = match validate_fields(&form) {
        Ok(price) => price,
        Err(message) => return Ok(rerender(message, repo.list_categories().await?)),
    };

    let Some(image) = form.image.as_ref().filter(|i| images::is_supported(&i.content_type))
    else {
        return Ok(rerender(
            "Attached file is not an image.".to_string(),
            repo.list_categories().await?,
        ));
    };

    // Absent or unknown category tags are tolerated
    let category_id = repo
        .get_category_by_tag(&form.category)
        .await?
        .map(|category| category.id);

    let image_path = images::save(
        &state.config().image_dir,
        &image.file_name,
        &image.content_type,
        &image.bytes,
    )
    .await
    .map_err(|e| AppError::Internal(format!("image save failed: {e}")))?;

    let product = repo
        .create(
            user.id,
            &NewProduct {
                title: &form.title,
                price,
                description: &form.description,
                image_path: &image_path,
                category_id,
            },
        )
        .await?;

    tracing::info!(product_id = %product.id, user_id = %user.id, "product created");

    Ok(Redirect::to("/admin/products").into_response())
}

/// `GET /admin/products` - list the current user's products.
pub async fn list_products(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    CsrfToken(csrf): CsrfToken,
) -> Result<AdminProductsTemplate> {
    let products = ProductRepository::new(state.pool())
        .list_owned(user.id)
        .await?;

    Ok(AdminProductsTemplate {
        products,
        csrf,
        authenticated: true,
    })
}

/// `GET /admin/edit-product/{id}` - display the pre-filled product form.
///
/// A missing or foreign product silently redirects home.
pub async fn edit_product_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    CsrfToken(csrf): CsrfToken,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());

    let Some(product) = repo.get_owned(id, user.id).await? else {
        return Err(AppError::Redirect("/".to_string()));
    };

    let categories = repo.list_categories().await?;
    let category = match product.category_id {
        Some(category_id) => categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.tag.clone())
            .unwrap_or_default(),
        None => String::new(),
    };

    Ok(EditProductTemplate {
        editing: true,
        error: None,
        product_id: Some(product.id),
        title: product.title,
        price: product.price.to_string(),
        description: product.description,
        category,
        categories,
        csrf,
        authenticated: true,
    }
    .into_response())
}

/// `POST /admin/edit-product` - replace a product's fields.
///
/// A new image deletes the old file first; a file that is already gone is
/// tolerated, any other deletion failure aborts the edit.
pub async fn edit_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    CsrfToken(csrf): CsrfToken,
    multipart: Multipart,
) -> Result<Response> {
    let form = ProductForm::from_multipart(multipart).await?;
    verify_csrf(&session, &form.csrf).await?;

    let Some(product_id) = form.product_id else {
        return Err(AppError::BadRequest("missing product id".to_string()));
    };

    let repo = ProductRepository::new(state.pool());

    let Some(existing) = repo.get_owned(product_id, user.id).await? else {
        return Err(AppError::Redirect("/".to_string()));
    };

    let price = match validate_fields(&form) {
        Ok(price) => price,
        Err(message) => {
            let categories = repo.list_categories().await?;
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                EditProductTemplate {
                    editing: true,
                    error: Some(message),
                    product_id: Some(product_id),
                    title: form.title,
                    price: form.price,
                    description: form.description,
                    category: form.category,
                    categories,
                    csrf,
                    authenticated: true,
                },
            )
                .into_response());
        }
    };

    let category_id = repo
        .get_category_by_tag(&form.category)
        .await?
        .map(|category| category.id);

    let image_path = match form.image {
        Some(image) if images::is_supported(&image.content_type) => {
            images::delete(&state.config().image_dir, &existing.image_path)
                .await
                .map_err(|e| AppError::Internal(format!("old image delete failed: {e}")))?;

            images::save(
                &state.config().image_dir,
                &image.file_name,
                &image.content_type,
                &image.bytes,
            )
            .await
            .map_err(|e| AppError::Internal(format!("image save failed: {e}")))?
        }
        _ => existing.image_path.clone(),
    };

    let updated = repo
        .update_owned(
            product_id,
            user.id,
            &NewProduct {
                title: &form.title,
                price,
                description: &form.description,
                image_path: &image_path,
                category_id,
            },
        )
        .await?;

    if !updated {
        return Err(AppError::Redirect("/".to_string()));
    }

    tracing::info!(product_id = %product_id, user_id = %user.id, "product updated");

    Ok(Redirect::to("/admin/products").into_response())
}

/// `DELETE /admin/product/{id}` - delete a product and its image file.
///
/// Returns JSON so the listing page can remove the row in place. A
/// second delete of the same id is a 404.
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());

    let Some(product) = repo.get_owned(id, user.id).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Product not found." })),
        )
            .into_response());
    };

    images::delete(&state.config().image_dir, &product.image_path)
        .await
        .map_err(|e| AppError::Internal(format!("image delete failed: {e}")))?;

    repo.delete_owned(id, user.id).await?;

    tracing::info!(product_id = %id, user_id = %user.id, "product deleted");

    Ok(Json(json!({ "message": "Success!" })).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, price: &str, description: &str) -> ProductForm {
        ProductForm {
            title: title.to_string(),
            price: price.to_string(),
            description: description.to_string(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_validate_accepts_good_fields() {
        let price = validate_fields(&form("Squeaky Bone", "4.50", "A bone that squeaks."));
        assert!(price.is_ok());
    }

    #[test]
    fn test_validate_rejects_short_title() {
        let err = validate_fields(&form("ab", "4.50", "A bone that squeaks.")).unwrap_err();
        assert_eq!(err, "Title must be at least 3 characters long.");
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        let err = validate_fields(&form("Bone", "free", "A bone that squeaks.")).unwrap_err();
        assert_eq!(err, "Price must be a positive number.");

        let err = validate_fields(&form("Bone", "-2", "A bone that squeaks.")).unwrap_err();
        assert_eq!(err, "Price must be a positive number.");
    }

    #[test]
    fn test_validate_rejects_description_out_of_bounds() {
        let err = validate_fields(&form("Bone", "4.50", "shrt")).unwrap_err();
        assert_eq!(err, "Description must be between 5 and 400 characters.");

        let long = "x".repeat(401);
        let err = validate_fields(&form("Bone", "4.50", &long)).unwrap_err();
        assert_eq!(err, "Description must be between 5 and 400 characters.");
    }

    #[test]
    fn test_validate_description_boundaries() {
        assert!(validate_fields(&form("Bone", "4.50", "12345")).is_ok());
        let max = "x".repeat(400);
        assert!(validate_fields(&form("Bone", "4.50", &max)).is_ok());
    }
}
