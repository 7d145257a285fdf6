//! Product image storage.
//!
//! Uploaded images land in the configured image directory under a
//! timestamped name; the database stores the URL path (`images/<file>`)
//! that the static file route serves.

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

/// URL prefix under which stored images are served.
pub const URL_PREFIX: &str = "images";

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

/// Errors during image storage.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The upload is not a supported image type.
    #[error("Attached file is not an image.")]
    NotAnImage,
    /// Filesystem operation failed.
    #[error("image file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether an upload's content type is an accepted image format.
#[must_use]
pub fn is_supported(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type)
}

/// Build the stored file name: `<millis>-<sanitized original name>`.
#[must_use]
pub fn stored_name(original: &str, now_millis: i64) -> String {
    let sanitized: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{now_millis}-{sanitized}")
}

/// Save an uploaded image, returning the URL path to store on the product.
///
/// # Errors
///
/// Returns `ImageError::NotAnImage` for an unsupported content type and
/// `ImageError::Io` if the write fails.
pub async fn save(
    image_dir: &Path,
    original_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<String, ImageError> {
    if !is_supported(content_type) {
        return Err(ImageError::NotAnImage);
    }

    let name = stored_name(original_name, Utc::now().timestamp_millis());

    tokio::fs::create_dir_all(image_dir).await?;
    tokio::fs::write(image_dir.join(&name), bytes).await?;

    Ok(format!("{URL_PREFIX}/{name}"))
}

/// Delete a stored image by its URL path.
///
/// A file that is already gone is logged and tolerated; any other
/// filesystem failure is returned to the caller.
///
/// # Errors
///
/// Returns `ImageError::Io` for filesystem failures other than a missing
/// file.
pub async fn delete(image_dir: &Path, image_path: &str) -> Result<(), ImageError> {
    let file = image_path
        .strip_prefix(&format!("{URL_PREFIX}/"))
        .unwrap_or(image_path);

    match tokio::fs::remove_file(image_dir.join(file)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(image_path, "image file already gone");
            Ok(())
        }
        Err(e) => Err(ImageError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_content_types() {
        assert!(is_supported("image/png"));
        assert!(is_supported("image/jpeg"));
        assert!(is_supported("image/jpg"));
    }

    #[test]
    fn test_unsupported_content_types() {
        assert!(!is_supported("image/gif"));
        assert!(!is_supported("application/pdf"));
        assert!(!is_supported("text/html"));
    }

    #[test]
    fn test_stored_name_prefixes_timestamp() {
        assert_eq!(stored_name("bone.png", 1700000000000), "1700000000000-bone.png");
    }

    #[test]
    fn test_stored_name_sanitizes() {
        assert_eq!(
            stored_name("my photo (1).png", 42),
            "42-my_photo__1_.png"
        );
    }
}
