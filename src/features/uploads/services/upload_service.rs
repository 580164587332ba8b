use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::storage::MinIOClient;

/// Maximum accepted image size in bytes (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Check size and content type, returning the file extension to store under
fn validate_image(size: usize, content_type: &str) -> Result<&'static str> {
    if size > MAX_IMAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "Image exceeds maximum size of {} bytes",
            MAX_IMAGE_SIZE
        )));
    }

    match content_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        other => Err(AppError::BadRequest(format!(
            "Content type '{}' is not an accepted image type",
            other
        ))),
    }
}

/// Service for report image uploads
pub struct UploadService {
    minio_client: Arc<MinIOClient>,
}

impl UploadService {
    pub fn new(minio_client: Arc<MinIOClient>) -> Self {
        Self { minio_client }
    }

    /// Store an image publicly and return its durable URL.
    ///
    /// A storage failure here is blocking for the caller: the submission
    /// flow needs the URL before the report can be created.
    pub async fn upload_image(&self, data: Vec<u8>, content_type: &str) -> Result<String> {
        let extension = validate_image(data.len(), content_type)?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let key = self.minio_client.generate_key(&file_name);

        self.minio_client.upload(&key, data, content_type).await?;
        debug!("Image uploaded to storage: {}", key);

        Ok(self.minio_client.get_public_url(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_image_types_map_to_extensions() {
        assert_eq!(validate_image(100, "image/jpeg").unwrap(), "jpg");
        assert_eq!(validate_image(100, "image/png").unwrap(), "png");
        assert_eq!(validate_image(100, "image/gif").unwrap(), "gif");
        assert_eq!(validate_image(100, "image/webp").unwrap(), "webp");
    }

    #[test]
    fn test_non_image_content_type_rejected() {
        assert!(validate_image(100, "application/pdf").is_err());
        assert!(validate_image(100, "text/html").is_err());
        assert!(validate_image(100, "image/svg+xml").is_err());
    }

    #[test]
    fn test_size_cap_is_5_mib() {
        assert!(validate_image(MAX_IMAGE_SIZE, "image/png").is_ok());
        assert!(validate_image(MAX_IMAGE_SIZE + 1, "image/png").is_err());
    }
}
