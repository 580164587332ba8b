use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upload image request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// The image to upload (jpeg, png, gif, or webp; max 5 MiB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for image uploads
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUploadResponseDto {
    /// Durable public URL to reference in the report submission
    pub url: String,
}
