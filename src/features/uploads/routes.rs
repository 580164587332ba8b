use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::uploads::handlers;
use crate::features::uploads::services::{UploadService, MAX_IMAGE_SIZE};

/// Create routes for the uploads feature
pub fn routes(service: Arc<UploadService>) -> Router {
    Router::new()
        .route(
            "/api/uploads/image",
            // Allow body size up to MAX_IMAGE_SIZE + buffer for multipart overhead
            post(handlers::upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MinIOConfig;
    use crate::modules::storage::MinIOClient;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn multipart_body(payload_len: usize) -> (&'static str, Vec<u8>) {
        let boundary = "campuscare-upload-test";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(&vec![0u8; payload_len]);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
        (boundary, body)
    }

    // Storage endpoint that refuses connections; bucket setup failures are
    // logged and tolerated, so the router still builds.
    async fn test_router() -> Router {
        let config = MinIOConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            public_endpoint: "http://127.0.0.1:1".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            bucket: "test-bucket".to_string(),
            region: "us-east-1".to_string(),
            upload_prefix: "reports".to_string(),
        };
        let minio_client = Arc::new(MinIOClient::new(config).await.unwrap());
        routes(Arc::new(UploadService::new(minio_client)))
    }

    async fn post_image(app: Router, payload_len: usize) -> StatusCode {
        let (boundary, body) = multipart_body(payload_len);

        let response = app
            .oneshot(
                Request::post("/api/uploads/image")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        response.status()
    }

    #[tokio::test]
    async fn test_images_over_two_mib_pass_the_body_limit() {
        // A 3 MiB image is under the 5 MiB cap; with an unreachable storage
        // backend it must fail at upload (502), not at body extraction (400).
        let status = post_image(test_router().await, 3 * 1024 * 1024).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_images_over_the_cap_rejected_by_validation() {
        let status = post_image(test_router().await, MAX_IMAGE_SIZE + 1).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
