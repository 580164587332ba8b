use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{ModerationStatus, ReportStatus};

/// Fixed denylist scanned by the content-screening pass
const FLAGGED_TERMS: [&str; 3] = ["fake", "fraud", "abuse"];

/// Evaluate a report's text content against the denylist.
///
/// Message and image reference are concatenated into one blob and scanned
/// with a case-sensitive substring check. Confidence values are fixed
/// constants, not derived from match count.
pub fn evaluate(message: &str, image: &str) -> (ModerationStatus, Decimal) {
    let blob = format!("{} {}", message, image);

    if FLAGGED_TERMS.iter().any(|term| blob.contains(term)) {
        (ModerationStatus::Flagged, Decimal::new(80, 2))
    } else {
        (ModerationStatus::Approved, Decimal::new(99, 2))
    }
}

/// Service running the moderation sweep over pending reports
pub struct ModerationService {
    pool: PgPool,
}

impl ModerationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Evaluate every Pending report and overwrite its verdict.
    ///
    /// Re-running the sweep is idempotent: each pending report gets the
    /// same verdict recomputed and written again.
    pub async fn sweep(&self) -> Result<u64> {
        let pending: Vec<(Uuid, String, String)> =
            sqlx::query_as("SELECT id, message, image FROM reports WHERE status = $1")
                .bind(ReportStatus::Pending)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load pending reports for sweep: {:?}", e);
                    AppError::Database(e)
                })?;

        let mut updated = 0u64;
        for (id, message, image) in pending {
            let (verdict, confidence) = evaluate(&message, &image);

            sqlx::query("UPDATE reports SET moderation_status = $1, ai_confidence = $2 WHERE id = $3")
                .bind(verdict)
                .bind(confidence)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to write moderation verdict for {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

            updated += 1;
        }

        tracing::info!("Moderation sweep updated {} reports", updated);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagged_message() {
        let (status, confidence) = evaluate("this is a fake complaint", "");
        assert_eq!(status, ModerationStatus::Flagged);
        assert_eq!(confidence, Decimal::new(80, 2));
    }

    #[test]
    fn test_approved_message() {
        let (status, confidence) = evaluate("road is broken", "");
        assert_eq!(status, ModerationStatus::Approved);
        assert_eq!(confidence, Decimal::new(99, 2));
    }

    #[test]
    fn test_image_reference_is_scanned_too() {
        let (status, _) = evaluate("clean message", "https://cdn.example/fraud.png");
        assert_eq!(status, ModerationStatus::Flagged);
    }

    #[test]
    fn test_denylist_match_is_case_sensitive() {
        let (status, _) = evaluate("this is a FAKE complaint", "");
        assert_eq!(status, ModerationStatus::Approved);
    }

    #[test]
    fn test_substring_containment_counts() {
        // "abuses" contains "abuse"
        let (status, _) = evaluate("someone abuses the mess queue", "");
        assert_eq!(status, ModerationStatus::Flagged);
    }
}
