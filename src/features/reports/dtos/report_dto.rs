use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::reports::models::{
    Department, Language, ModerationStatus, Priority, Report, ReportCategory, ReportStatus,
};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

/// Request DTO for submitting a new report.
///
/// Every field is optional at the wire level; the lifecycle service performs
/// the ordered missing-field check itself so the caller gets back the name of
/// the first missing field rather than a deserializer error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitReportDto {
    pub message: Option<String>,
    /// Public media URL returned by the upload endpoint
    pub image: Option<String>,
    pub language: Option<Language>,
    pub category: Option<String>,
    pub department: Option<String>,
    pub priority: Option<String>,
    pub email: Option<String>,
    /// Anti-automation token; presence is enforced only in production
    pub captcha_token: Option<String>,
}

/// Response DTO for a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportResponseDto {
    pub id: Uuid,
}

/// Request DTO for a triage update (partial, field-by-field)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportDto {
    pub id: Uuid,
    pub status: Option<String>,
    pub department: Option<String>,
    pub priority: Option<String>,
}

/// Response DTO for a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub message: String,
    pub image: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub language: Language,
    pub category: ReportCategory,
    pub department: Department,
    pub priority: Priority,
    pub status: ReportStatus,
    pub moderation_status: Option<ModerationStatus>,
    pub ai_confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sla_due: DateTime<Utc>,
    pub is_overdue: bool,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            message: r.message,
            image: r.image,
            email: r.email,
            phone: r.phone,
            language: r.language,
            category: r.category,
            department: r.department,
            priority: r.priority,
            status: r.status,
            moderation_status: r.moderation_status,
            ai_confidence: r.ai_confidence.and_then(|c| c.to_f64()),
            created_at: r.created_at,
            updated_at: r.updated_at,
            sla_due: r.sla_due,
            is_overdue: r.is_overdue,
        }
    }
}

/// Query parameters for the dashboard listing.
///
/// `"All"` (or an empty/absent value) on any filter means no filter on that
/// field; supplied filters combine with AND.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportListQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub category: Option<String>,
    pub department: Option<String>,
    pub priority: Option<String>,
    pub email: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ReportListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Query parameters for single-report tracking
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct TrackReportQuery {
    /// Report ID issued at submission
    pub id: String,
}

/// Inbound messaging-gateway callback (form-encoded)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InboundMessageDto {
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "MediaUrl0")]
    pub media_url: Option<String>,
}

/// Response DTO for the moderation sweep
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationSweepResponseDto {
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_dto_accepts_camel_case_and_missing_fields() {
        let dto: SubmitReportDto = serde_json::from_value(json!({
            "message": "Leaky pipe",
            "category": "Hostel",
            "captchaToken": "tok"
        }))
        .unwrap();

        assert_eq!(dto.message.as_deref(), Some("Leaky pipe"));
        assert_eq!(dto.captcha_token.as_deref(), Some("tok"));
        assert!(dto.email.is_none());
        assert!(dto.priority.is_none());
    }

    #[test]
    fn test_report_response_serializes_wire_names() {
        let report = Report {
            id: uuid::Uuid::new_v4(),
            message: "Projector broken".to_string(),
            image: String::new(),
            email: Some("a@b.co".to_string()),
            phone: None,
            language: Language::En,
            category: ReportCategory::AcademicBlock,
            department: Department::It,
            priority: Priority::Low,
            status: ReportStatus::InProgress,
            moderation_status: Some(ModerationStatus::Approved),
            ai_confidence: Some(rust_decimal::Decimal::new(99, 2)),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            sla_due: chrono::Utc::now(),
            is_overdue: false,
        };

        let value = serde_json::to_value(ReportResponseDto::from(report)).unwrap();

        assert_eq!(value["category"], "Academic Block");
        assert_eq!(value["department"], "IT");
        assert_eq!(value["status"], "In Progress");
        assert_eq!(value["moderationStatus"], "approved");
        assert_eq!(value["aiConfidence"], 0.99);
        assert_eq!(value["isOverdue"], false);
    }

    #[test]
    fn test_inbound_dto_uses_gateway_field_names() {
        let dto: InboundMessageDto = serde_json::from_value(json!({
            "Body": "streetlight out",
            "From": "+911234567890",
            "MediaUrl0": "https://cdn.example/a.jpg"
        }))
        .unwrap();

        assert_eq!(dto.body.as_deref(), Some("streetlight out"));
        assert_eq!(dto.from.as_deref(), Some("+911234567890"));
        assert_eq!(dto.media_url.as_deref(), Some("https://cdn.example/a.jpg"));
    }
}
