use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{InboundMessageDto, SubmitReportDto, UpdateReportDto};
use crate::features::reports::models::{
    sla_due_from, Department, Language, ModerationStatus, Priority, Report, ReportCategory,
    ReportStatus, REPORT_COLUMNS,
};
use crate::features::reports::services::moderation::evaluate;
use crate::features::reports::services::NotificationService;
use crate::modules::messaging::MessagingClient;
use crate::shared::validation::EMAIL_REGEX;

/// Submission payload after validation and department routing
#[derive(Debug)]
struct ValidatedSubmission {
    message: String,
    image: String,
    email: String,
    language: Language,
    category: ReportCategory,
    department: Department,
    priority: Priority,
}

fn present(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false)
}

/// Ordered submission validation.
///
/// Checks run in a fixed order so the caller always learns about the
/// first problem: missing fields (message, category, email, department,
/// priority), then the email shape, then the captcha gate (production
/// only), then enum values. The stored department comes from the routing
/// table, not the caller, except for the `Other` category.
fn validate_submission(dto: &SubmitReportDto, production: bool) -> Result<ValidatedSubmission> {
    let fields = [
        ("message", &dto.message),
        ("category", &dto.category),
        ("email", &dto.email),
        ("department", &dto.department),
        ("priority", &dto.priority),
    ];
    for (name, value) in fields {
        if !present(value) {
            return Err(AppError::Validation(format!(
                "Missing required field: {}",
                name
            )));
        }
    }

    // Presence was just checked above
    let message = dto.message.clone().unwrap_or_default();
    let email = dto.email.clone().unwrap_or_default();
    let raw_category = dto.category.clone().unwrap_or_default();
    let raw_department = dto.department.clone().unwrap_or_default();
    let raw_priority = dto.priority.clone().unwrap_or_default();

    if !EMAIL_REGEX.is_match(&email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    if production && !present(&dto.captcha_token) {
        return Err(AppError::Validation("Captcha token required".to_string()));
    }

    let category = raw_category
        .parse::<ReportCategory>()
        .map_err(AppError::Validation)?;
    let requested_department = raw_department
        .parse::<Department>()
        .map_err(AppError::Validation)?;
    let priority = raw_priority
        .parse::<Priority>()
        .map_err(AppError::Validation)?;

    Ok(ValidatedSubmission {
        message,
        image: dto.image.clone().unwrap_or_default(),
        email,
        language: dto.language.unwrap_or(Language::En),
        category,
        department: category.route_department(Some(requested_department)),
        priority,
    })
}

/// Fields of a report row to be inserted
struct NewReport {
    message: String,
    image: String,
    email: Option<String>,
    phone: Option<String>,
    language: Language,
    category: ReportCategory,
    department: Department,
    priority: Priority,
    moderation: Option<(ModerationStatus, Decimal)>,
}

/// Core lifecycle service: submission, triage updates, tracking, and the
/// inbound messaging path.
pub struct ReportService {
    pool: PgPool,
    notifier: Arc<NotificationService>,
    messaging: Option<Arc<MessagingClient>>,
    production: bool,
}

impl ReportService {
    pub fn new(
        pool: PgPool,
        notifier: Arc<NotificationService>,
        messaging: Option<Arc<MessagingClient>>,
        production: bool,
    ) -> Self {
        Self {
            pool,
            notifier,
            messaging,
            production,
        }
    }

    async fn insert(&self, new: NewReport) -> Result<Report> {
        let created_at = Utc::now();
        let (moderation_status, ai_confidence) = match new.moderation {
            Some((status, confidence)) => (Some(status), Some(confidence)),
            None => (None, None),
        };

        let sql = format!(
            "INSERT INTO reports (message, image, email, phone, language, category, department, \
             priority, status, moderation_status, ai_confidence, created_at, updated_at, sla_due, \
             is_overdue) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {}",
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&sql)
            .bind(&new.message)
            .bind(&new.image)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(new.language)
            .bind(new.category)
            .bind(new.department)
            .bind(new.priority)
            .bind(ReportStatus::Pending)
            .bind(moderation_status)
            .bind(ai_confidence)
            .bind(created_at)
            .bind(created_at)
            .bind(sla_due_from(created_at))
            .bind(false)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Report created: id={}, category={}, department={}",
            report.id,
            report.category,
            report.department
        );

        Ok(report)
    }

    /// Validate and store a new web submission, then send the receipt
    /// email best-effort.
    pub async fn submit(&self, dto: SubmitReportDto) -> Result<Report> {
        let validated = validate_submission(&dto, self.production)?;

        let report = self
            .insert(NewReport {
                message: validated.message,
                image: validated.image,
                email: Some(validated.email),
                phone: None,
                language: validated.language,
                category: validated.category,
                department: validated.department,
                priority: validated.priority,
                moderation: None,
            })
            .await?;

        if let Err(e) = self.notifier.send_submission_receipt(&report).await {
            tracing::warn!("Submission receipt for {} not delivered: {}", report.id, e);
        }

        Ok(report)
    }

    /// Apply a partial triage update; only supplied fields are written,
    /// `updated_at` is always refreshed.
    pub async fn update(&self, dto: UpdateReportDto) -> Result<Report> {
        if dto.status.is_none() && dto.department.is_none() && dto.priority.is_none() {
            return Err(AppError::Validation(
                "At least one of status, department, or priority must be supplied".to_string(),
            ));
        }

        let status = dto
            .status
            .as_deref()
            .map(str::parse::<ReportStatus>)
            .transpose()
            .map_err(AppError::Validation)?;
        let department = dto
            .department
            .as_deref()
            .map(str::parse::<Department>)
            .transpose()
            .map_err(AppError::Validation)?;
        let priority = dto
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()
            .map_err(AppError::Validation)?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE reports SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(status) = status {
            qb.push(", status = ");
            qb.push_bind(status);
        }
        if let Some(department) = department {
            qb.push(", department = ");
            qb.push_bind(department);
        }
        if let Some(priority) = priority {
            qb.push(", priority = ");
            qb.push_bind(priority);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(dto.id);
        qb.push(format!(" RETURNING {}", REPORT_COLUMNS));

        let report = qb
            .build_query_as::<Report>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report {}: {:?}", dto.id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report '{}' not found", dto.id)))?;

        if status.is_some() && report.email.is_some() {
            if let Err(e) = self.notifier.send_status_update(&report).await {
                tracing::warn!("Status update for {} not delivered: {}", report.id, e);
            }
        }

        Ok(report)
    }

    /// Single-record lookup; a malformed id behaves like an unknown one
    pub async fn track(&self, raw_id: &str) -> Result<Report> {
        let id = Uuid::parse_str(raw_id)
            .map_err(|_| AppError::NotFound(format!("Report '{}' not found", raw_id)))?;

        let sql = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch report {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report '{}' not found", id)))
    }

    /// Create a report from an inbound WhatsApp/SMS message.
    ///
    /// The moderation evaluator runs inline on this path, and a gateway
    /// acknowledgment goes out best-effort when messaging is configured.
    pub async fn submit_inbound(&self, dto: InboundMessageDto) -> Result<Report> {
        let message = dto
            .body
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::BadRequest("Inbound message has no body".to_string()))?
            .to_string();

        let phone = dto.from.filter(|s| !s.is_empty());
        let image = dto.media_url.unwrap_or_default();
        let moderation = evaluate(&message, &image);

        let category = ReportCategory::Other;
        let report = self
            .insert(NewReport {
                message,
                image,
                email: None,
                phone,
                language: Language::En,
                category,
                department: category.route_department(None),
                priority: Priority::Medium,
                moderation: Some(moderation),
            })
            .await?;

        if let (Some(client), Some(phone)) = (&self.messaging, report.phone.as_deref()) {
            let ack = format!(
                "Your report has been received. Track it with ID {}.",
                report.id
            );
            if let Err(e) = client.send_message(phone, &ack).await {
                tracing::warn!("Acknowledgment for {} not delivered: {}", report.id, e);
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> SubmitReportDto {
        SubmitReportDto {
            message: Some("Leaky pipe".to_string()),
            image: None,
            language: None,
            category: Some("Hostel".to_string()),
            department: Some("Security".to_string()),
            priority: Some("High".to_string()),
            email: Some("a@b.com".to_string()),
            captcha_token: None,
        }
    }

    #[test]
    fn test_valid_submission_routes_department() {
        let v = validate_submission(&valid_dto(), false).unwrap();

        // Hostel routes to Maintenance, whatever the caller supplied
        assert_eq!(v.department, Department::Maintenance);
        assert_eq!(v.category, ReportCategory::Hostel);
        assert_eq!(v.priority, Priority::High);
        assert_eq!(v.language, Language::En);
        assert_eq!(v.image, "");
    }

    #[test]
    fn test_other_category_honors_caller_department() {
        let mut dto = valid_dto();
        dto.category = Some("Other".to_string());
        let v = validate_submission(&dto, false).unwrap();
        assert_eq!(v.department, Department::Security);
    }

    #[test]
    fn test_first_missing_field_wins() {
        let mut dto = valid_dto();
        dto.message = None;
        dto.email = None;
        let err = validate_submission(&dto, false).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ref msg) if msg == "Missing required field: message"
        ));

        let mut dto = valid_dto();
        dto.email = Some("   ".to_string());
        dto.priority = None;
        let err = validate_submission(&dto, false).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ref msg) if msg == "Missing required field: email"
        ));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut dto = valid_dto();
        dto.email = Some("not-an-email".to_string());
        let err = validate_submission(&dto, false).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ref msg) if msg == "Invalid email address"
        ));
    }

    #[test]
    fn test_captcha_required_only_in_production() {
        let dto = valid_dto();
        assert!(validate_submission(&dto, false).is_ok());

        let err = validate_submission(&dto, true).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ref msg) if msg == "Captcha token required"
        ));

        let mut dto = valid_dto();
        dto.captcha_token = Some("tok".to_string());
        assert!(validate_submission(&dto, true).is_ok());
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let mut dto = valid_dto();
        dto.priority = Some("Urgent".to_string());
        let err = validate_submission(&dto, false).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
