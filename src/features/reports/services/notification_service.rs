use std::sync::Arc;

use lazy_static::lazy_static;
use minijinja::{context, Environment};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{Language, Report};
use crate::modules::mailer::SmtpMailer;

lazy_static! {
    static ref TEMPLATES: Environment<'static> = {
        let mut env = Environment::new();
        env.add_template(
            "report_submitted.en",
            include_str!("../../../../templates/emails/report_submitted.en.html.jinja"),
        )
        .unwrap();
        env.add_template(
            "report_submitted.hi",
            include_str!("../../../../templates/emails/report_submitted.hi.html.jinja"),
        )
        .unwrap();
        env.add_template(
            "status_updated.en",
            include_str!("../../../../templates/emails/status_updated.en.html.jinja"),
        )
        .unwrap();
        env.add_template(
            "status_updated.hi",
            include_str!("../../../../templates/emails/status_updated.hi.html.jinja"),
        )
        .unwrap();
        env
    };
}

fn language_suffix(language: Language) -> &'static str {
    match language {
        Language::En => "en",
        Language::Hi => "hi",
    }
}

/// Render the submission-receipt email for a report.
///
/// Returns (subject, plain text, html). Exposed at module level so the
/// rendering can be tested without an SMTP transport.
fn render_submission(report: &Report) -> Result<(String, String, String)> {
    let name = format!("report_submitted.{}", language_suffix(report.language));
    let template = TEMPLATES
        .get_template(&name)
        .map_err(|e| AppError::Internal(format!("Missing email template '{}': {}", name, e)))?;

    let sla_due = report.sla_due.format("%Y-%m-%d %H:%M UTC").to_string();
    let html = template
        .render(context! {
            id => report.id.to_string(),
            category => report.category.to_string(),
            priority => report.priority.to_string(),
            sla_due => sla_due,
        })
        .map_err(|e| AppError::Internal(format!("Failed to render email template: {}", e)))?;

    let (subject, text) = match report.language {
        Language::En => (
            "Your report has been received".to_string(),
            format!(
                "Thank you for reporting an issue.\n\nReport ID: {}\nCategory: {}\nPriority: {}\nExpected resolution by: {}\n\n— CampusCare",
                report.id, report.category, report.priority, sla_due
            ),
        ),
        Language::Hi => (
            "आपकी शिकायत प्राप्त हो गई है".to_string(),
            format!(
                "समस्या की सूचना देने के लिए धन्यवाद।\n\nशिकायत आईडी: {}\nश्रेणी: {}\nप्राथमिकता: {}\nअपेक्षित समाधान तिथि: {}\n\n— CampusCare",
                report.id, report.category, report.priority, sla_due
            ),
        ),
    };

    Ok((subject, text, html))
}

/// Render the status-change email for a report
fn render_status_update(report: &Report) -> Result<(String, String, String)> {
    let name = format!("status_updated.{}", language_suffix(report.language));
    let template = TEMPLATES
        .get_template(&name)
        .map_err(|e| AppError::Internal(format!("Missing email template '{}': {}", name, e)))?;

    let html = template
        .render(context! {
            id => report.id.to_string(),
            category => report.category.to_string(),
            status => report.status.to_string(),
        })
        .map_err(|e| AppError::Internal(format!("Failed to render email template: {}", e)))?;

    let (subject, text) = match report.language {
        Language::En => (
            "Your report status has changed".to_string(),
            format!(
                "There is an update on the issue you reported.\n\nReport ID: {}\nNew status: {}\n\n— CampusCare",
                report.id, report.status
            ),
        ),
        Language::Hi => (
            "आपकी शिकायत की स्थिति बदल गई है".to_string(),
            format!(
                "आपके द्वारा दर्ज समस्या पर एक अद्यतन है।\n\nशिकायत आईडी: {}\nनई स्थिति: {}\n\n— CampusCare",
                report.id, report.status
            ),
        ),
    };

    Ok((subject, text, html))
}

/// Dispatches reporter-facing emails.
///
/// Callers on the lifecycle path treat every send as best-effort; a
/// delivery failure is logged and swallowed so it never fails the
/// mutation that triggered it.
pub struct NotificationService {
    mailer: Arc<SmtpMailer>,
}

impl NotificationService {
    pub fn new(mailer: Arc<SmtpMailer>) -> Self {
        Self { mailer }
    }

    /// Email the reporter that their submission was stored
    pub async fn send_submission_receipt(&self, report: &Report) -> Result<()> {
        let Some(email) = report.email.as_deref() else {
            return Ok(());
        };

        let (subject, text, html) = render_submission(report)?;
        self.mailer.send(email, &subject, text, html).await
    }

    /// Email the reporter about a triage status change
    pub async fn send_status_update(&self, report: &Report) -> Result<()> {
        let Some(email) = report.email.as_deref() else {
            return Ok(());
        };

        let (subject, text, html) = render_status_update(report)?;
        self.mailer.send(email, &subject, text, html).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{
        sla_due_from, Department, Priority, ReportCategory, ReportStatus,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_report(language: Language) -> Report {
        let created_at = Utc::now();
        Report {
            id: Uuid::new_v4(),
            message: "Leaky pipe".to_string(),
            image: String::new(),
            email: Some("a@b.com".to_string()),
            phone: None,
            language,
            category: ReportCategory::Hostel,
            department: Department::Maintenance,
            priority: Priority::High,
            status: ReportStatus::InProgress,
            moderation_status: None,
            ai_confidence: None,
            created_at,
            updated_at: created_at,
            sla_due: sla_due_from(created_at),
            is_overdue: false,
        }
    }

    #[test]
    fn test_submission_email_carries_report_details() {
        let report = sample_report(Language::En);
        let (subject, text, html) = render_submission(&report).unwrap();

        assert_eq!(subject, "Your report has been received");
        assert!(text.contains(&report.id.to_string()));
        assert!(html.contains(&report.id.to_string()));
        assert!(html.contains("Hostel"));
        assert!(html.contains("High"));
    }

    #[test]
    fn test_submission_email_localized_by_report_language() {
        let report = sample_report(Language::Hi);
        let (subject, text, html) = render_submission(&report).unwrap();

        assert_eq!(subject, "आपकी शिकायत प्राप्त हो गई है");
        assert!(text.contains("शिकायत आईडी"));
        assert!(html.contains("श्रेणी"));
    }

    #[test]
    fn test_status_update_email_shows_new_status() {
        let report = sample_report(Language::En);
        let (subject, _, html) = render_status_update(&report).unwrap();

        assert_eq!(subject, "Your report status has changed");
        assert!(html.contains("In Progress"));
    }
}
