use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::SLA_WINDOW_HOURS;

/// Reporter-facing language for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_language", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
}

/// Complaint category enum matching database enum.
///
/// Wire values are the labels the dashboard shows ("Academic Block" etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_category", rename_all = "snake_case")]
pub enum ReportCategory {
    Hostel,
    #[serde(rename = "Academic Block")]
    AcademicBlock,
    Garden,
    Temple,
    Road,
    Mess,
    Other,
}

/// Responsible internal team enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_department", rename_all = "lowercase")]
pub enum Department {
    Maintenance,
    Sanitation,
    Security,
    #[serde(rename = "IT")]
    It,
}

/// Report priority enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_priority", rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Triage status enum matching database enum.
///
/// Moderation verdicts live in a separate vocabulary (`ModerationStatus`)
/// so dashboard filters always operate on these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

/// Automated content-screening verdict enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Approved,
    Flagged,
}

impl ReportCategory {
    /// Category → responsible department routing table.
    ///
    /// Applied regardless of any caller-supplied department; the caller's
    /// choice is honored only for `Other` (falling back to Maintenance).
    pub fn route_department(self, requested: Option<Department>) -> Department {
        match self {
            ReportCategory::Hostel | ReportCategory::Road => Department::Maintenance,
            ReportCategory::AcademicBlock => Department::It,
            ReportCategory::Garden | ReportCategory::Temple | ReportCategory::Mess => {
                Department::Sanitation
            }
            ReportCategory::Other => requested.unwrap_or(Department::Maintenance),
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportCategory::Hostel => "Hostel",
            ReportCategory::AcademicBlock => "Academic Block",
            ReportCategory::Garden => "Garden",
            ReportCategory::Temple => "Temple",
            ReportCategory::Road => "Road",
            ReportCategory::Mess => "Mess",
            ReportCategory::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ReportCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hostel" => Ok(ReportCategory::Hostel),
            "Academic Block" => Ok(ReportCategory::AcademicBlock),
            "Garden" => Ok(ReportCategory::Garden),
            "Temple" => Ok(ReportCategory::Temple),
            "Road" => Ok(ReportCategory::Road),
            "Mess" => Ok(ReportCategory::Mess),
            "Other" => Ok(ReportCategory::Other),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Department::Maintenance => "Maintenance",
            Department::Sanitation => "Sanitation",
            Department::Security => "Security",
            Department::It => "IT",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Maintenance" => Ok(Department::Maintenance),
            "Sanitation" => Ok(Department::Sanitation),
            "Security" => Ok(Department::Security),
            "IT" => Ok(Department::It),
            other => Err(format!("unknown department '{}'", other)),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "Critical" => Ok(Priority::Critical),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ReportStatus::Pending),
            "In Progress" => Ok(ReportStatus::InProgress),
            "Resolved" => Ok(ReportStatus::Resolved),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            other => Err(format!("unknown language '{}'", other)),
        }
    }
}

/// Column list shared by every query returning full report rows
pub(crate) const REPORT_COLUMNS: &str = "id, message, image, email, phone, language, category, \
     department, priority, status, moderation_status, ai_confidence, created_at, updated_at, \
     sla_due, is_overdue";

/// Database model for a complaint report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub message: String,
    /// Public media URL, or empty string when no photo was attached
    pub image: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub language: Language,
    pub category: ReportCategory,
    pub department: Department,
    pub priority: Priority,
    pub status: ReportStatus,
    pub moderation_status: Option<ModerationStatus>,
    pub ai_confidence: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sla_due: DateTime<Utc>,
    pub is_overdue: bool,
}

/// SLA deadline: fixed window after creation, set once and never recomputed
pub fn sla_due_from(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::hours(SLA_WINDOW_HOURS)
}

impl Report {
    /// Whether a read should flip the persisted overdue cache.
    ///
    /// Only ever flips false → true; a report that is already overdue or
    /// resolved is left alone, keeping the flag monotonic.
    pub fn needs_overdue_flag(&self, now: DateTime<Utc>) -> bool {
        !self.is_overdue && self.status != ReportStatus::Resolved && self.sla_due < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_table() {
        use Department::*;
        use ReportCategory::*;

        assert_eq!(Hostel.route_department(None), Maintenance);
        assert_eq!(AcademicBlock.route_department(None), It);
        assert_eq!(Garden.route_department(None), Sanitation);
        assert_eq!(Temple.route_department(None), Sanitation);
        assert_eq!(Road.route_department(None), Maintenance);
        assert_eq!(Mess.route_department(None), Sanitation);
    }

    #[test]
    fn test_routing_ignores_caller_department_except_other() {
        // Hostel always routes to Maintenance, whatever the caller asked for
        assert_eq!(
            ReportCategory::Hostel.route_department(Some(Department::Security)),
            Department::Maintenance
        );
        // Other honors the caller's choice
        assert_eq!(
            ReportCategory::Other.route_department(Some(Department::Security)),
            Department::Security
        );
        // Other without a caller choice falls back to Maintenance
        assert_eq!(
            ReportCategory::Other.route_department(None),
            Department::Maintenance
        );
    }

    #[test]
    fn test_enum_wire_names_round_trip() {
        assert_eq!(
            "Academic Block".parse::<ReportCategory>().unwrap(),
            ReportCategory::AcademicBlock
        );
        assert_eq!(ReportCategory::AcademicBlock.to_string(), "Academic Block");
        assert_eq!("IT".parse::<Department>().unwrap(), Department::It);
        assert_eq!(
            "In Progress".parse::<ReportStatus>().unwrap(),
            ReportStatus::InProgress
        );
        assert!("hostel".parse::<ReportCategory>().is_err()); // case-sensitive
        assert!("Urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_sla_due_is_exactly_48h_after_creation() {
        let created_at = Utc::now();
        assert_eq!(sla_due_from(created_at) - created_at, Duration::hours(48));
    }

    fn report_with(status: ReportStatus, sla_due: DateTime<Utc>, is_overdue: bool) -> Report {
        Report {
            id: Uuid::new_v4(),
            message: "Leaky pipe".to_string(),
            image: String::new(),
            email: Some("a@b.com".to_string()),
            phone: None,
            language: Language::En,
            category: ReportCategory::Hostel,
            department: Department::Maintenance,
            priority: Priority::High,
            status,
            moderation_status: None,
            ai_confidence: None,
            created_at: sla_due - Duration::hours(48),
            updated_at: sla_due - Duration::hours(48),
            sla_due,
            is_overdue,
        }
    }

    #[test]
    fn test_overdue_flag_needed_when_past_sla_and_unresolved() {
        let now = Utc::now();
        let report = report_with(ReportStatus::Pending, now - Duration::hours(1), false);
        assert!(report.needs_overdue_flag(now));
    }

    #[test]
    fn test_overdue_flag_not_needed_for_resolved_or_future_sla() {
        let now = Utc::now();
        let resolved = report_with(ReportStatus::Resolved, now - Duration::hours(1), false);
        assert!(!resolved.needs_overdue_flag(now));

        let fresh = report_with(ReportStatus::Pending, now + Duration::hours(1), false);
        assert!(!fresh.needs_overdue_flag(now));
    }

    #[test]
    fn test_overdue_flag_is_monotonic() {
        let now = Utc::now();
        // Already flagged: nothing left to write, even after resolution
        let mut report = report_with(ReportStatus::Resolved, now - Duration::hours(1), true);
        assert!(!report.needs_overdue_flag(now));
        report.status = ReportStatus::Pending;
        assert!(!report.needs_overdue_flag(now));
    }
}
