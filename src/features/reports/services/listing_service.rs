use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::ReportListQuery;
use crate::features::reports::models::{
    Department, Priority, Report, ReportCategory, REPORT_COLUMNS,
};

/// Parsed dashboard filters; `None` means no filter on that field
#[derive(Debug, Default)]
struct ListFilters {
    category: Option<ReportCategory>,
    department: Option<Department>,
    priority: Option<Priority>,
    email: Option<String>,
}

/// The sentinel `"All"` and empty values behave like an absent filter
fn filter_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty() && *s != "All")
}

impl ListFilters {
    fn from_query(query: &ReportListQuery) -> Result<Self> {
        let category = filter_value(query.category.as_deref())
            .map(str::parse::<ReportCategory>)
            .transpose()
            .map_err(AppError::Validation)?;
        let department = filter_value(query.department.as_deref())
            .map(str::parse::<Department>)
            .transpose()
            .map_err(AppError::Validation)?;
        let priority = filter_value(query.priority.as_deref())
            .map(str::parse::<Priority>)
            .transpose()
            .map_err(AppError::Validation)?;
        let email = filter_value(query.email.as_deref()).map(str::to_string);

        Ok(Self {
            category,
            department,
            priority,
            email,
        })
    }

    /// Append the WHERE clause; supplied filters AND-combine
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut prefix = " WHERE ";

        if let Some(category) = self.category {
            qb.push(prefix).push("category = ").push_bind(category);
            prefix = " AND ";
        }
        if let Some(department) = self.department {
            qb.push(prefix).push("department = ").push_bind(department);
            prefix = " AND ";
        }
        if let Some(priority) = self.priority {
            qb.push(prefix).push("priority = ").push_bind(priority);
            prefix = " AND ";
        }
        if let Some(ref email) = self.email {
            qb.push(prefix).push("email = ").push_bind(email.clone());
        }
    }
}

/// Dashboard listing: filtered, newest-first pages plus the unpaged total.
///
/// Reading a page also performs the lazy overdue write: any returned
/// report past its SLA deadline and not resolved gets its `is_overdue`
/// flag persisted before being returned.
pub struct ReportListingService {
    pool: PgPool,
}

impl ReportListingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &ReportListQuery) -> Result<(Vec<Report>, i64)> {
        let filters = ListFilters::from_query(query)?;
        let pagination = query.pagination();

        // Unpaged total for the same filter
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reports");
        filters.push_where(&mut count_qb);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let mut page_qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM reports", REPORT_COLUMNS));
        filters.push_where(&mut page_qb);
        page_qb.push(" ORDER BY created_at DESC LIMIT ");
        page_qb.push_bind(pagination.limit());
        page_qb.push(" OFFSET ");
        page_qb.push_bind(pagination.offset());

        let mut reports = page_qb
            .build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        self.flag_overdue(&mut reports).await?;

        Ok((reports, total))
    }

    /// Idempotent single-field write: flips `is_overdue` to true for
    /// returned reports past their deadline. Deliberately leaves
    /// `updated_at` untouched, a read is not a triage mutation.
    async fn flag_overdue(&self, reports: &mut [Report]) -> Result<()> {
        for id in overdue_candidates(reports, Utc::now()) {
            sqlx::query(FLAG_OVERDUE_SQL)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to flag report {} overdue: {:?}", id, e);
                    AppError::Database(e)
                })?;
        }

        Ok(())
    }
}

const FLAG_OVERDUE_SQL: &str = "UPDATE reports SET is_overdue = TRUE WHERE id = $1";

/// Selects the reports in the page that need the overdue write, flipping
/// them in memory so the caller returns the flagged state
fn overdue_candidates(reports: &mut [Report], now: chrono::DateTime<Utc>) -> Vec<uuid::Uuid> {
    let mut ids = Vec::new();

    for report in reports.iter_mut() {
        if report.needs_overdue_flag(now) {
            report.is_overdue = true;
            ids.push(report.id);
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{Language, ReportStatus};
    use chrono::Duration;
    use uuid::Uuid;

    fn report(status: ReportStatus, sla_due: chrono::DateTime<Utc>, is_overdue: bool) -> Report {
        let now = Utc::now();
        Report {
            id: Uuid::new_v4(),
            message: "Broken streetlight near gate 2".to_string(),
            image: String::new(),
            email: None,
            phone: None,
            language: Language::En,
            category: ReportCategory::Road,
            department: Department::Maintenance,
            priority: Priority::Medium,
            status,
            moderation_status: None,
            ai_confidence: None,
            created_at: now,
            updated_at: now,
            sla_due,
            is_overdue,
        }
    }

    fn query_with_filters(
        category: Option<&str>,
        department: Option<&str>,
        email: Option<&str>,
    ) -> ReportListQuery {
        ReportListQuery {
            page: 1,
            page_size: 10,
            category: category.map(str::to_string),
            department: department.map(str::to_string),
            priority: None,
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_all_sentinel_means_no_filter() {
        assert_eq!(filter_value(Some("All")), None);
        assert_eq!(filter_value(Some("")), None);
        assert_eq!(filter_value(Some("  ")), None);
        assert_eq!(filter_value(None), None);
        assert_eq!(filter_value(Some("Hostel")), Some("Hostel"));
    }

    #[test]
    fn test_filters_parse_from_query() {
        let query = query_with_filters(Some("Academic Block"), Some("All"), Some("a@b.co"));
        let filters = ListFilters::from_query(&query).unwrap();

        assert_eq!(filters.category, Some(ReportCategory::AcademicBlock));
        assert_eq!(filters.department, None);
        assert_eq!(filters.priority, None);
        assert_eq!(filters.email, Some("a@b.co".to_string()));
    }

    #[test]
    fn test_unknown_filter_value_rejected() {
        let query = query_with_filters(Some("Cafeteria"), None, None);
        assert!(ListFilters::from_query(&query).is_err());
    }

    #[test]
    fn test_where_clause_and_combines() {
        let query = query_with_filters(Some("Hostel"), Some("Maintenance"), Some("a@b.co"));
        let filters = ListFilters::from_query(&query).unwrap();

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reports");
        filters.push_where(&mut qb);
        let sql = qb.sql();

        assert!(sql.contains(" WHERE category = "));
        assert!(sql.contains(" AND department = "));
        assert!(sql.contains(" AND email = "));
    }

    #[test]
    fn test_no_filters_means_no_where_clause() {
        let query = query_with_filters(None, None, None);
        let filters = ListFilters::from_query(&query).unwrap();

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reports");
        filters.push_where(&mut qb);

        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM reports");
    }

    #[test]
    fn test_overdue_write_touches_only_the_flag() {
        // A read must not refresh updated_at or any other column
        assert!(FLAG_OVERDUE_SQL.starts_with("UPDATE reports SET is_overdue = TRUE"));
        assert!(!FLAG_OVERDUE_SQL.contains("updated_at"));
        assert!(!FLAG_OVERDUE_SQL.contains(','));
    }

    #[test]
    fn test_overdue_candidates_select_only_eligible_reports() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        let future = now + Duration::hours(1);

        let mut page = vec![
            report(ReportStatus::Pending, past, false),
            report(ReportStatus::Resolved, past, false),
            report(ReportStatus::Pending, future, false),
            report(ReportStatus::InProgress, past, true),
        ];

        let ids = overdue_candidates(&mut page, now);

        assert_eq!(ids, vec![page[0].id]);
        assert!(page[0].is_overdue);
        assert!(!page[1].is_overdue);
        assert!(!page[2].is_overdue);
    }

    #[test]
    fn test_already_flagged_page_produces_no_writes() {
        let now = Utc::now();
        let past = now - Duration::hours(1);

        let mut page = vec![
            report(ReportStatus::Pending, past, false),
            report(ReportStatus::InProgress, past, false),
        ];

        assert_eq!(overdue_candidates(&mut page, now).len(), 2);
        // The flip is persisted, so re-reading the same page writes nothing
        assert!(overdue_candidates(&mut page, now).is_empty());
    }
}
