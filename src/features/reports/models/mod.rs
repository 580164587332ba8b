mod report;

pub use report::{
    sla_due_from, Department, Language, ModerationStatus, Priority, Report, ReportCategory,
    ReportStatus,
};
pub(crate) use report::REPORT_COLUMNS;
