mod listing_service;
mod moderation;
mod notification_service;
mod report_service;

pub use listing_service::ReportListingService;
pub use moderation::ModerationService;
pub use notification_service::NotificationService;
pub use report_service::ReportService;
