pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::ReportsState;
pub use services::{ModerationService, NotificationService, ReportListingService, ReportService};
