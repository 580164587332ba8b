use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::{ModerationService, ReportListingService, ReportService};

/// Shared state for the reports feature
#[derive(Clone)]
pub struct ReportsState {
    pub reports: Arc<ReportService>,
    pub listing: Arc<ReportListingService>,
    pub moderation: Arc<ModerationService>,
}

/// Create routes for the reports feature
pub fn routes(state: ReportsState) -> Router {
    Router::new()
        .route(
            "/api/reports",
            post(handlers::submit_report)
                .get(handlers::list_reports)
                .put(handlers::update_report),
        )
        .route("/api/track-report", get(handlers::track_report))
        .route("/api/moderate", post(handlers::run_moderation))
        .route("/api/webhooks/inbound", post(handlers::inbound_message))
        .with_state(state)
}
