use utoipa::{Modify, OpenApi};

use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::submit_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::update_report,
        reports_handlers::report_handler::track_report,
        reports_handlers::report_handler::run_moderation,
        reports_handlers::inbound_handler::inbound_message,
        // Uploads
        uploads_handlers::upload_handler::upload_image,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Report domain
            reports_models::Language,
            reports_models::ReportCategory,
            reports_models::Department,
            reports_models::Priority,
            reports_models::ReportStatus,
            reports_models::ModerationStatus,
            // Reports
            reports_dtos::SubmitReportDto,
            reports_dtos::SubmitReportResponseDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::InboundMessageDto,
            reports_dtos::ModerationSweepResponseDto,
            ApiResponse<reports_dtos::SubmitReportResponseDto>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ModerationSweepResponseDto>,
            // Uploads
            uploads_dtos::UploadImageDto,
            uploads_dtos::ImageUploadResponseDto,
            ApiResponse<uploads_dtos::ImageUploadResponseDto>,
        )
    ),
    tags(
        (name = "reports", description = "Report submission, triage, and tracking"),
        (name = "moderation", description = "Automated content-screening sweep"),
        (name = "uploads", description = "Report image uploads"),
        (name = "webhooks", description = "Inbound messaging-gateway callbacks"),
    ),
    info(
        title = "CampusCare API",
        version = "0.1.0",
        description = "API documentation for CampusCare",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
