use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{
    ModerationSweepResponseDto, ReportListQuery, ReportResponseDto, SubmitReportDto,
    SubmitReportResponseDto, TrackReportQuery, UpdateReportDto,
};
use crate::features::reports::routes::ReportsState;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a new report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = SubmitReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<SubmitReportResponseDto>),
        (status = 400, description = "Validation failed")
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(state): State<ReportsState>,
    AppJson(dto): AppJson<SubmitReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    let report = state.reports.submit(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(SubmitReportResponseDto { id: report.id }),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}

/// List reports with filters and pagination
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Filtered page of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Unknown filter value")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportsState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = state.listing.list(&query).await?;
    let reports = reports.into_iter().map(ReportResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Apply a triage update to a report
#[utoipa::path(
    put,
    path = "/api/reports",
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "No updatable field supplied"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn update_report(
    State(state): State<ReportsState>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.reports.update(dto).await?;

    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report updated successfully".to_string()),
        None,
    )))
}

/// Track a single report by ID
#[utoipa::path(
    get,
    path = "/api/track-report",
    params(TrackReportQuery),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn track_report(
    State(state): State<ReportsState>,
    Query(query): Query<TrackReportQuery>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.reports.track(&query.id).await?;

    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Run the moderation sweep over all pending reports
#[utoipa::path(
    post,
    path = "/api/moderate",
    responses(
        (status = 200, description = "Sweep completed", body = ApiResponse<ModerationSweepResponseDto>),
    ),
    tag = "moderation"
)]
pub async fn run_moderation(
    State(state): State<ReportsState>,
) -> Result<Json<ApiResponse<ModerationSweepResponseDto>>> {
    let updated = state.moderation.sweep().await?;

    Ok(Json(ApiResponse::success(
        Some(ModerationSweepResponseDto { updated }),
        Some("Moderation sweep completed".to_string()),
        None,
    )))
}
