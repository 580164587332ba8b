use axum::{
    extract::{Form, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::features::reports::dtos::{InboundMessageDto, SubmitReportResponseDto};
use crate::features::reports::routes::ReportsState;
use crate::shared::types::ApiResponse;

/// Messaging-gateway webhook for inbound WhatsApp/SMS reports
#[utoipa::path(
    post,
    path = "/api/webhooks/inbound",
    responses(
        (status = 201, description = "Report created from inbound message", body = ApiResponse<SubmitReportResponseDto>),
        (status = 400, description = "Message has no body")
    ),
    tag = "webhooks"
)]
pub async fn inbound_message(
    State(state): State<ReportsState>,
    Form(dto): Form<InboundMessageDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    let report = state.reports.submit_inbound(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(SubmitReportResponseDto { id: report.id }),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}
