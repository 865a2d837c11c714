use crate::api::error::AppError;
use crate::entities::{prelude::*, reports};
use crate::services::scan_store;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const REPORT_LIMIT: u64 = 50;

#[derive(Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Fetch a single report by id instead of listing
    pub id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateReportRequest {
    pub scan_result_id: Option<String>,
    pub pdf_path: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<reports::Model>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateReportResponse {
    pub success: bool,
    pub report_id: String,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Report list, or a single report when `id` is given"),
        (status = 404, description = "Unknown report id"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn get_reports(
    State(state): State<crate::AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    if let Some(id) = query.id {
        let report = Reports::find_by_id(id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;
        return Ok(Json(report).into_response());
    }

    let reports = Reports::find()
        .order_by_desc(reports::Column::CreatedAt)
        .limit(REPORT_LIMIT)
        .all(&state.db)
        .await?;

    Ok(Json(ReportListResponse { reports }).into_response())
}

#[utoipa::path(
    post,
    path = "/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report saved", body = CreateReportResponse),
        (status = 400, description = "scan_result_id missing"),
        (status = 404, description = "Unknown scan result"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<CreateReportResponse>), AppError> {
    let scan_result_id = payload
        .scan_result_id
        .ok_or_else(|| AppError::Validation("scan_result_id required".to_string()))?;

    let report_id = scan_store::link_report(&state.db, &scan_result_id, payload.pdf_path).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponse {
            success: true,
            report_id,
            message: "Report saved successfully".to_string(),
        }),
    ))
}
