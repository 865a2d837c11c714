use crate::api::error::AppError;
use crate::entities::{prelude::*, scan_results};
use axum::{Json, extract::State};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use utoipa::ToSchema;

const HISTORY_LIMIT: u64 = 50;

#[derive(Serialize, ToSchema)]
pub struct HistoryEntry {
    pub id: String,
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub patient_age: Option<String>,
    pub patient_gender: Option<String>,
    pub patient_external_id: Option<String>,
    pub referring_doctor: Option<String>,
    pub filename: String,
    pub diagnosis: String,
    pub has_concha_bullosa: bool,
    pub has_deviation: bool,
    pub scan_date: String,
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Most recent scans with patient context", body = HistoryResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "analysis"
)]
pub async fn scan_history(
    State(state): State<crate::AppState>,
) -> Result<Json<HistoryResponse>, AppError> {
    let rows = ScanResults::find()
        .find_also_related(Patients)
        .order_by_desc(scan_results::Column::ScanDate)
        .limit(HISTORY_LIMIT)
        .all(&state.db)
        .await?;

    let history = rows
        .into_iter()
        .map(|(scan, patient)| HistoryEntry {
            id: scan.id,
            patient_id: scan.patient_id,
            patient_name: patient.as_ref().map(|p| p.name.clone()),
            patient_age: patient.as_ref().and_then(|p| p.age.clone()),
            patient_gender: patient.as_ref().and_then(|p| p.gender.clone()),
            patient_external_id: patient.as_ref().map(|p| p.external_patient_id.clone()),
            referring_doctor: patient.as_ref().and_then(|p| p.referring_doctor.clone()),
            filename: scan.filename,
            diagnosis: scan.diagnosis,
            has_concha_bullosa: scan.has_concha_bullosa,
            has_deviation: scan.has_deviation,
            scan_date: scan.scan_date.to_rfc3339(),
        })
        .collect();

    Ok(Json(HistoryResponse { history }))
}
