use crate::api::error::AppError;
use crate::models::{Detection, PatientUpload};
use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

/// Multipart form shape for /analyze (documentation only; extraction
/// happens field by field).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AnalyzeRequest {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// JSON-encoded patient metadata, keyed by `patientID`
    pub patient_data: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub scan_id: String,
    pub report_id: Option<String>,
    pub patient_id: Option<String>,
    pub boxes: Vec<Detection>,
    pub diagnosis: String,
    pub has_concha_bullosa: bool,
    pub has_deviation: bool,
    pub annotated_image_base64: String,
    pub width: u32,
    pub height: u32,
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body(content = AnalyzeRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis complete", body = AnalyzeResponse),
        (status = 400, description = "Missing or invalid image"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "analysis"
)]
pub async fn analyze_scan(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut image: Option<(String, String, Vec<u8>)> = None;
    let mut patient: Option<PatientUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let filename = field.file_name().unwrap_or("scan.jpg").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            image = Some((filename, content_type, data.to_vec()));
        } else if name == "patient_data" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            if !text.is_empty() {
                patient = Some(serde_json::from_str(&text).map_err(|e| {
                    AppError::Validation(format!("Invalid patient_data payload: {e}"))
                })?);
            }
        }
    }

    let (filename, content_type, data) =
        image.ok_or_else(|| AppError::Validation("No image uploaded".to_string()))?;

    let outcome = state
        .analyzer
        .analyze(&content_type, &filename, &data, patient)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        scan_id: outcome.scan_id,
        report_id: Some(outcome.report_id),
        patient_id: outcome.patient_id,
        boxes: outcome.boxes,
        diagnosis: outcome.diagnosis,
        has_concha_bullosa: outcome.has_concha_bullosa,
        has_deviation: outcome.has_deviation,
        annotated_image_base64: outcome.annotated_image_base64,
        width: outcome.width,
        height: outcome.height,
    }))
}
