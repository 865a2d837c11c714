use crate::api::error::AppError;
use crate::entities::{patients, prelude::*};
use crate::models::PatientUpload;
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, SqlErr};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct PatientListResponse {
    pub patients: Vec<patients::Model>,
}

#[derive(Serialize, ToSchema)]
pub struct CreatePatientResponse {
    pub success: bool,
    pub patient_id: String,
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patients, newest first", body = PatientListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "patients"
)]
pub async fn list_patients(
    State(state): State<crate::AppState>,
) -> Result<Json<PatientListResponse>, AppError> {
    let patients = Patients::find()
        .order_by_desc(patients::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(PatientListResponse { patients }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientUpload,
    responses(
        (status = 201, description = "Patient created", body = CreatePatientResponse),
        (status = 400, description = "Duplicate external patient id"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "patients"
)]
pub async fn create_patient(
    State(state): State<crate::AppState>,
    Json(payload): Json<PatientUpload>,
) -> Result<(StatusCode, Json<CreatePatientResponse>), AppError> {
    let patient = patients::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        external_patient_id: Set(payload.patient_id.clone()),
        name: Set(payload.name.clone()),
        age: Set(payload.age.clone()),
        gender: Set(payload.gender.clone()),
        referring_doctor: Set(payload.referring_doctor.clone()),
        notes: Set(payload.notes.clone()),
        created_at: Set(Utc::now()),
    };

    let created = patient.insert(&state.db).await.map_err(|e| {
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            AppError::Validation("Patient with this ID already exists".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePatientResponse {
            success: true,
            patient_id: created.id,
        }),
    ))
}
