use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use carebook_core::AppError;

use crate::db::bounded;
use crate::modules::patients::model::{
    CreatePatientDto, Patient, PatientFilterParams, UpdatePatientDto,
};
use crate::state::AppState;
use crate::validator::{ValidatedJson, parse_id};

pub(crate) const INVALID_PATIENT_ID: &str = "Invalid patient ID";

#[instrument(skip(state))]
pub async fn get_patients(
    State(state): State<AppState>,
    Query(filters): Query<PatientFilterParams>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let patients = bounded(state.patients.list(&filters))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to fetch patients"))?;

    Ok(Json(patients))
}

#[instrument(skip(state))]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, AppError> {
    let id = parse_id(&id, INVALID_PATIENT_ID)?;
    let patient = bounded(state.patients.get(id))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to fetch patient"))?;

    Ok(Json(patient))
}

#[instrument(skip(state))]
pub async fn create_patient(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreatePatientDto>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    let patient = bounded(state.patients.create(dto))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to create patient"))?;

    Ok((StatusCode::CREATED, Json(patient)))
}

#[instrument(skip(state))]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdatePatientDto>,
) -> Result<Json<Patient>, AppError> {
    let id = parse_id(&id, INVALID_PATIENT_ID)?;
    let patient = bounded(state.patients.update(id, dto))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to update patient"))?;

    Ok(Json(patient))
}

#[instrument(skip(state))]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, INVALID_PATIENT_ID)?;
    bounded(state.patients.delete(id))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to delete patient"))?;

    Ok(StatusCode::NO_CONTENT)
}
