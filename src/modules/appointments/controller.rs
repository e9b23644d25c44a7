use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{info, instrument};

use carebook_core::AppError;

use crate::db::bounded;
use crate::middleware::auth::Identity;
use crate::modules::appointments::model::{
    Appointment, CreateAppointmentDto, UpdateAppointmentDto, parse_visit_date,
};
use crate::modules::patients::controller::INVALID_PATIENT_ID;
use crate::state::AppState;
use crate::validator::{ValidatedJson, parse_id};

const INVALID_APPOINTMENT_ID: &str = "Invalid appointment ID";

#[instrument(skip(state))]
pub async fn get_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = bounded(state.appointments.list())
        .await
        .map_err(|e| e.into_app_error("Appointment", "Failed to fetch appointments"))?;

    Ok(Json(appointments))
}

#[instrument(skip(state))]
pub async fn get_appointments_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let date = parse_visit_date(&date)
        .ok_or_else(|| AppError::bad_request(anyhow!("Invalid date")))?;

    let appointments = bounded(state.appointments.list_by_date(date))
        .await
        .map_err(|e| e.into_app_error("Appointment", "Failed to fetch appointments"))?;

    Ok(Json(appointments))
}

#[instrument(skip(state))]
pub async fn get_patient_appointments(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let patient_id = parse_id(&patient_id, INVALID_PATIENT_ID)?;
    bounded(state.patients.get(patient_id))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to fetch patient"))?;

    let appointments = bounded(state.appointments.list_by_patient(patient_id))
        .await
        .map_err(|e| {
            e.into_app_error("Appointment", "Failed to fetch appointments for the patient")
        })?;

    Ok(Json(appointments))
}

#[instrument(skip(state))]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let id = parse_id(&id, INVALID_APPOINTMENT_ID)?;
    let appointment = bounded(state.appointments.get(id))
        .await
        .map_err(|e| e.into_app_error("Appointment", "Failed to fetch appointment"))?;

    Ok(Json(appointment))
}

/// Books a visit; the authenticated caller is recorded as its creator.
#[instrument(skip(state, identity), fields(user_id = identity.user_id()))]
pub async fn create_appointment(
    State(state): State<AppState>,
    identity: Identity,
    Path(patient_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateAppointmentDto>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let patient_id = parse_id(&patient_id, INVALID_PATIENT_ID)?;
    bounded(state.patients.get(patient_id))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to fetch patient"))?;

    // The only not-found from `create` is the patient foreign key, hit when
    // the patient is deleted after the lookup above.
    let appointment = bounded(state.appointments.create(identity.user_id(), patient_id, dto))
        .await
        .map_err(|e| e.into_app_error("Patient", "Failed to create appointment"))?;

    info!(
        appointment_id = appointment.id,
        patient_id,
        sequence = appointment.appointment_sequence,
        "appointment booked"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[instrument(skip(state))]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateAppointmentDto>,
) -> Result<Json<Appointment>, AppError> {
    let id = parse_id(&id, INVALID_APPOINTMENT_ID)?;
    let appointment = bounded(state.appointments.update(id, dto))
        .await
        .map_err(|e| e.into_app_error("Appointment", "Failed to update appointment"))?;

    Ok(Json(appointment))
}

#[instrument(skip(state))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, INVALID_APPOINTMENT_ID)?;
    bounded(state.appointments.delete(id))
        .await
        .map_err(|e| e.into_app_error("Appointment", "Failed to delete appointment"))?;

    Ok(StatusCode::NO_CONTENT)
}
