use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    empty_string_as_none, AppointmentListing, AppointmentStatus, CreateAppointmentRequest,
    SchedulingError, UpdateAppointmentRequest,
};
use crate::services::query::AppointmentFilter;
use crate::services::scheduler::SchedulingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AppointmentQueryParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub doctor_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct FreeSlotsQuery {
    pub date: NaiveDate,
}

fn map_scheduling_error(e: SchedulingError) -> AppError {
    match e {
        SchedulingError::NotFound
        | SchedulingError::DoctorNotFound
        | SchedulingError::PatientNotFound => AppError::NotFound(e.to_string()),
        SchedulingError::SlotTaken => AppError::Conflict(e.to_string()),
        SchedulingError::InvalidSlot(msg) => AppError::BadRequest(msg),
        SchedulingError::InvalidStatusTransition(_) => AppError::BadRequest(e.to_string()),
        SchedulingError::ValidationError(msg) => AppError::ValidationError(msg),
        SchedulingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let scheduler = SchedulingService::new(&state);

    scheduler.create(request).await.map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment added successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AppointmentQueryParams>,
) -> Result<Json<Vec<AppointmentListing>>, AppError> {
    let scheduler = SchedulingService::new(&state);

    let filter = AppointmentFilter {
        doctor_id: params.doctor_id,
        patient_id: params.patient_id,
        date: params.date,
        status: params.status,
    };

    let appointments = scheduler.list(filter).await.map_err(map_scheduling_error)?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let scheduler = SchedulingService::new(&state);

    scheduler
        .update(appointment_id, request)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment updated"
    })))
}

/// Cancels rather than deletes: the row survives with status `cancelled` and
/// the slot becomes bookable again.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let scheduler = SchedulingService::new(&state);

    scheduler.cancel(appointment_id).await.map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled"
    })))
}

/// Administrative hard delete of an appointment row.
#[axum::debug_handler]
pub async fn purge_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let scheduler = SchedulingService::new(&state);

    scheduler.purge(appointment_id).await.map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted"
    })))
}

#[axum::debug_handler]
pub async fn get_free_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    Query(params): Query<FreeSlotsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let scheduler = SchedulingService::new(&state);

    let slots = scheduler
        .free_slots(doctor_id, params.date)
        .await
        .map_err(map_scheduling_error)?;

    let slots = slots
        .into_iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();

    Ok(Json(slots))
}
