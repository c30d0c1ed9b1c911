use std::sync::Arc;

use axum::{extract::State, Json};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{Doctor, Patient};
use crate::services::directory::DirectoryService;

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppConfig>>) -> Result<Json<Vec<Doctor>>, AppError> {
    let directory = DirectoryService::new(&state);

    let doctors = directory
        .list_doctors()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn list_patients(State(state): State<Arc<AppConfig>>) -> Result<Json<Vec<Patient>>, AppError> {
    let directory = DirectoryService::new(&state);

    let patients = directory
        .list_patients()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(patients))
}
