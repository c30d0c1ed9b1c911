use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{Doctor, DirectoryError, Patient};

/// Read-only directory of doctors and patients. The scheduler consumes the
/// existence checks; the listing endpoints serve the booking UI.
pub struct DirectoryService {
    db: PostgrestClient,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DirectoryError> {
        debug!("Fetching doctor directory");

        let path = "/rest/v1/doctors?select=doctor_id,first_name,last_name,specialty,phone,email&order=first_name.asc";
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| DirectoryError::DatabaseError(e.to_string()))?;

        let doctors: Vec<Doctor> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()
            .map_err(|e| DirectoryError::DatabaseError(format!("Failed to parse doctors: {}", e)))?;

        Ok(doctors)
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, DirectoryError> {
        debug!("Fetching patient directory");

        let path = "/rest/v1/patients?select=patient_id,first_name,last_name&order=first_name.asc";
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| DirectoryError::DatabaseError(e.to_string()))?;

        let patients: Vec<Patient> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Patient>, _>>()
            .map_err(|e| DirectoryError::DatabaseError(format!("Failed to parse patients: {}", e)))?;

        Ok(patients)
    }

    pub async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, DirectoryError> {
        debug!("Checking doctor existence: {}", doctor_id);

        let path = format!("/rest/v1/doctors?doctor_id=eq.{}&select=doctor_id&limit=1", doctor_id);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DirectoryError::DatabaseError(e.to_string()))?;

        Ok(!result.is_empty())
    }

    pub async fn patient_exists(&self, patient_id: i64) -> Result<bool, DirectoryError> {
        debug!("Checking patient existence: {}", patient_id);

        let path = format!("/rest/v1/patients?patient_id=eq.{}&select=patient_id&limit=1", patient_id);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| DirectoryError::DatabaseError(e.to_string()))?;

        Ok(!result.is_empty())
    }
}
