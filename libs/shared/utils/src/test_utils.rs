use std::sync::Arc;

use chrono::NaiveTime;
use serde_json::json;

use shared_config::AppConfig;

pub struct TestConfig {
    pub database_url: String,
    pub database_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            database_url: "http://localhost:54321".to_string(),
            database_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Config pointing all storage traffic at a mock server.
    pub fn for_mock_server(uri: &str) -> Self {
        Self {
            database_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            database_api_key: self.database_api_key.clone(),
            clinic_day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            clinic_day_end: NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
            slot_interval_minutes: 30,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned rows in the shape the PostgREST API returns them.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn doctor_row(doctor_id: i64, first_name: &str, last_name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "first_name": first_name,
            "last_name": last_name,
            "specialty": specialty,
            "phone": "0851234567",
            "email": format!("{}.{}@clinic.example", first_name.to_lowercase(), last_name.to_lowercase())
        })
    }

    pub fn patient_row(patient_id: i64, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "patient_id": patient_id,
            "first_name": first_name,
            "last_name": last_name
        })
    }

    pub fn appointment_row(
        appointment_id: i64,
        patient_id: i64,
        doctor_id: i64,
        date: &str,
        time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "appointment_date": date,
            "appointment_time": time,
            "status": status,
            "notes": ""
        })
    }

    pub fn joined_appointment_row(
        appointment_id: i64,
        patient_id: i64,
        doctor_id: i64,
        date: &str,
        time: &str,
        status: &str,
        patient_name: (&str, &str),
        doctor_name: (&str, &str),
    ) -> serde_json::Value {
        json!({
            "appointment_id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "appointment_date": date,
            "appointment_time": time,
            "status": status,
            "patients": { "first_name": patient_name.0, "last_name": patient_name.1 },
            "doctors": { "first_name": doctor_name.0, "last_name": doctor_name.1 }
        })
    }

    pub fn booked_time_row(time: &str) -> serde_json::Value {
        json!({ "appointment_time": time })
    }
}
