use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::{DbError, PostgrestClient};

use crate::models::{Appointment, AppointmentListing, AppointmentStatus, SchedulingError};
use crate::services::query::{AppointmentFilter, LISTING_ORDER};

/// A not-yet-persisted appointment; the store assigns the identity.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: String,
}

/// Partial column updates for an existing appointment.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

/// Persistence seam the scheduler depends on. Backed by the relational
/// `appointments` table; swapped for a mock server in tests.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, record: &NewAppointment) -> Result<Appointment, SchedulingError>;

    async fn update(&self, appointment_id: i64, changes: &AppointmentChanges)
        -> Result<Appointment, SchedulingError>;

    /// Physical removal. Returns false when no row matched.
    async fn delete(&self, appointment_id: i64) -> Result<bool, SchedulingError>;

    async fn find_by_id(&self, appointment_id: i64) -> Result<Option<Appointment>, SchedulingError>;

    /// Times of all active (non-cancelled) appointments for a doctor on a
    /// date, ascending. `exclude` omits one appointment so an update does not
    /// conflict with the record's own prior slot.
    async fn active_times(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        exclude: Option<i64>,
    ) -> Result<Vec<NaiveTime>, SchedulingError>;

    async fn search(&self, filter: &AppointmentFilter)
        -> Result<Vec<AppointmentListing>, SchedulingError>;
}

// ==============================================================================
// STORAGE ROW SHAPES
//
// The relational rows use the table's column names and "HH:MM:SS" times.
// They are converted to the public model here, and only here.
// ==============================================================================

#[derive(Debug, Deserialize)]
struct AppointmentRow {
    appointment_id: i64,
    patient_id: i64,
    doctor_id: i64,
    appointment_date: NaiveDate,
    #[serde(with = "time_hms")]
    appointment_time: NaiveTime,
    status: AppointmentStatus,
    #[serde(default)]
    notes: String,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Appointment {
            appointment_id: row.appointment_id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            date: row.appointment_date,
            time: row.appointment_time,
            status: row.status,
            notes: row.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonNameRow {
    first_name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct JoinedAppointmentRow {
    appointment_id: i64,
    patient_id: i64,
    doctor_id: i64,
    appointment_date: NaiveDate,
    #[serde(with = "time_hms")]
    appointment_time: NaiveTime,
    status: AppointmentStatus,
    patients: PersonNameRow,
    doctors: PersonNameRow,
}

impl From<JoinedAppointmentRow> for AppointmentListing {
    fn from(row: JoinedAppointmentRow) -> Self {
        AppointmentListing {
            appointment_id: row.appointment_id,
            date: row.appointment_date,
            time: row.appointment_time,
            status: row.status,
            patient: format!("{} {}", row.patients.first_name, row.patients.last_name),
            doctor: format!("{} {}", row.doctors.first_name, row.doctors.last_name),
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimeRow {
    #[serde(with = "time_hms")]
    appointment_time: NaiveTime,
}

/// Storage time columns come back as "HH:MM:SS"; accept "HH:MM" too.
mod time_hms {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(serde::de::Error::custom)
    }
}

const LISTING_SELECT: &str = "select=appointment_id,patient_id,doctor_id,appointment_date,appointment_time,status,patients(first_name,last_name),doctors(first_name,last_name)";

// ==============================================================================
// POSTGREST-BACKED IMPLEMENTATION
// ==============================================================================

pub struct PostgrestAppointmentStore {
    db: PostgrestClient,
}

impl PostgrestAppointmentStore {
    pub fn new(db: PostgrestClient) -> Self {
        Self { db }
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );
        headers
    }

    fn map_db_error(e: DbError) -> SchedulingError {
        match e {
            // The partial unique index on (doctor_id, appointment_date,
            // appointment_time) rejected the row: authoritative conflict.
            DbError::Conflict(_) => SchedulingError::SlotTaken,
            other => SchedulingError::DatabaseError(other.to_string()),
        }
    }

    fn parse_rows<R, T>(rows: Vec<Value>) -> Result<Vec<T>, SchedulingError>
    where
        R: serde::de::DeserializeOwned + Into<T>,
    {
        rows.into_iter()
            .map(|row| serde_json::from_value::<R>(row).map(Into::into))
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| SchedulingError::DatabaseError(format!("Failed to parse appointments: {}", e)))
    }
}

#[async_trait]
impl AppointmentStore for PostgrestAppointmentStore {
    async fn insert(&self, record: &NewAppointment) -> Result<Appointment, SchedulingError> {
        debug!(
            "Inserting appointment for doctor {} on {} at {}",
            record.doctor_id, record.date, record.time
        );

        let body = json!({
            "patient_id": record.patient_id,
            "doctor_id": record.doctor_id,
            "appointment_date": record.date.format("%Y-%m-%d").to_string(),
            "appointment_time": record.time.format("%H:%M:%S").to_string(),
            "status": record.status.to_string(),
            "notes": record.notes,
        });

        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(body),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(Self::map_db_error)?;

        let mut appointments: Vec<Appointment> = Self::parse_rows::<AppointmentRow, _>(result)?;
        appointments
            .pop()
            .ok_or_else(|| SchedulingError::DatabaseError("Insert returned no row".to_string()))
    }

    async fn update(
        &self,
        appointment_id: i64,
        changes: &AppointmentChanges,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Updating appointment {}", appointment_id);

        let mut body = serde_json::Map::new();
        if let Some(date) = changes.date {
            body.insert("appointment_date".to_string(), json!(date.format("%Y-%m-%d").to_string()));
        }
        if let Some(time) = changes.time {
            body.insert("appointment_time".to_string(), json!(time.format("%H:%M:%S").to_string()));
        }
        if let Some(status) = changes.status {
            body.insert("status".to_string(), json!(status.to_string()));
        }
        if let Some(notes) = &changes.notes {
            body.insert("notes".to_string(), json!(notes));
        }

        let path = format!("/rest/v1/appointments?appointment_id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(body)),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(Self::map_db_error)?;

        let mut appointments: Vec<Appointment> = Self::parse_rows::<AppointmentRow, _>(result)?;
        appointments.pop().ok_or(SchedulingError::NotFound)
    }

    async fn delete(&self, appointment_id: i64) -> Result<bool, SchedulingError> {
        debug!("Deleting appointment {}", appointment_id);

        let path = format!("/rest/v1/appointments?appointment_id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .db
            .request_with_headers(
                Method::DELETE,
                &path,
                None,
                Some(Self::representation_headers()),
            )
            .await
            .map_err(Self::map_db_error)?;

        Ok(!result.is_empty())
    }

    async fn find_by_id(&self, appointment_id: i64) -> Result<Option<Appointment>, SchedulingError> {
        debug!("Fetching appointment {}", appointment_id);

        let path = format!("/rest/v1/appointments?appointment_id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(Self::map_db_error)?;

        let mut appointments: Vec<Appointment> = Self::parse_rows::<AppointmentRow, _>(result)?;
        Ok(appointments.pop())
    }

    async fn active_times(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        exclude: Option<i64>,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        let mut path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_date=eq.{}&status=neq.cancelled&select=appointment_time&order=appointment_time.asc",
            doctor_id, date
        );
        if let Some(exclude_id) = exclude {
            path.push_str(&format!("&appointment_id=neq.{}", exclude_id));
        }

        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(Self::map_db_error)?;

        let times: Vec<TimeRow> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<TimeRow>, _>>()
            .map_err(|e| SchedulingError::DatabaseError(format!("Failed to parse booked times: {}", e)))?;

        Ok(times.into_iter().map(|row| row.appointment_time).collect())
    }

    async fn search(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentListing>, SchedulingError> {
        debug!("Searching appointments with filters: {:?}", filter);

        let mut query_parts = filter.to_query_params();
        query_parts.push(LISTING_SELECT.to_string());
        query_parts.push(format!("order={}", LISTING_ORDER));

        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(Self::map_db_error)?;

        Self::parse_rows::<JoinedAppointmentRow, _>(result)
    }
}
