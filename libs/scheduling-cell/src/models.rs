use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// One booked consultation. `(doctor_id, appointment_date, appointment_time)`
/// is unique among non-cancelled appointments; the store enforces it with a
/// partial unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// An active appointment occupies its slot. Completed and no-show visits
    /// keep their historical slot; only cancellation frees it.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// Terminal statuses admit no further transitions or reschedules.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no_show" => Ok(AppointmentStatus::NoShow),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "time_hm_opt")]
    pub time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.status.is_none() && self.notes.is_none()
    }
}

/// One row of the appointment listing, joined with display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListing {
    pub appointment_id: i64,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub patient: String,
    pub doctor: String,
    pub patient_id: i64,
    pub doctor_id: i64,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    // Stable user-facing message regardless of whether the pre-check or the
    // storage constraint detected the conflict.
    #[error("This time slot is already booked.")]
    SlotTaken,

    #[error("Invalid time slot: {0}")]
    InvalidSlot(String),

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

// ==============================================================================
// SERDE HELPERS
// ==============================================================================

/// Public wire format for times-of-day: "HH:MM".
pub mod time_hm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}

pub mod time_hm_opt {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Query-string values arrive as strings; an empty value means "not provided",
/// anything else must parse. Malformed filters are a validation error rather
/// than being silently dropped.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_snake_case() {
        let parsed: AppointmentStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::NoShow);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"no_show\"");
        assert_eq!(parsed.to_string(), "no_show");
        assert_eq!("no_show".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::NoShow);
    }

    #[test]
    fn only_cancelled_frees_the_slot() {
        assert!(AppointmentStatus::Scheduled.is_active());
        assert!(AppointmentStatus::Completed.is_active());
        assert!(AppointmentStatus::NoShow.is_active());
        assert!(!AppointmentStatus::Cancelled.is_active());
    }

    #[test]
    fn create_request_parses_half_hour_times() {
        let request: CreateAppointmentRequest = serde_json::from_value(serde_json::json!({
            "patient_id": 3,
            "doctor_id": 7,
            "date": "2024-05-01",
            "time": "09:30",
            "notes": "first visit"
        }))
        .unwrap();

        assert_eq!(request.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(request.status, None);
    }

    #[test]
    fn create_request_rejects_malformed_time() {
        let result: Result<CreateAppointmentRequest, _> = serde_json::from_value(serde_json::json!({
            "patient_id": 3,
            "doctor_id": 7,
            "date": "2024-05-01",
            "time": "quarter past nine"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn update_request_tracks_presence_per_field() {
        let request: UpdateAppointmentRequest =
            serde_json::from_value(serde_json::json!({ "status": "completed" })).unwrap();

        assert!(request.date.is_none());
        assert!(request.time.is_none());
        assert_eq!(request.status, Some(AppointmentStatus::Completed));
        assert!(!request.is_empty());
    }
}
