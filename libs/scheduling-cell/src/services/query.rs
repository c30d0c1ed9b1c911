use chrono::NaiveDate;

use crate::models::AppointmentStatus;

/// Conjunctive filter over the appointment listing. Absent fields are omitted
/// from the predicate entirely; they never mean "match nothing".
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

/// Listings are newest-first: date descending, then time descending.
pub const LISTING_ORDER: &str = "appointment_date.desc,appointment_time.desc";

impl AppointmentFilter {
    pub fn to_query_params(&self) -> Vec<String> {
        let mut params = Vec::new();

        if let Some(doctor_id) = self.doctor_id {
            params.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = self.patient_id {
            params.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(date) = self.date {
            params.push(format!("appointment_date=eq.{}", date));
        }
        if let Some(status) = self.status {
            params.push(format!("status=eq.{}", status));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_produces_no_predicate() {
        assert!(AppointmentFilter::default().to_query_params().is_empty());
    }

    #[test]
    fn filters_compose_conjunctively() {
        let filter = AppointmentFilter {
            doctor_id: Some(7),
            patient_id: Some(3),
            date: Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            status: Some(AppointmentStatus::Scheduled),
        };

        assert_eq!(
            filter.to_query_params(),
            vec![
                "doctor_id=eq.7",
                "patient_id=eq.3",
                "appointment_date=eq.2024-05-01",
                "status=eq.scheduled",
            ]
        );
    }

    #[test]
    fn absent_filters_are_omitted_not_matched_against() {
        let filter = AppointmentFilter {
            doctor_id: Some(7),
            ..Default::default()
        };

        assert_eq!(filter.to_query_params(), vec!["doctor_id=eq.7"]);
    }
}
