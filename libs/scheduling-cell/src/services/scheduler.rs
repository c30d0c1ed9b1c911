use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use directory_cell::services::directory::DirectoryService;
use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{
    Appointment, AppointmentListing, AppointmentStatus, CreateAppointmentRequest,
    SchedulingError, UpdateAppointmentRequest,
};
use crate::services::conflict::ConflictService;
use crate::services::lifecycle::AppointmentLifecycle;
use crate::services::query::AppointmentFilter;
use crate::services::slots::SlotGrid;
use crate::services::store::{AppointmentChanges, AppointmentStore, NewAppointment, PostgrestAppointmentStore};

/// Orchestrates appointment state transitions: referenced-entity validation,
/// conflict checking, and commits through the store adapter.
///
/// The conflict pre-check here is advisory. Two concurrent creates can both
/// pass it; the storage uniqueness constraint is the source of truth, and the
/// adapter surfaces its violation as the same `SlotTaken` error.
pub struct SchedulingService {
    store: Arc<dyn AppointmentStore>,
    conflict: ConflictService,
    directory: DirectoryService,
    grid: SlotGrid,
}

impl SchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        let store: Arc<dyn AppointmentStore> =
            Arc::new(PostgrestAppointmentStore::new(PostgrestClient::new(config)));
        let grid = SlotGrid::from_config(config);
        let conflict = ConflictService::new(Arc::clone(&store), grid.clone());
        let directory = DirectoryService::new(config);

        Self {
            store,
            conflict,
            directory,
            grid,
        }
    }

    pub async fn create(&self, request: CreateAppointmentRequest) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking appointment for patient {} with doctor {} on {} at {}",
            request.patient_id, request.doctor_id, request.date, request.time
        );

        if !self.grid.contains(request.time) {
            return Err(SchedulingError::InvalidSlot(format!(
                "{} is not a bookable time",
                request.time.format("%H:%M")
            )));
        }

        // Independent lookups, issued concurrently.
        let (doctor_found, patient_found) = tokio::try_join!(
            self.directory.doctor_exists(request.doctor_id),
            self.directory.patient_exists(request.patient_id),
        )
        .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        if !doctor_found {
            return Err(SchedulingError::DoctorNotFound);
        }
        if !patient_found {
            return Err(SchedulingError::PatientNotFound);
        }

        // Advisory fast path; the insert below is what actually decides.
        if !self
            .conflict
            .is_available(request.doctor_id, request.date, request.time, None)
            .await?
        {
            return Err(SchedulingError::SlotTaken);
        }

        let record = NewAppointment {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            date: request.date,
            time: request.time,
            status: request.status.unwrap_or(AppointmentStatus::Scheduled),
            notes: request.notes.unwrap_or_default(),
        };

        let appointment = self.store.insert(&record).await?;

        info!("Appointment {} booked successfully", appointment.appointment_id);
        Ok(appointment)
    }

    pub async fn update(
        &self,
        appointment_id: i64,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Updating appointment {}", appointment_id);

        if request.is_empty() {
            return Err(SchedulingError::ValidationError(
                "No fields provided to update".to_string(),
            ));
        }

        let current = self
            .store
            .find_by_id(appointment_id)
            .await?
            .ok_or(SchedulingError::NotFound)?;

        if let Some(new_status) = &request.status {
            AppointmentLifecycle::validate_status_transition(&current.status, new_status)?;
        }

        let target_date = request.date.unwrap_or(current.date);
        let target_time = request.time.unwrap_or(current.time);
        let slot_moved = target_date != current.date || target_time != current.time;

        if slot_moved {
            AppointmentLifecycle::validate_reschedule(&current.status)?;

            if !self.grid.contains(target_time) {
                return Err(SchedulingError::InvalidSlot(format!(
                    "{} is not a bookable time",
                    target_time.format("%H:%M")
                )));
            }

            // Re-check the target slot, ignoring the record's own booking.
            if !self
                .conflict
                .is_available(current.doctor_id, target_date, target_time, Some(appointment_id))
                .await?
            {
                return Err(SchedulingError::SlotTaken);
            }
        }

        let changes = AppointmentChanges {
            date: request.date,
            time: request.time,
            status: request.status,
            notes: request.notes,
        };

        let updated = self.store.update(appointment_id, &changes).await?;

        info!("Appointment {} updated successfully", appointment_id);
        Ok(updated)
    }

    /// Soft cancel: the record stays in the store with status `cancelled`,
    /// which frees its slot for rebooking.
    pub async fn cancel(&self, appointment_id: i64) -> Result<Appointment, SchedulingError> {
        debug!("Cancelling appointment {}", appointment_id);

        self.update(
            appointment_id,
            UpdateAppointmentRequest {
                date: None,
                time: None,
                status: Some(AppointmentStatus::Cancelled),
                notes: None,
            },
        )
        .await
    }

    /// Physical removal, the administrative counterpart to `cancel`.
    pub async fn purge(&self, appointment_id: i64) -> Result<(), SchedulingError> {
        debug!("Purging appointment {}", appointment_id);

        if !self.store.delete(appointment_id).await? {
            return Err(SchedulingError::NotFound);
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    pub async fn list(&self, filter: AppointmentFilter) -> Result<Vec<AppointmentListing>, SchedulingError> {
        self.store.search(&filter).await
    }

    pub async fn free_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        self.conflict.free_slots(doctor_id, date).await
    }
}
