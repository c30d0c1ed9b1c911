use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::models::SchedulingError;
use crate::services::slots::SlotGrid;
use crate::services::store::AppointmentStore;

/// Answers "is this slot free" questions against the appointment store. Only
/// non-cancelled appointments occupy a slot; the store query carries that
/// filter, so cancelled bookings reappear as free automatically.
pub struct ConflictService {
    store: Arc<dyn AppointmentStore>,
    grid: SlotGrid,
}

impl ConflictService {
    pub fn new(store: Arc<dyn AppointmentStore>, grid: SlotGrid) -> Self {
        Self { store, grid }
    }

    /// True iff no active appointment holds (doctor, date, time). `exclude`
    /// lets an update ignore the record's own current slot.
    pub async fn is_available(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<i64>,
    ) -> Result<bool, SchedulingError> {
        debug!("Checking availability for doctor {} on {} at {}", doctor_id, date, time);

        let booked = self.store.active_times(doctor_id, date, exclude).await?;
        let available = !booked.contains(&time);

        if !available {
            warn!("Conflict detected for doctor {} on {} at {}", doctor_id, date, time);
        }

        Ok(available)
    }

    /// Grid minus the active times for that doctor/date, in grid order. One
    /// store query per call; always a subset of the grid.
    pub async fn free_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        debug!("Computing free slots for doctor {} on {}", doctor_id, date);

        let booked = self.store.active_times(doctor_id, date, None).await?;

        let free = self
            .grid
            .all_slots()
            .iter()
            .copied()
            .filter(|slot| !booked.contains(slot))
            .collect();

        Ok(free)
    }
}
