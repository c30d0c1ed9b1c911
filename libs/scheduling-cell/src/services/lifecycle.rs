use tracing::{debug, warn};

use crate::models::{AppointmentStatus, SchedulingError};

/// Status transition rules for the appointment state machine. A scheduled
/// appointment may complete, cancel, no-show, or stay scheduled while being
/// rescheduled; terminal statuses admit nothing further.
pub struct AppointmentLifecycle;

impl AppointmentLifecycle {
    pub fn valid_transitions(current: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Scheduled,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
            AppointmentStatus::NoShow => vec![],
        }
    }

    pub fn validate_status_transition(
        current: &AppointmentStatus,
        new: &AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        debug!("Validating status transition {} -> {}", current, new);

        // Restating the current status is a no-op, not a transition.
        if current == new {
            return Ok(());
        }

        if !Self::valid_transitions(current).contains(new) {
            warn!("Invalid status transition attempted: {} -> {}", current, new);
            return Err(SchedulingError::InvalidStatusTransition(*current));
        }

        Ok(())
    }

    /// Only a scheduled appointment may be moved to a new date or time.
    pub fn validate_reschedule(current: &AppointmentStatus) -> Result<(), SchedulingError> {
        if current.is_terminal() {
            warn!("Reschedule attempted on terminal appointment status {}", current);
            return Err(SchedulingError::InvalidStatusTransition(*current));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn scheduled_may_complete_cancel_or_no_show() {
        for target in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            assert!(AppointmentLifecycle::validate_status_transition(
                &AppointmentStatus::Scheduled,
                &target
            )
            .is_ok());
        }
    }

    #[test]
    fn terminal_statuses_reject_transitions() {
        for terminal in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            assert_matches!(
                AppointmentLifecycle::validate_status_transition(&terminal, &AppointmentStatus::Scheduled),
                Err(SchedulingError::InvalidStatusTransition(_))
            );
        }
    }

    #[test]
    fn restating_current_status_is_allowed() {
        assert!(AppointmentLifecycle::validate_status_transition(
            &AppointmentStatus::Completed,
            &AppointmentStatus::Completed
        )
        .is_ok());
    }

    #[test]
    fn only_scheduled_appointments_can_be_rescheduled() {
        assert!(AppointmentLifecycle::validate_reschedule(&AppointmentStatus::Scheduled).is_ok());
        assert_matches!(
            AppointmentLifecycle::validate_reschedule(&AppointmentStatus::Cancelled),
            Err(SchedulingError::InvalidStatusTransition(AppointmentStatus::Cancelled))
        );
    }
}
