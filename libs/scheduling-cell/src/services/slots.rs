use chrono::{Duration, NaiveTime};
use tracing::warn;

use shared_config::AppConfig;

/// The fixed set of bookable time points in one working day, ordered
/// ascending and inclusive of both endpoints. Built from configuration so a
/// practice can change its hours without touching scheduling logic.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    slots: Vec<NaiveTime>,
}

impl SlotGrid {
    pub fn new(day_start: NaiveTime, day_end: NaiveTime, interval_minutes: u32) -> Self {
        if interval_minutes == 0 || day_start > day_end {
            warn!(
                "Degenerate slot grid configuration ({} - {}, {} min), no bookable slots",
                day_start, day_end, interval_minutes
            );
            return Self { slots: Vec::new() };
        }

        let step = Duration::minutes(interval_minutes as i64);
        let mut slots = Vec::new();
        let mut current = day_start;

        while current <= day_end {
            slots.push(current);
            // NaiveTime arithmetic wraps at midnight; stop instead of looping.
            let next = current + step;
            if next <= current {
                break;
            }
            current = next;
        }

        Self { slots }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.clinic_day_start,
            config.clinic_day_end,
            config.slot_interval_minutes,
        )
    }

    pub fn all_slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.slots.binary_search(&time).is_ok()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn reference_grid_has_sixteen_half_hour_slots() {
        let grid = SlotGrid::new(t(9, 0), t(16, 30), 30);

        assert_eq!(grid.len(), 16);
        assert_eq!(grid.all_slots().first(), Some(&t(9, 0)));
        assert_eq!(grid.all_slots().last(), Some(&t(16, 30)));
        assert!(grid.all_slots().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn contains_matches_only_grid_points() {
        let grid = SlotGrid::new(t(9, 0), t(16, 30), 30);

        assert!(grid.contains(t(10, 30)));
        assert!(!grid.contains(t(10, 15)));
        assert!(!grid.contains(t(17, 0)));
    }

    #[test]
    fn interval_is_configurable() {
        let grid = SlotGrid::new(t(8, 0), t(10, 0), 60);

        assert_eq!(grid.all_slots(), &[t(8, 0), t(9, 0), t(10, 0)]);
    }

    #[test]
    fn degenerate_configuration_yields_empty_grid() {
        assert!(SlotGrid::new(t(16, 30), t(9, 0), 30).is_empty());
        assert!(SlotGrid::new(t(9, 0), t(16, 30), 0).is_empty());
    }

    #[test]
    fn full_day_grid_stops_at_the_midnight_wrap() {
        let grid = SlotGrid::new(t(0, 0), t(23, 30), 30);

        assert_eq!(grid.len(), 48);
        assert_eq!(grid.all_slots().first(), Some(&t(0, 0)));
        assert_eq!(grid.all_slots().last(), Some(&t(23, 30)));
    }

    #[test]
    fn late_evening_grid_stops_at_the_midnight_wrap() {
        let grid = SlotGrid::new(t(22, 0), t(23, 30), 45);

        assert_eq!(grid.all_slots(), &[t(22, 0), t(22, 45), t(23, 30)]);
    }

    #[test]
    fn single_point_day_yields_one_slot() {
        let grid = SlotGrid::new(t(12, 0), t(12, 0), 30);

        assert_eq!(grid.all_slots(), &[t(12, 0)]);
    }
}
