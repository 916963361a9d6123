//! Weekly business-hours lookup
//!
//! A store's schedule is indexed by weekday so matching a poll only scans the
//! few intervals of that day. The index has no behavior beyond matching.
//!
//! An empty schedule is a valid schedule: the store is closed all week and no
//! poll ever matches.

use chrono::{Datelike, TimeZone};

use crate::constants::WEEKDAYS;
use crate::model::{weekday_index, BusinessHourInterval};

/// Per-store map from weekday to open intervals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessHoursIndex {
    days: [Vec<BusinessHourInterval>; WEEKDAYS],
}

impl BusinessHoursIndex {
    /// Build the index from a store's schedule rows
    ///
    /// Rows with a weekday outside 0..=6 or an end before their start can
    /// never match and are skipped with a warning.
    pub fn new(store_id: &str, intervals: &[BusinessHourInterval]) -> Self {
        let mut days: [Vec<BusinessHourInterval>; WEEKDAYS] = Default::default();

        for interval in intervals {
            let day = interval.day_of_week as usize;
            if day >= WEEKDAYS {
                log::warn!(
                    "Store {}: ignoring business hours with day_of_week {}",
                    store_id, interval.day_of_week
                );
                continue;
            }
            if interval.is_inverted() {
                log::warn!(
                    "Store {}: ignoring inverted business hours {}-{} on day {}",
                    store_id, interval.start_time_local, interval.end_time_local, day
                );
                continue;
            }
            days[day].push(*interval);
        }

        for day in days.iter_mut() {
            day.sort_by_key(|interval| interval.start_time_local);
        }

        Self { days }
    }

    /// True when the store has no usable open interval at all
    pub fn is_always_closed(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// Intervals scheduled for a weekday (Monday = 0)
    pub fn intervals_for(&self, day_of_week: u8) -> &[BusinessHourInterval] {
        self.days
            .get(day_of_week as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find the interval containing a local timestamp, if any
    ///
    /// Both interval ends are inclusive.
    pub fn matching<Tz: TimeZone>(
        &self,
        local: &chrono::DateTime<Tz>,
    ) -> Option<&BusinessHourInterval> {
        let day = weekday_index(local.weekday());
        let time = local.time();
        self.intervals_for(day)
            .iter()
            .find(|interval| interval.contains(time))
    }
}
