//! Data model shared by the engine and the report layer
//!
//! Inputs are immutable records:
//! - [`PollRecord`]: one observed status sample, UTC timestamp
//! - [`BusinessHourInterval`]: one weekly open interval in store-local time
//! - [`StoreInput`]: everything the engine needs for one store

use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Observed store status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Store was serving orders
    Active,
    /// Store was not reachable or not serving
    Inactive,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}

/// Single status poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollRecord {
    /// Store the poll belongs to
    pub store_id: String,
    /// Observation instant (UTC)
    pub timestamp: Timestamp,
    /// Observed status
    pub status: Status,
}

impl PollRecord {
    /// Construct from parts
    pub fn new(store_id: impl Into<String>, timestamp: Timestamp, status: Status) -> Self {
        Self {
            store_id: store_id.into(),
            timestamp,
            status,
        }
    }
}

/// Weekly open interval in store-local wall-clock time
///
/// `day_of_week` counts from Monday = 0 to Sunday = 6. Both ends are
/// inclusive: a poll at exactly `start_time_local` or `end_time_local` is
/// inside the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessHourInterval {
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u8,
    /// Opening time, store-local
    pub start_time_local: NaiveTime,
    /// Closing time, store-local
    pub end_time_local: NaiveTime,
}

impl BusinessHourInterval {
    /// Construct from parts
    pub fn new(day_of_week: u8, start_time_local: NaiveTime, end_time_local: NaiveTime) -> Self {
        Self {
            day_of_week,
            start_time_local,
            end_time_local,
        }
    }

    /// Check whether a local time of day falls inside the interval
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start_time_local <= time && time <= self.end_time_local
    }

    /// Intervals that end before they start never match anything
    pub fn is_inverted(&self) -> bool {
        self.end_time_local < self.start_time_local
    }
}

/// Weekday index used by schedules (Monday = 0)
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

/// Everything needed to estimate one store's uptime
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreInput {
    /// Store identifier
    pub store_id: String,
    /// IANA timezone identifier; `None` selects the configured default
    #[serde(default)]
    pub timezone: Option<String>,
    /// Polls in any order
    #[serde(default)]
    pub polls: Vec<PollRecord>,
    /// Weekly schedule; empty means closed all week
    #[serde(default)]
    pub business_hours: Vec<BusinessHourInterval>,
}

impl StoreInput {
    /// Store with no timezone, polls or hours
    pub fn new(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            ..Self::default()
        }
    }

    /// Set `timezone`
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Set `polls`
    pub fn with_polls(mut self, polls: Vec<PollRecord>) -> Self {
        self.polls = polls;
        self
    }

    /// Set `business_hours`
    pub fn with_business_hours(mut self, hours: Vec<BusinessHourInterval>) -> Self {
        self.business_hours = hours;
        self
    }
}
