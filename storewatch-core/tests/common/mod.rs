//! Common test fixtures for engine integration tests
//!
//! Provides a store builder that takes polls in store-local wall-clock time,
//! so scenarios read the way a store manager would describe them.

#![allow(dead_code)]

use chrono::{NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use storewatch_core::{
    BusinessHourInterval, PollRecord, Status, StoreInput, Timestamp,
};

/// Parse "HH:MM"
pub fn time(hm: &str) -> NaiveTime {
    NaiveTime::parse_from_str(hm, "%H:%M").expect("valid HH:MM")
}

/// Parse "YYYY-MM-DD HH:MM" as a naive local datetime
pub fn local(datetime: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M").expect("valid local datetime")
}

/// Parse "YYYY-MM-DD HH:MM" as UTC
pub fn utc(datetime: &str) -> Timestamp {
    Utc.from_utc_datetime(&local(datetime))
}

/// Convert a local wall-clock time in `tz` to UTC
pub fn at(tz: Tz, datetime: &str) -> Timestamp {
    tz.from_local_datetime(&local(datetime))
        .earliest()
        .expect("local time exists")
        .with_timezone(&Utc)
}

/// Fluent builder for one store's input
pub struct StoreBuilder {
    store_id: String,
    tz: Tz,
    timezone: Option<String>,
    hours: Vec<BusinessHourInterval>,
    polls: Vec<PollRecord>,
}

impl StoreBuilder {
    /// Store on an explicit timezone
    pub fn new(store_id: &str, tz: Tz) -> Self {
        Self {
            store_id: store_id.to_string(),
            tz,
            timezone: Some(tz.name().to_string()),
            hours: Vec::new(),
            polls: Vec::new(),
        }
    }

    /// Store without a recorded timezone; polls are still written in `assumed`
    pub fn without_timezone(store_id: &str, assumed: Tz) -> Self {
        Self {
            timezone: None,
            ..Self::new(store_id, assumed)
        }
    }

    /// Open interval on a weekday (Monday = 0)
    pub fn open(mut self, day_of_week: u8, start: &str, end: &str) -> Self {
        self.hours
            .push(BusinessHourInterval::new(day_of_week, time(start), time(end)));
        self
    }

    /// Open all week with the same hours
    pub fn open_daily(mut self, start: &str, end: &str) -> Self {
        for day in 0..7 {
            self = self.open(day, start, end);
        }
        self
    }

    /// Poll at a local wall-clock time
    pub fn poll(mut self, local_datetime: &str, status: Status) -> Self {
        let timestamp = at(self.tz, local_datetime);
        self.polls
            .push(PollRecord::new(self.store_id.clone(), timestamp, status));
        self
    }

    /// Poll at a UTC instant
    pub fn poll_utc(mut self, timestamp: Timestamp, status: Status) -> Self {
        self.polls
            .push(PollRecord::new(self.store_id.clone(), timestamp, status));
        self
    }

    pub fn build(self) -> StoreInput {
        StoreInput {
            store_id: self.store_id,
            timezone: self.timezone,
            polls: self.polls,
            business_hours: self.hours,
        }
    }
}
