//! Shared fixtures for report integration tests
//!
//! Stores are described in UTC on Monday 2023-01-23 unless a test says
//! otherwise. The wrapping sources inject faults around a `MemorySource`.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime, TimeZone, Utc};
use storewatch_core::{BusinessHourInterval, PollRecord, Status, StoreInput, Timestamp};
use storewatch_report::{MemorySource, SourceError, StoreDataSource};

/// Parse "HH:MM" on Monday 2023-01-23 as UTC
pub fn monday(hm: &str) -> Timestamp {
    utc(&format!("2023-01-23 {hm}"))
}

/// Parse "YYYY-MM-DD HH:MM" as UTC
pub fn utc(datetime: &str) -> Timestamp {
    let naive = NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M").expect("valid datetime");
    Utc.from_utc_datetime(&naive)
}

pub fn hours(day_of_week: u8, start: &str, end: &str) -> BusinessHourInterval {
    BusinessHourInterval::new(
        day_of_week,
        NaiveTime::parse_from_str(start, "%H:%M").expect("valid start"),
        NaiveTime::parse_from_str(end, "%H:%M").expect("valid end"),
    )
}

pub fn store(
    store_id: &str,
    timezone: Option<&str>,
    schedule: Vec<BusinessHourInterval>,
    polls: &[(Timestamp, Status)],
) -> StoreInput {
    StoreInput {
        store_id: store_id.to_string(),
        timezone: timezone.map(str::to_string),
        polls: polls
            .iter()
            .map(|(timestamp, status)| PollRecord::new(store_id, *timestamp, *status))
            .collect(),
        business_hours: schedule,
    }
}

/// Source that fails, panics or counts concurrency on demand
#[derive(Default)]
pub struct FaultySource {
    pub inner: MemorySource,
    pub fail_list: bool,
    pub fail_fetch: HashSet<String>,
    pub panic_on: HashSet<String>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FaultySource {
    pub fn new(inputs: Vec<StoreInput>) -> Self {
        Self {
            inner: MemorySource::from_inputs(inputs),
            ..Self::default()
        }
    }

    pub fn failing_fetch(mut self, store_id: &str) -> Self {
        self.fail_fetch.insert(store_id.to_string());
        self
    }

    pub fn panicking_on(mut self, store_id: &str) -> Self {
        self.panic_on.insert(store_id.to_string());
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }
}

#[async_trait]
impl StoreDataSource for FaultySource {
    async fn list_stores(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<String>, SourceError> {
        if self.fail_list {
            return Err(SourceError::Unavailable("store table offline".into()));
        }
        self.inner.list_stores(from, to).await
    }

    async fn load_timezone(&self, store_id: &str) -> Result<Option<String>, SourceError> {
        self.inner.load_timezone(store_id).await
    }

    async fn load_polls(
        &self,
        store_id: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<PollRecord>, SourceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.contains(store_id) {
            panic!("poll table corrupted for {store_id}");
        }
        if self.fail_fetch.contains(store_id) {
            return Err(SourceError::Unavailable(format!("timeout reading {store_id}")));
        }
        self.inner.load_polls(store_id, from, to).await
    }

    async fn load_business_hours(
        &self,
        store_id: &str,
    ) -> Result<Vec<BusinessHourInterval>, SourceError> {
        self.inner.load_business_hours(store_id).await
    }
}

/// Source that ignores the requested range and returns every poll
pub struct UnboundedSource {
    pub inputs: Vec<StoreInput>,
}

#[async_trait]
impl StoreDataSource for UnboundedSource {
    async fn list_stores(&self, _: Timestamp, _: Timestamp) -> Result<Vec<String>, SourceError> {
        Ok(self.inputs.iter().map(|input| input.store_id.clone()).collect())
    }

    async fn load_timezone(&self, store_id: &str) -> Result<Option<String>, SourceError> {
        Ok(self.find(store_id)?.timezone.clone())
    }

    async fn load_polls(
        &self,
        store_id: &str,
        _: Timestamp,
        _: Timestamp,
    ) -> Result<Vec<PollRecord>, SourceError> {
        Ok(self.find(store_id)?.polls.clone())
    }

    async fn load_business_hours(
        &self,
        store_id: &str,
    ) -> Result<Vec<BusinessHourInterval>, SourceError> {
        Ok(self.find(store_id)?.business_hours.clone())
    }
}

impl UnboundedSource {
    fn find(&self, store_id: &str) -> Result<&StoreInput, SourceError> {
        self.inputs
            .iter()
            .find(|input| input.store_id == store_id)
            .ok_or_else(|| SourceError::UnknownStore {
                store_id: store_id.to_string(),
            })
    }
}
