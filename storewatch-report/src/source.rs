//! Store data sources
//!
//! The aggregator never talks to storage directly. It asks a
//! [`StoreDataSource`] which stores to report on and then loads each store's
//! timezone, polls and weekly schedule on its own worker.
//!
//! [`MemorySource`] serves a [`ReportBatch`], the JSON document the
//! `storewatch` binary reads:
//!
//! ```json
//! {
//!   "reference": "2023-01-25T18:00:00Z",
//!   "stores": [{ "store_id": "s1", "timezone_str": "America/Denver" }],
//!   "polls": [{ "store_id": "s1", "timestamp": "2023-01-25T16:00:00Z", "status": "active" }],
//!   "business_hours": [
//!     { "store_id": "s1", "day_of_week": 2, "start_time_local": "09:00:00", "end_time_local": "17:00:00" }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use storewatch_core::{BusinessHourInterval, PollRecord, StoreInput, Timestamp};

use crate::errors::{ReportResult, SourceError};

/// Where the aggregator gets its inputs from
#[async_trait]
pub trait StoreDataSource: Send + Sync {
    /// Stores to report on for the window `[from, to]`
    ///
    /// Sources discovering stores from their poll table list those with at
    /// least one poll in the window.
    async fn list_stores(&self, from: Timestamp, to: Timestamp)
        -> Result<Vec<String>, SourceError>;

    /// IANA timezone on record, if any
    async fn load_timezone(&self, store_id: &str) -> Result<Option<String>, SourceError>;

    /// Polls of one store in `[from, to]`, in any order
    async fn load_polls(
        &self,
        store_id: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<PollRecord>, SourceError>;

    /// Weekly schedule; empty means closed all week
    async fn load_business_hours(
        &self,
        store_id: &str,
    ) -> Result<Vec<BusinessHourInterval>, SourceError>;

    /// Everything the engine needs for one store
    async fn load_store(
        &self,
        store_id: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<StoreInput, SourceError> {
        let timezone = self.load_timezone(store_id).await?;
        let polls = self.load_polls(store_id, from, to).await?;
        let business_hours = self.load_business_hours(store_id).await?;
        Ok(StoreInput {
            store_id: store_id.to_string(),
            timezone,
            polls,
            business_hours,
        })
    }
}

/// Store master row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_id: String,
    #[serde(default)]
    pub timezone_str: Option<String>,
}

/// Schedule row keyed by store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHoursRecord {
    pub store_id: String,
    pub day_of_week: u8,
    pub start_time_local: NaiveTime,
    pub end_time_local: NaiveTime,
}

impl BusinessHoursRecord {
    fn interval(&self) -> BusinessHourInterval {
        BusinessHourInterval::new(self.day_of_week, self.start_time_local, self.end_time_local)
    }
}

/// Flat batch of source rows plus an optional pinned reference instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportBatch {
    #[serde(default)]
    pub reference: Option<Timestamp>,
    #[serde(default)]
    pub stores: Vec<StoreRecord>,
    #[serde(default)]
    pub polls: Vec<PollRecord>,
    #[serde(default)]
    pub business_hours: Vec<BusinessHoursRecord>,
}

impl ReportBatch {
    pub fn from_reader<R: Read>(reader: R) -> ReportResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReportResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

/// In-memory source indexed by store id
///
/// Built from a [`ReportBatch`] it discovers stores by their polls. Built
/// from explicit [`StoreInput`]s it lists exactly those stores, polled or not.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    roster: Option<Vec<String>>,
    timezones: HashMap<String, Option<String>>,
    polls: BTreeMap<String, Vec<PollRecord>>,
    hours: HashMap<String, Vec<BusinessHourInterval>>,
}

impl MemorySource {
    pub fn new(batch: ReportBatch) -> Self {
        let mut source = Self::default();

        for store in batch.stores {
            source.timezones.insert(store.store_id, store.timezone_str);
        }
        for poll in batch.polls {
            source.polls.entry(poll.store_id.clone()).or_default().push(poll);
        }
        for row in batch.business_hours {
            source
                .hours
                .entry(row.store_id.clone())
                .or_default()
                .push(row.interval());
        }

        log::debug!(
            "Indexed {} stores with polls, {} with schedules, {} with timezones",
            source.polls.len(),
            source.hours.len(),
            source.timezones.len()
        );
        source
    }

    /// Build from fully assembled store inputs
    pub fn from_inputs(inputs: impl IntoIterator<Item = StoreInput>) -> Self {
        let mut source = Self::default();
        let mut roster = Vec::new();
        for input in inputs {
            roster.push(input.store_id.clone());
            source.timezones.insert(input.store_id.clone(), input.timezone);
            source.polls.insert(input.store_id.clone(), input.polls);
            source.hours.insert(input.store_id, input.business_hours);
        }
        roster.sort();
        roster.dedup();
        source.roster = Some(roster);
        source
    }

    fn knows(&self, store_id: &str) -> bool {
        self.polls.contains_key(store_id)
            || self.timezones.contains_key(store_id)
            || self.hours.contains_key(store_id)
    }
}

#[async_trait]
impl StoreDataSource for MemorySource {
    async fn list_stores(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<String>, SourceError> {
        if let Some(roster) = &self.roster {
            return Ok(roster.clone());
        }
        Ok(self
            .polls
            .iter()
            .filter(|(_, polls)| {
                polls
                    .iter()
                    .any(|poll| from <= poll.timestamp && poll.timestamp <= to)
            })
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn load_timezone(&self, store_id: &str) -> Result<Option<String>, SourceError> {
        if !self.knows(store_id) {
            return Err(SourceError::UnknownStore {
                store_id: store_id.to_string(),
            });
        }
        Ok(self.timezones.get(store_id).cloned().flatten())
    }

    async fn load_polls(
        &self,
        store_id: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<PollRecord>, SourceError> {
        Ok(self
            .polls
            .get(store_id)
            .map(|polls| {
                polls
                    .iter()
                    .filter(|poll| from <= poll.timestamp && poll.timestamp <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn load_business_hours(
        &self,
        store_id: &str,
    ) -> Result<Vec<BusinessHourInterval>, SourceError> {
        Ok(self.hours.get(store_id).cloned().unwrap_or_default())
    }
}
