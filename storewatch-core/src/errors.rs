//! Error Types for Uptime Estimation Failures
//!
//! ## Design Philosophy
//!
//! Most of the odd inputs the engine sees are not errors at all:
//!
//! - A store without a timezone gets the configured default timezone.
//! - A store without business hours is closed all week and accrues nothing.
//! - A store without polls in the report window accrues nothing.
//! - Polls that arrive out of order are sorted before processing.
//!
//! What remains are faults that make the numbers for *one store* untrustworthy.
//! They are reported per store so the report layer can record the failure next
//! to the other stores' results instead of aborting the whole run.
//!
//! ## Error Categories
//!
//! ### Input Faults
//! - `InvalidTimezone`: The store's timezone identifier is not a known IANA zone
//! - `UnresolvableLocalTime`: A business-hours boundary does not exist on that
//!   date in the store's timezone and could not be shifted past the gap
//!
//! ### Invariant Breaks
//! - `InvertedInterval`: An interval reached the accumulator ending before it started
//!
//! ### Configuration Faults
//! - `InvalidConfig`: An engine parameter is out of range (e.g. a zero offset)
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use storewatch_core::{ComputeError, ComputeResult, StoreUptime};
//!
//! fn record(store_id: &str, outcome: ComputeResult<StoreUptime>) {
//!     match outcome {
//!         Ok(uptime) => {
//!             // emit uptime.to_row(store_id)
//!         }
//!         Err(ComputeError::InvalidTimezone { .. }) => {
//!             // Store master data needs fixing
//!         }
//!         Err(other) => {
//!             // Log with store id and move on to the next store
//!             let _ = other;
//!         }
//!     }
//! }
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Result type for estimation operations
pub type ComputeResult<T> = Result<T, ComputeError>;

/// Per-store computation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// Timezone identifier could not be parsed
    #[error("Store {store_id}: unknown timezone '{timezone}'")]
    InvalidTimezone {
        /// Store the timezone belongs to
        store_id: String,
        /// The identifier as it was supplied
        timezone: String,
    },

    /// Local wall-clock time has no instant in the store's timezone
    #[error("Store {store_id}: local time {local} does not exist in {timezone}")]
    UnresolvableLocalTime {
        /// Store being processed
        store_id: String,
        /// Wall-clock time that fell into a timezone gap
        local: NaiveDateTime,
        /// Timezone in which the lookup failed
        timezone: String,
    },

    /// Interval handed to the accumulator ends before it starts
    #[error("Store {store_id}: interval ends at {end} before it starts at {start}")]
    InvertedInterval {
        /// Store being processed
        store_id: String,
        /// Interval start (UTC)
        start: DateTime<Utc>,
        /// Interval end (UTC)
        end: DateTime<Utc>,
    },

    /// Engine configuration rejected
    #[error("Invalid engine configuration: {reason}")]
    InvalidConfig {
        /// What was rejected
        reason: &'static str,
    },
}

impl ComputeError {
    /// Store the error refers to, if it is store specific
    pub fn store_id(&self) -> Option<&str> {
        match self {
            Self::InvalidTimezone { store_id, .. }
            | Self::UnresolvableLocalTime { store_id, .. }
            | Self::InvertedInterval { store_id, .. } => Some(store_id),
            Self::InvalidConfig { .. } => None,
        }
    }
}
