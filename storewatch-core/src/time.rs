//! Time handling for store reports
//!
//! Provides:
//! - A clock abstraction for the report's reference instant (system clock in
//!   production, fixed clock in tests and replays)
//! - Timezone resolution with default substitution
//! - UTC ⇄ store-local conversion
//!
//! All instants exchanged between components are UTC. Conversion to local
//! wall-clock time happens per poll at the business-hours matching boundary,
//! so a poll stream that crosses a daylight-saving change is matched with the
//! offset that was in force at each poll.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{ComputeError, ComputeResult};

/// Instant in UTC
pub type Timestamp = DateTime<Utc>;

/// Source of the reference instant for a report
pub trait ReferenceClock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> Timestamp;
}

/// Wall clock reference
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ReferenceClock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Fixed clock for testing and replaying historical reports
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    /// Clock pinned at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward
    pub fn advance(&mut self, delta: Duration) {
        self.timestamp += delta;
    }
}

impl ReferenceClock for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Resolve a store's timezone, substituting `default` when none is recorded
pub fn resolve_timezone(store_id: &str, timezone: Option<&str>, default: Tz) -> ComputeResult<Tz> {
    match timezone.map(str::trim) {
        None | Some("") => Ok(default),
        Some(name) => name.parse::<Tz>().map_err(|_| ComputeError::InvalidTimezone {
            store_id: store_id.to_string(),
            timezone: name.to_string(),
        }),
    }
}

/// Convert a UTC instant to the store's local time
pub fn localize(tz: Tz, instant: Timestamp) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// Which instant an ambiguous local time maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// First pass through the repeated hour; used for openings
    Earliest,
    /// Second pass through the repeated hour; used for closings
    Latest,
}

/// Map a local wall-clock time back to a UTC instant
///
/// Ambiguous times (clocks going back) resolve to the instant `occurrence`
/// selects. Times inside a gap (clocks going forward) are moved forward by
/// the usual one hour shift; anything still unresolvable is an error.
pub fn resolve_local(
    store_id: &str,
    tz: Tz,
    local: NaiveDateTime,
    occurrence: Occurrence,
) -> ComputeResult<Timestamp> {
    let pick = |local: NaiveDateTime| {
        let mapped = tz.from_local_datetime(&local);
        match occurrence {
            Occurrence::Earliest => mapped.earliest(),
            Occurrence::Latest => mapped.latest(),
        }
    };
    let resolved = pick(local).or_else(|| pick(local + Duration::hours(1)));

    match resolved {
        Some(instant) => Ok(instant.with_timezone(&Utc)),
        None => Err(ComputeError::UnresolvableLocalTime {
            store_id: store_id.to_string(),
            local,
            timezone: tz.name().to_string(),
        }),
    }
}
