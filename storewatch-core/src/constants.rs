//! Constants for StoreWatch Core
//!
//! Centralized defaults and time conversion factors. The engine never reads
//! these directly during a computation; they only seed [`EngineConfig`] and the
//! report layer's configuration.
//!
//! [`EngineConfig`]: crate::config::EngineConfig

use chrono_tz::Tz;

// ===== TIME UNIT CONVERSIONS =====

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: i64 = 60;

/// Hours per day.
pub const HOURS_PER_DAY: i64 = 24;

/// Days per week.
pub const DAYS_PER_WEEK: i64 = 7;

/// Milliseconds per minute, the unit the hour bucket is emitted in.
pub const MS_PER_MINUTE: i64 = 1000 * SECONDS_PER_MINUTE;

/// Milliseconds per hour, the unit the day and week buckets are emitted in.
pub const MS_PER_HOUR: i64 = MS_PER_MINUTE * MINUTES_PER_HOUR;

// ===== ENGINE DEFAULTS =====

/// Default interpolation offset (minutes).
///
/// When two consecutive polls disagree, this much time next to the
/// `inactive` poll is attributed to downtime; the rest of the gap keeps the
/// `active` status.
pub const DEFAULT_INTERPOLATION_OFFSET_MINUTES: i64 = 5;

/// Timezone substituted for stores that have none on record.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Chicago;

// ===== REPORT DEFAULTS =====

/// Default bound on concurrently processed stores.
///
/// Matches the backing store's connection pool so fan-out never queues more
/// I/O than the pool can serve.
pub const DEFAULT_POOL_SIZE: usize = 12;

/// Number of weekdays in a schedule (Monday = 0 … Sunday = 6).
pub const WEEKDAYS: usize = 7;
