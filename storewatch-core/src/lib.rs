//! Core estimation engine for StoreWatch
//!
//! Estimates, per store, how long it was up and down during its business
//! hours over the last hour, day and week, from sparse status polls.
//!
//! Key properties:
//! - Pure computation: no I/O, no async, no global state
//! - Timezone aware: polls are matched against local business hours per poll,
//!   so daylight-saving changes inside a week are handled
//! - Stores are independent: each calculation owns its state exclusively
//!
//! ```no_run
//! use chrono::Utc;
//! use storewatch_core::{calculate_store, EngineConfig, StoreInput, WindowAnchors};
//!
//! let anchors = WindowAnchors::new(Utc::now());
//! let store = StoreInput::new("store-1").with_timezone("America/New_York");
//!
//! match calculate_store(&store, anchors, &EngineConfig::default()) {
//!     Ok(totals) => println!("{:?}", totals.to_row("store-1")),
//!     Err(e) => eprintln!("store-1 failed: {e}"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod accumulator;
pub mod business_hours;
pub mod calculator;
pub mod config;
pub mod constants;
pub mod errors;
pub mod interpolation;
pub mod model;
pub mod time;
pub mod window;

// Public API
pub use accumulator::{ReportRow, SegmentAccumulator, StoreUptime};
pub use business_hours::BusinessHoursIndex;
pub use calculator::{calculate_store, StoreUptimeCalculator};
pub use config::EngineConfig;
pub use errors::{ComputeError, ComputeResult};
pub use interpolation::{Sample, Span, TransitionInterpolator};
pub use model::{BusinessHourInterval, PollRecord, Status, StoreInput};
pub use time::{FixedClock, ReferenceClock, SystemClock, Timestamp};
pub use window::{Window, WindowAnchors};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
