//! Trailing-window accumulation
//!
//! ## Overview
//!
//! Every span produced by the interpolator is added to the buckets of the
//! windows it overlaps. A span is clipped against each window's anchor, so a
//! span straddling `day_ago` contributes fully to the week bucket and only its
//! tail to the day bucket:
//!
//! ```text
//!            day_ago
//!   span:  |----|=========|
//!   week:  |==============|
//!   day:        |=========|
//! ```
//!
//! Windows are walked from the widest to the narrowest. Once a span ends at or
//! before a window's anchor, the narrower windows (whose anchors are later)
//! cannot overlap it either, and the walk stops.
//!
//! Spans are also clipped at the reference instant: nothing after "now" is
//! ever counted, which keeps each bucket within its window length.
//!
//! ## Units
//!
//! Buckets hold exact durations. Conversion to the report units (minutes for
//! the hour window, hours for the day and week windows) and rounding happen
//! only at emission, in [`StoreUptime::to_row`].

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{MS_PER_HOUR, MS_PER_MINUTE};
use crate::errors::{ComputeError, ComputeResult};
use crate::interpolation::Span;
use crate::model::Status;
use crate::window::{Window, WindowAnchors};

/// Six-bucket uptime/downtime totals for one store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUptime {
    uptime: [Duration; 3],
    downtime: [Duration; 3],
}

impl Default for StoreUptime {
    fn default() -> Self {
        Self {
            uptime: [Duration::zero(); 3],
            downtime: [Duration::zero(); 3],
        }
    }
}

impl StoreUptime {
    /// Time observed active in a window
    pub fn uptime(&self, window: Window) -> Duration {
        self.uptime[window.index()]
    }

    /// Time observed inactive in a window
    pub fn downtime(&self, window: Window) -> Duration {
        self.downtime[window.index()]
    }

    /// Accrued duration for a status in a window
    pub fn total(&self, status: Status, window: Window) -> Duration {
        match status {
            Status::Active => self.uptime(window),
            Status::Inactive => self.downtime(window),
        }
    }

    /// True when nothing was accrued in any bucket
    pub fn is_zero(&self) -> bool {
        self.uptime.iter().chain(self.downtime.iter()).all(|d| *d == Duration::zero())
    }

    fn add(&mut self, status: Status, window: Window, duration: Duration) {
        let bucket = match status {
            Status::Active => &mut self.uptime[window.index()],
            Status::Inactive => &mut self.downtime[window.index()],
        };
        *bucket += duration;
    }

    /// Emit the store's report row
    ///
    /// The hour bucket is reported in minutes, day and week buckets in hours.
    /// Values are rounded to the nearest integer, ties to even.
    pub fn to_row(&self, store_id: &str) -> ReportRow {
        ReportRow {
            store_id: store_id.to_string(),
            uptime_last_hour: round_units(self.uptime(Window::Hour), MS_PER_MINUTE),
            uptime_last_day: round_units(self.uptime(Window::Day), MS_PER_HOUR),
            uptime_last_week: round_units(self.uptime(Window::Week), MS_PER_HOUR),
            downtime_last_hour: round_units(self.downtime(Window::Hour), MS_PER_MINUTE),
            downtime_last_day: round_units(self.downtime(Window::Day), MS_PER_HOUR),
            downtime_last_week: round_units(self.downtime(Window::Week), MS_PER_HOUR),
        }
    }
}

fn round_units(duration: Duration, unit_ms: i64) -> i64 {
    (duration.num_milliseconds() as f64 / unit_ms as f64).round_ties_even() as i64
}

/// One emitted report line
///
/// `*_last_hour` fields are minutes; `*_last_day` and `*_last_week` are hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Store the row belongs to
    pub store_id: String,
    /// Minutes
    pub uptime_last_hour: i64,
    /// Hours
    pub uptime_last_day: i64,
    /// Hours
    pub uptime_last_week: i64,
    /// Minutes
    pub downtime_last_hour: i64,
    /// Hours
    pub downtime_last_day: i64,
    /// Hours
    pub downtime_last_week: i64,
}

/// Adds status spans into trailing-window buckets
#[derive(Debug, Clone)]
pub struct SegmentAccumulator<'a> {
    store_id: &'a str,
    anchors: WindowAnchors,
    totals: StoreUptime,
}

impl<'a> SegmentAccumulator<'a> {
    /// Empty accumulator for one store
    pub fn new(store_id: &'a str, anchors: WindowAnchors) -> Self {
        Self {
            store_id,
            anchors,
            totals: StoreUptime::default(),
        }
    }

    /// Add a span to every window it overlaps
    pub fn accumulate(&mut self, span: &Span) -> ComputeResult<()> {
        if span.end < span.start {
            return Err(ComputeError::InvertedInterval {
                store_id: self.store_id.to_string(),
                start: span.start,
                end: span.end,
            });
        }

        let end = span.end.min(self.anchors.reference);

        for window in Window::ALL {
            let anchor = self.anchors.anchor(window);
            if end <= anchor {
                break;
            }
            let start = span.start.max(anchor);
            if start < end {
                self.totals.add(span.status, window, end - start);
            }
        }

        Ok(())
    }

    /// Totals accrued so far
    pub fn totals(&self) -> &StoreUptime {
        &self.totals
    }

    /// Consume the accumulator, keeping its totals
    pub fn into_totals(self) -> StoreUptime {
        self.totals
    }
}
