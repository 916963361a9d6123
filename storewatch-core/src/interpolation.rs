//! Status interpolation between sparse polls
//!
//! ## Overview
//!
//! Polls are taken roughly once an hour, so the moment a store actually went
//! down or came back is never observed. Between two consecutive samples the
//! interpolator decides how much of the gap belongs to each status.
//!
//! ## Heuristic
//!
//! A fixed offset (5 minutes by default) is charged to downtime next to the
//! `inactive` sample, and the remainder of the gap keeps the `active` status:
//!
//! ```text
//! inactive → active          active → inactive
//! prev      prev+off   curr   prev    curr-off   curr
//!  |--down--|---up------|      |---up---|--down---|
//! ```
//!
//! If the gap is shorter than the offset, the whole gap is downtime in both
//! directions. Equal statuses produce a single span covering the whole gap.
//!
//! ## Guarantees
//!
//! The produced spans are ordered, non-empty, and tile `[prev, curr]` exactly:
//! no gaps, no overlaps. At most two spans are produced, so the result lives on
//! the stack.

use chrono::Duration;
use heapless::Vec;

use crate::model::Status;
use crate::time::Timestamp;

/// Maximum spans produced for one gap
pub const MAX_SPANS: usize = 2;

/// Observed (or synthetic) status sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Instant of the observation
    pub timestamp: Timestamp,
    /// Status observed or assumed
    pub status: Status,
}

impl Sample {
    /// Construct from parts
    pub fn new(timestamp: Timestamp, status: Status) -> Self {
        Self { timestamp, status }
    }
}

/// Time span attributed to one status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Inclusive start
    pub start: Timestamp,
    /// Exclusive end
    pub end: Timestamp,
    /// Status held over the span
    pub status: Status,
}

impl Span {
    /// Length of the span
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Spans covering one gap between samples
pub type Spans = Vec<Span, MAX_SPANS>;

/// Splits the gap between consecutive samples into status spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionInterpolator {
    offset: Duration,
}

impl TransitionInterpolator {
    /// Interpolator charging `offset` next to inactive samples
    pub fn new(offset: Duration) -> Self {
        Self { offset }
    }

    /// Configured offset
    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Attribute the gap `[prev, curr]` to statuses
    ///
    /// Callers pass samples in time order. A `curr` earlier than `prev` is
    /// passed through as an inverted span for the accumulator to reject.
    pub fn interpolate(&self, prev: Sample, curr: Sample) -> Spans {
        let mut spans = Spans::new();

        match (prev.status, curr.status) {
            (a, b) if a == b => {
                push(&mut spans, prev.timestamp, curr.timestamp, a);
            }
            (Status::Inactive, Status::Active) => {
                let mid = (prev.timestamp + self.offset).min(curr.timestamp);
                push(&mut spans, prev.timestamp, mid, Status::Inactive);
                push(&mut spans, mid, curr.timestamp, Status::Active);
            }
            _ => {
                let mid = (curr.timestamp - self.offset).max(prev.timestamp);
                push(&mut spans, prev.timestamp, mid, Status::Active);
                push(&mut spans, mid, curr.timestamp, Status::Inactive);
            }
        }

        spans
    }
}

// Zero-length pieces carry no time and are dropped.
fn push(spans: &mut Spans, start: Timestamp, end: Timestamp, status: Status) {
    if start == end {
        return;
    }
    // No arm pushes more than MAX_SPANS pieces
    let _ = spans.push(Span { start, end, status });
}
