//! Trailing report windows
//!
//! Every report looks back from one reference instant over three nested
//! windows:
//!
//! ```text
//!  week_ago                      day_ago       hour_ago  reference
//!     |------------------------------|-------------|--------|
//!     |<-------------------- last week --------------------->|
//!                                    |<------ last day ----->|
//!                                                  |<-hour->|
//! ```
//!
//! The anchors are derived once per report and never change during a run.

use chrono::Duration;

use crate::constants::DAYS_PER_WEEK;
use crate::time::Timestamp;

/// One of the three trailing windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Seven days
    Week,
    /// Twenty-four hours
    Day,
    /// Sixty minutes
    Hour,
}

impl Window {
    /// Windows ordered from the widest (earliest anchor) to the narrowest
    pub const ALL: [Window; 3] = [Window::Week, Window::Day, Window::Hour];

    /// Window length
    pub fn length(self) -> Duration {
        match self {
            Self::Week => Duration::days(DAYS_PER_WEEK),
            Self::Day => Duration::days(1),
            Self::Hour => Duration::hours(1),
        }
    }

    /// Position in bucket arrays
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Week => 0,
            Self::Day => 1,
            Self::Hour => 2,
        }
    }
}

/// Window start instants derived from the reference instant
///
/// Invariant: `week_ago <= day_ago <= hour_ago <= reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAnchors {
    /// End of every window
    pub reference: Timestamp,
    /// Start of the week window
    pub week_ago: Timestamp,
    /// Start of the day window
    pub day_ago: Timestamp,
    /// Start of the hour window
    pub hour_ago: Timestamp,
}

impl WindowAnchors {
    /// Anchors for windows ending at `reference`
    pub fn new(reference: Timestamp) -> Self {
        Self {
            reference,
            week_ago: reference - Window::Week.length(),
            day_ago: reference - Window::Day.length(),
            hour_ago: reference - Window::Hour.length(),
        }
    }

    /// Start instant of a window
    pub fn anchor(&self, window: Window) -> Timestamp {
        match window {
            Window::Week => self.week_ago,
            Window::Day => self.day_ago,
            Window::Hour => self.hour_ago,
        }
    }

    /// Check whether an instant lies inside the widest window (both ends inclusive)
    pub fn covers(&self, instant: Timestamp) -> bool {
        self.week_ago <= instant && instant <= self.reference
    }
}
