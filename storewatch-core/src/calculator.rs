//! Per-store uptime state machine
//!
//! ## Overview
//!
//! The calculator walks one store's polls in time order and keeps track of
//! the business-hours segment it is currently inside:
//!
//! ```text
//!            no match                          match
//!   Closed ───────────► Closed     Closed ────────────► Open(segment)
//!
//!            same segment                      other segment / no match
//!   Open ─────────────► Open       Open ──────────────► finalize, then
//!   (interpolate prev → poll)                            Open(new) / Closed
//! ```
//!
//! A segment is one business-hours interval on one local calendar date. Only
//! time inside open segments is ever accrued.
//!
//! ## Segment Boundaries
//!
//! - **Opening**: the first poll of a segment has no earlier sample. A synthetic
//!   sample is placed at the segment's opening time carrying the *first poll's*
//!   status, so the span from opening to the first poll keeps the status that
//!   was actually observed rather than an assumed one.
//! - **Closing**: when the segment ends without a poll at closing time (the
//!   next poll is outside it, or the stream ends), the last observed status is
//!   extended to the closing time.
//!
//! Both boundaries are local wall-clock times combined with the segment's
//! local date and mapped back to UTC in the store's timezone. When clocks go
//! back, an opening takes the first pass through the repeated hour and a
//! closing the second. Accrued spans
//! never overlap: an opening is never placed before time already accrued, and
//! a closing is never placed after the poll that triggered it. This keeps each
//! bucket within its window length even for overlapping schedule rows.
//!
//! ## Preconditions
//!
//! [`StoreUptimeCalculator::process`] expects polls of a single store in
//! ascending timestamp order. [`calculate_store`] establishes that order
//! itself, so callers with unsorted data should go through it.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::accumulator::{SegmentAccumulator, StoreUptime};
use crate::business_hours::BusinessHoursIndex;
use crate::config::EngineConfig;
use crate::errors::ComputeResult;
use crate::interpolation::{Sample, TransitionInterpolator};
use crate::model::{BusinessHourInterval, PollRecord, StoreInput};
use crate::time::{localize, resolve_local, resolve_timezone, Occurrence, Timestamp};
use crate::window::WindowAnchors;

/// Business-hours segment being accrued
#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenSegment {
    /// Local calendar date of the segment
    date: NaiveDate,
    interval: BusinessHourInterval,
    /// Most recent sample inside the segment
    last: Sample,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CalculatorState {
    Closed,
    Open(OpenSegment),
}

/// Estimates uptime and downtime for one store
pub struct StoreUptimeCalculator<'a> {
    store_id: &'a str,
    tz: Tz,
    hours: BusinessHoursIndex,
    interpolator: TransitionInterpolator,
    accumulator: SegmentAccumulator<'a>,
    state: CalculatorState,
    /// End of the latest span handed to the accumulator
    accrued_until: Option<Timestamp>,
}

impl<'a> StoreUptimeCalculator<'a> {
    /// Calculator in the closed state, before any poll
    pub fn new(
        store_id: &'a str,
        tz: Tz,
        hours: BusinessHoursIndex,
        anchors: WindowAnchors,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store_id,
            tz,
            hours,
            interpolator: TransitionInterpolator::new(config.interpolation_offset),
            accumulator: SegmentAccumulator::new(store_id, anchors),
            state: CalculatorState::Closed,
            accrued_until: None,
        }
    }

    /// Process the next poll in time order
    pub fn process(&mut self, poll: &PollRecord) -> ComputeResult<()> {
        let local = localize(self.tz, poll.timestamp);

        let Some(interval) = self.hours.matching(&local).copied() else {
            // Outside business hours
            return self.close_segment(Some(poll.timestamp));
        };
        let date = local.date_naive();

        if let CalculatorState::Open(segment) = self.state {
            if segment.date != date || segment.interval != interval {
                self.close_segment(Some(poll.timestamp))?;
            }
        }

        let current = Sample::new(poll.timestamp, poll.status);
        let previous = match self.state {
            CalculatorState::Open(segment) => segment.last,
            CalculatorState::Closed => {
                let mut opened_at =
                    self.boundary(date, interval.start_time_local, Occurrence::Earliest)?;
                if let Some(accrued_until) = self.accrued_until {
                    opened_at = opened_at.max(accrued_until);
                }
                Sample::new(opened_at.min(poll.timestamp), poll.status)
            }
        };

        self.feed(previous, current)?;
        self.state = CalculatorState::Open(OpenSegment {
            date,
            interval,
            last: current,
        });

        Ok(())
    }

    /// Finalize a trailing open segment and return the totals
    pub fn finish(mut self) -> ComputeResult<StoreUptime> {
        self.close_segment(None)?;
        Ok(self.accumulator.into_totals())
    }

    /// Totals accrued so far, without finalizing the open segment
    pub fn totals(&self) -> &StoreUptime {
        self.accumulator.totals()
    }

    // `next_poll` caps the closing time so segments never overlap the poll
    // that ended them.
    fn close_segment(&mut self, next_poll: Option<Timestamp>) -> ComputeResult<()> {
        let state = std::mem::replace(&mut self.state, CalculatorState::Closed);

        if let CalculatorState::Open(segment) = state {
            let mut closed_at = self
                .boundary(segment.date, segment.interval.end_time_local, Occurrence::Latest)?
                .max(segment.last.timestamp);
            if let Some(next_poll) = next_poll {
                closed_at = closed_at.min(next_poll).max(segment.last.timestamp);
            }
            self.feed(segment.last, Sample::new(closed_at, segment.last.status))?;
        }

        Ok(())
    }

    fn feed(&mut self, previous: Sample, current: Sample) -> ComputeResult<()> {
        for span in self.interpolator.interpolate(previous, current) {
            log::trace!(
                "Store {}: {} {} -> {}",
                self.store_id, span.status, span.start, span.end
            );
            self.accumulator.accumulate(&span)?;
        }
        self.accrued_until = Some(match self.accrued_until {
            Some(until) => until.max(current.timestamp),
            None => current.timestamp,
        });
        Ok(())
    }

    fn boundary(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        occurrence: Occurrence,
    ) -> ComputeResult<Timestamp> {
        resolve_local(self.store_id, self.tz, date.and_time(time), occurrence)
    }
}

/// Estimate one store's six-bucket totals
///
/// Resolves the store's timezone (substituting the configured default), sorts
/// the polls if they are not already in time order, and runs the calculator
/// over them.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use storewatch_core::{calculate_store, EngineConfig, StoreInput, WindowAnchors};
///
/// let anchors = WindowAnchors::new(Utc.with_ymd_and_hms(2023, 1, 25, 18, 0, 0).unwrap());
/// let store = StoreInput::new("closed-store");
/// let totals = calculate_store(&store, anchors, &EngineConfig::default()).unwrap();
/// assert!(totals.is_zero());
/// ```
pub fn calculate_store(
    input: &StoreInput,
    anchors: WindowAnchors,
    config: &EngineConfig,
) -> ComputeResult<StoreUptime> {
    config.validate()?;

    let store_id = input.store_id.as_str();
    let tz = resolve_timezone(store_id, input.timezone.as_deref(), config.default_timezone)?;
    let hours = BusinessHoursIndex::new(store_id, &input.business_hours);

    if hours.is_always_closed() || input.polls.is_empty() {
        return Ok(StoreUptime::default());
    }

    let polls = sorted_polls(store_id, &input.polls);
    let mut calculator = StoreUptimeCalculator::new(store_id, tz, hours, anchors, config);
    for poll in polls.iter() {
        calculator.process(poll)?;
    }
    calculator.finish()
}

fn sorted_polls<'p>(store_id: &str, polls: &'p [PollRecord]) -> Cow<'p, [PollRecord]> {
    if polls.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp) {
        return Cow::Borrowed(polls);
    }

    log::warn!("Store {}: polls out of order, sorting {} polls", store_id, polls.len());
    let mut sorted = polls.to_vec();
    sorted.sort_by_key(|poll| poll.timestamp);
    Cow::Owned(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::window::Window;
    use chrono::{Duration, TimeZone, Utc};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2023-01-23 is a Monday; the store runs on UTC to keep arithmetic obvious
    fn monday(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2023, 1, 23, h, m, 0).unwrap()
    }

    fn store(polls: Vec<(Timestamp, Status)>) -> StoreInput {
        StoreInput::new("s1")
            .with_timezone("UTC")
            .with_business_hours(vec![BusinessHourInterval::new(0, t(9, 0), t(17, 0))])
            .with_polls(
                polls
                    .into_iter()
                    .map(|(ts, status)| PollRecord::new("s1", ts, status))
                    .collect(),
            )
    }

    fn run(input: &StoreInput, reference: Timestamp) -> StoreUptime {
        calculate_store(input, WindowAnchors::new(reference), &EngineConfig::default()).unwrap()
    }

    #[test]
    fn first_poll_status_fills_from_opening() {
        let input = store(vec![(monday(10, 0), Status::Inactive)]);
        let totals = run(&input, monday(23, 0));
        // 09:00-10:00 from opening, 10:00-17:00 finalized
        assert_eq!(totals.downtime(Window::Day), Duration::hours(8));
        assert_eq!(totals.uptime(Window::Day), Duration::zero());
    }

    #[test]
    fn poll_outside_hours_closes_segment() {
        let input = store(vec![
            (monday(16, 0), Status::Active),
            (monday(18, 0), Status::Inactive),
        ]);
        let totals = run(&input, monday(23, 0));
        // 09:00-17:00 active, inactive poll after closing is ignored
        assert_eq!(totals.uptime(Window::Day), Duration::hours(8));
        assert_eq!(totals.downtime(Window::Day), Duration::zero());
    }

    #[test]
    fn new_day_starts_new_segment() {
        let input = StoreInput::new("s1")
            .with_timezone("UTC")
            .with_business_hours(vec![
                BusinessHourInterval::new(0, t(9, 0), t(17, 0)),
                BusinessHourInterval::new(1, t(9, 0), t(17, 0)),
            ])
            .with_polls(vec![
                PollRecord::new("s1", monday(16, 0), Status::Inactive),
                PollRecord::new("s1", monday(16, 0) + Duration::days(1), Status::Active),
            ]);
        let totals = run(&input, monday(23, 0) + Duration::days(1));
        // Monday 09:00-17:00 down, Tuesday 09:00-17:00 up; nothing overnight
        assert_eq!(totals.downtime(Window::Week), Duration::hours(8));
        assert_eq!(totals.uptime(Window::Week), Duration::hours(8));
    }

    #[test]
    fn unsorted_polls_are_sorted() {
        let sorted = store(vec![
            (monday(10, 0), Status::Active),
            (monday(12, 0), Status::Inactive),
            (monday(14, 0), Status::Active),
        ]);
        let mut shuffled = sorted.clone();
        shuffled.polls.reverse();
        let reference = monday(20, 0);
        assert_eq!(run(&sorted, reference), run(&shuffled, reference));
    }

    #[test]
    fn open_segment_is_clipped_at_reference() {
        let input = store(vec![(monday(9, 30), Status::Active)]);
        let totals = run(&input, monday(12, 0));
        assert_eq!(totals.uptime(Window::Day), Duration::hours(3));
        assert_eq!(totals.uptime(Window::Hour), Duration::hours(1));
    }

    #[test]
    fn overlapping_rows_do_not_double_count() {
        let input = StoreInput::new("s1")
            .with_timezone("UTC")
            .with_business_hours(vec![
                BusinessHourInterval::new(0, t(9, 0), t(12, 0)),
                BusinessHourInterval::new(0, t(10, 0), t(14, 0)),
            ])
            .with_polls(vec![
                PollRecord::new("s1", monday(9, 30), Status::Active),
                PollRecord::new("s1", monday(13, 0), Status::Inactive),
            ]);
        let totals = run(&input, monday(20, 0));
        // 09:00-12:00 up in the first row; the second row picks up at 12:00
        assert_eq!(totals.uptime(Window::Day), Duration::hours(3));
        assert_eq!(totals.downtime(Window::Day), Duration::hours(2));
    }

    #[test]
    fn invalid_timezone_fails_the_store() {
        let input = store(vec![(monday(10, 0), Status::Active)]).with_timezone("Nowhere/Land");
        let result = calculate_store(&input, WindowAnchors::new(monday(20, 0)), &EngineConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn incremental_totals_exclude_open_segment() {
        let input = store(vec![]);
        let hours = BusinessHoursIndex::new("s1", &input.business_hours);
        let mut calculator = StoreUptimeCalculator::new(
            "s1",
            chrono_tz::UTC,
            hours,
            WindowAnchors::new(monday(20, 0)),
            &EngineConfig::default(),
        );
        calculator
            .process(&PollRecord::new("s1", monday(10, 0), Status::Active))
            .unwrap();
        assert_eq!(calculator.totals().uptime(Window::Day), Duration::hours(1));

        let totals = calculator.finish().unwrap();
        assert_eq!(totals.uptime(Window::Day), Duration::hours(8));
    }
}
