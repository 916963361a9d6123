//! Completed report
//!
//! One entry per requested store, holding either its totals or the failure
//! that stopped it. Iteration order is store id order.

use std::collections::BTreeMap;

use storewatch_core::{ReportRow, StoreUptime, Timestamp};

use crate::errors::StoreFailure;

/// Outcome recorded for one store
pub type StoreOutcome = Result<StoreUptime, StoreFailure>;

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    reference: Timestamp,
    outcomes: BTreeMap<String, StoreOutcome>,
}

impl Report {
    pub fn new(reference: Timestamp) -> Self {
        Self {
            reference,
            outcomes: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, store_id: String, outcome: StoreOutcome) {
        self.outcomes.insert(store_id, outcome);
    }

    /// Instant the trailing windows end at
    pub fn reference(&self) -> Timestamp {
        self.reference
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, store_id: &str) -> Option<&StoreOutcome> {
        self.outcomes.get(store_id)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &StoreOutcome)> {
        self.outcomes.iter().map(|(id, outcome)| (id.as_str(), outcome))
    }

    /// Emission rows for every store that computed
    pub fn rows(&self) -> Vec<ReportRow> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.as_ref().ok().map(|totals| totals.to_row(id)))
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StoreFailure> {
        self.outcomes.values().filter_map(|outcome| outcome.as_ref().err())
    }

    /// True when every requested store computed
    pub fn is_complete(&self) -> bool {
        self.outcomes.values().all(Result::is_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn rows_skip_failures_and_keep_order() {
        let mut report = Report::new(Utc.with_ymd_and_hms(2023, 1, 25, 18, 0, 0).unwrap());
        report.record("b".into(), Ok(StoreUptime::default()));
        report.record("c".into(), Err(StoreFailure::panicked("c", "boom")));
        report.record("a".into(), Ok(StoreUptime::default()));

        let ids: Vec<_> = report.rows().into_iter().map(|row| row.store_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(report.len(), 3);
        assert!(!report.is_complete());

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.store_id, "c");
        assert_eq!(failure.kind, FailureKind::Panicked);
    }
}
