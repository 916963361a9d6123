//! Parallel report aggregation
//!
//! A run asks the source which stores to report on, then computes each
//! store on its own task. Every listed store ends up in the report. At most `pool_size` stores are loaded or computed
//! at the same time.
//!
//! Stores share nothing: every task owns its inputs and its calculator, and
//! the only merge point is the report map filled after all tasks finished.
//! A store that fails to load, is rejected by the engine, or panics is
//! recorded as a [`StoreFailure`] under its id. The other stores are not
//! affected.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use storewatch_core::{calculate_store, EngineConfig, ReferenceClock, Timestamp, WindowAnchors};
use tokio::sync::Semaphore;
use tokio::task::JoinError;

use crate::config::ReportConfig;
use crate::errors::{ReportResult, StoreFailure};
use crate::report::{Report, StoreOutcome};
use crate::source::StoreDataSource;

/// Runs reports against one data source
pub struct ReportAggregator<S: ?Sized> {
    source: Arc<S>,
    config: ReportConfig,
}

impl<S> ReportAggregator<S>
where
    S: StoreDataSource + ?Sized + 'static,
{
    pub fn new(source: Arc<S>, config: ReportConfig) -> ReportResult<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run with the reference instant taken from `clock`
    pub async fn run_with_clock(&self, clock: &dyn ReferenceClock) -> ReportResult<Report> {
        self.run(clock.now()).await
    }

    /// Compute every store the source lists for the week before `reference`
    ///
    /// Fails only when the store list itself cannot be fetched. Per-store
    /// problems end up in the returned report.
    pub async fn run(&self, reference: Timestamp) -> ReportResult<Report> {
        let anchors = WindowAnchors::new(reference);
        let started = Instant::now();

        let store_ids = match self.source.list_stores(anchors.week_ago, reference).await {
            Ok(ids) => ids,
            Err(err) => {
                log::error!("Report for {reference} aborted: {err}");
                return Err(err.into());
            }
        };
        log::info!(
            "Listed {} stores for report at {reference} in {:?}",
            store_ids.len(),
            started.elapsed()
        );

        let compute_started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.pool_size));
        let mut handles = Vec::with_capacity(store_ids.len());

        for store_id in store_ids {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let engine = self.config.engine;
            let task_id = store_id.clone();

            let handle = tokio::spawn(async move {
                let outcome: StoreOutcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => compute_one(source.as_ref(), &task_id, anchors, &engine).await,
                    Err(_) => Err(StoreFailure::panicked(task_id.as_str(), "worker pool closed")),
                };
                outcome
            });
            handles.push((store_id, handle));
        }

        let mut report = Report::new(reference);
        for (store_id, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(StoreFailure::panicked(store_id.as_str(), join_message(err))),
            };
            if let Err(failure) = &outcome {
                log::warn!("{failure}");
            }
            report.record(store_id, outcome);
        }

        let failed = report.failures().count();
        log::info!(
            "Computed {} stores ({} failed) in {:?}",
            report.len(),
            failed,
            compute_started.elapsed()
        );
        Ok(report)
    }
}

async fn compute_one<S>(
    source: &S,
    store_id: &str,
    anchors: WindowAnchors,
    engine: &EngineConfig,
) -> StoreOutcome
where
    S: StoreDataSource + ?Sized,
{
    log::debug!("Loading store {store_id}");
    let mut input = source
        .load_store(store_id, anchors.week_ago, anchors.reference)
        .await
        .map_err(|err| StoreFailure::fetch(store_id, &err))?;

    let loaded = input.polls.len();
    input.polls.retain(|poll| anchors.covers(poll.timestamp));
    if input.polls.len() < loaded {
        log::warn!(
            "Store {store_id}: dropped {} polls outside {} .. {}",
            loaded - input.polls.len(),
            anchors.week_ago,
            anchors.reference
        );
    }

    let totals = calculate_store(&input, anchors, engine)
        .map_err(|err| StoreFailure::compute(store_id, &err))?;
    log::debug!("Computed store {store_id} from {} polls", input.polls.len());
    Ok(totals)
}

fn join_message(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        "task cancelled".to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_are_readable() {
        assert_eq!(panic_message(Box::new("boom")), "panicked: boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "panicked: bang");
        assert_eq!(panic_message(Box::new(42_u8)), "panicked");
    }

    #[test]
    fn zero_pool_is_rejected() {
        let source = Arc::new(crate::source::MemorySource::default());
        let config = ReportConfig::default().with_pool_size(0);
        assert!(ReportAggregator::new(source, config).is_err());
    }
}
