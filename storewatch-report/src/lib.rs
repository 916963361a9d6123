//! Report layer for StoreWatch
//!
//! Feeds the estimation engine from a [`StoreDataSource`], computes stores in
//! parallel with a bounded worker pool and renders the finished [`Report`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use storewatch_report::{MemorySource, ReportAggregator, ReportBatch, ReportConfig};
//!
//! # async fn demo() -> storewatch_report::ReportResult<()> {
//! let batch = ReportBatch::from_path("batch.json")?;
//! let reference = batch.reference.unwrap_or_else(chrono::Utc::now);
//! let aggregator = ReportAggregator::new(Arc::new(MemorySource::new(batch)), ReportConfig::default())?;
//!
//! let report = aggregator.run(reference).await?;
//! storewatch_report::write_csv(&report, std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod output;
pub mod report;
pub mod source;

pub use aggregator::ReportAggregator;
pub use config::ReportConfig;
pub use errors::{FailureKind, ReportError, ReportResult, SourceError, StoreFailure};
pub use output::{write_csv, write_csv_file};
pub use report::{Report, StoreOutcome};
pub use source::{
    BusinessHoursRecord, MemorySource, ReportBatch, StoreDataSource, StoreRecord,
};
