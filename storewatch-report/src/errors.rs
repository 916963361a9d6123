//! Error types for report runs
//!
//! Two levels of failure exist:
//!
//! - [`ReportError`] aborts a whole run: bad configuration, a data source that
//!   cannot even list the stores, or output that cannot be written.
//! - [`StoreFailure`] is recorded next to one store's id in the report while
//!   every other store still completes.

use std::fmt;

use storewatch_core::ComputeError;
use thiserror::Error;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Failures raised by a [`StoreDataSource`](crate::source::StoreDataSource)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Store {store_id} not found")]
    UnknownStore { store_id: String },

    #[error("Malformed record for store {store_id}: {reason}")]
    Malformed { store_id: String, reason: String },
}

/// Run-level failures
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report configuration: {0}")]
    Config(String),

    #[error("Could not fetch store list: {0}")]
    Source(#[from] SourceError),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid batch document: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ComputeError> for ReportError {
    fn from(err: ComputeError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Stage at which a store failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Its inputs could not be loaded
    Fetch,
    /// The engine rejected its inputs
    Compute,
    /// The worker computing it panicked
    Panicked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => f.write_str("fetch"),
            Self::Compute => f.write_str("compute"),
            Self::Panicked => f.write_str("panicked"),
        }
    }
}

/// Failure marker kept in place of one store's result
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Store {store_id} failed during {kind}: {message}")]
pub struct StoreFailure {
    pub store_id: String,
    pub kind: FailureKind,
    pub message: String,
}

impl StoreFailure {
    pub fn fetch(store_id: impl Into<String>, err: &SourceError) -> Self {
        Self {
            store_id: store_id.into(),
            kind: FailureKind::Fetch,
            message: err.to_string(),
        }
    }

    pub fn compute(store_id: impl Into<String>, err: &ComputeError) -> Self {
        Self {
            store_id: store_id.into(),
            kind: FailureKind::Compute,
            message: err.to_string(),
        }
    }

    pub fn panicked(store_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            kind: FailureKind::Panicked,
            message: message.into(),
        }
    }
}
