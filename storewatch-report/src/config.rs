//! Report run configuration
//!
//! Built explicitly by callers, or read once from the environment by the
//! binary. Nothing below the report layer looks at the environment.

use std::env;

use chrono::Duration;
use chrono_tz::Tz;
use storewatch_core::constants::DEFAULT_POOL_SIZE;
use storewatch_core::EngineConfig;
use tokio::sync::Semaphore;

use crate::errors::{ReportError, ReportResult};

/// Worker pool size
pub const ENV_POOL_SIZE: &str = "STOREWATCH_POOL_SIZE";
/// Interpolation offset in whole minutes
pub const ENV_OFFSET_MINUTES: &str = "STOREWATCH_INTERPOLATION_OFFSET_MINUTES";
/// IANA timezone for stores without one
pub const ENV_DEFAULT_TIMEZONE: &str = "STOREWATCH_DEFAULT_TIMEZONE";

/// Parameters of one report run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportConfig {
    /// Maximum number of stores computed concurrently
    pub pool_size: usize,
    /// Parameters passed to every store's calculation
    pub engine: EngineConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            engine: EngineConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn new(pool_size: usize, engine: EngineConfig) -> Self {
        Self { pool_size, engine }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Defaults overridden by any `STOREWATCH_*` variables that are set
    pub fn from_env() -> ReportResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup
    pub fn from_lookup<F>(lookup: F) -> ReportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_POOL_SIZE) {
            config.pool_size = raw.trim().parse().map_err(|_| {
                ReportError::Config(format!("{ENV_POOL_SIZE} is not a count: '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_OFFSET_MINUTES) {
            let minutes: i64 = raw.trim().parse().map_err(|_| {
                ReportError::Config(format!("{ENV_OFFSET_MINUTES} is not a minute count: '{raw}'"))
            })?;
            let offset = Duration::try_minutes(minutes).ok_or_else(|| {
                ReportError::Config(format!("{ENV_OFFSET_MINUTES} is out of range: '{raw}'"))
            })?;
            config.engine = config.engine.with_interpolation_offset(offset);
        }
        if let Some(raw) = lookup(ENV_DEFAULT_TIMEZONE) {
            let tz: Tz = raw.trim().parse().map_err(|_| {
                ReportError::Config(format!("{ENV_DEFAULT_TIMEZONE} is not a timezone: '{raw}'"))
            })?;
            config.engine = config.engine.with_default_timezone(tz);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.pool_size == 0 {
            return Err(ReportError::Config("pool size must be at least 1".into()));
        }
        if self.pool_size > Semaphore::MAX_PERMITS {
            return Err(ReportError::Config(format!(
                "pool size must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        self.engine.validate()?;
        Ok(())
    }
}
