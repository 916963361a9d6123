//! Engine configuration
//!
//! The estimation components are pure functions of their inputs plus this
//! value. It is built once per report and passed down explicitly.

use chrono::Duration;
use chrono_tz::Tz;

use crate::constants::{DEFAULT_INTERPOLATION_OFFSET_MINUTES, DEFAULT_TIMEZONE};
use crate::errors::{ComputeError, ComputeResult};
use crate::window::Window;

/// Parameters of the uptime estimation
///
/// ## Example
///
/// ```rust
/// use chrono::Duration;
/// use storewatch_core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_interpolation_offset(Duration::minutes(10))
///     .with_default_timezone(chrono_tz::America::New_York);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Time attributed to the `inactive` side of an observed status change
    pub interpolation_offset: Duration,
    /// Timezone for stores that have none on record
    pub default_timezone: Tz,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interpolation_offset: Duration::minutes(DEFAULT_INTERPOLATION_OFFSET_MINUTES),
            default_timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl EngineConfig {
    /// Set the interpolation offset
    pub fn with_interpolation_offset(mut self, offset: Duration) -> Self {
        self.interpolation_offset = offset;
        self
    }

    /// Set the fallback timezone
    pub fn with_default_timezone(mut self, tz: Tz) -> Self {
        self.default_timezone = tz;
        self
    }

    /// Reject parameters the interpolator cannot work with
    pub fn validate(&self) -> ComputeResult<()> {
        if self.interpolation_offset <= Duration::zero() {
            return Err(ComputeError::InvalidConfig {
                reason: "interpolation offset must be positive",
            });
        }
        if self.interpolation_offset > Window::Week.length() {
            return Err(ComputeError::InvalidConfig {
                reason: "interpolation offset must not exceed the week window",
            });
        }
        Ok(())
    }
}
