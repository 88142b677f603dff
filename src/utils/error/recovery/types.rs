//! Types for error recovery

use crate::utils::error::MetricsError;
use std::time::Duration;

/// Retry configuration
///
/// The wait before retry `n` (zero-based) is `(2n + 1) * delay_unit`, so with the
/// default one-second unit the schedule is 1s, 3s, 5s, ...
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Linear backoff unit
    pub delay_unit: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_unit: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, delay_unit: Duration) -> Self {
        Self {
            max_retries,
            delay_unit,
        }
    }

    /// Delay before the zero-based retry `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.delay_unit.saturating_mul(2 * attempt + 1)
    }
}

/// Marker returned when a retry wait is interrupted by cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl From<Cancelled> for MetricsError {
    fn from(_: Cancelled) -> Self {
        MetricsError::Cancelled
    }
}
