//! Shared adaptive delay.
//!
//! Every worker sleeps for [`RateController::current_delay`] before each probe
//! and reports the outcome afterwards. Failures double the delay, successes
//! shrink it by a fifth, and the value is clamped to the configured bounds.
//! One controller is shared by the whole pool, so a failure seen by any
//! worker slows every worker down.

use idsweep_core::RateConfig;
use std::time::Duration;
use tokio::sync::RwLock;

/// Multiplicative increase/decrease controller for inter-request spacing.
#[derive(Debug)]
pub struct RateController {
    delay_ms: RwLock<u64>,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl RateController {
    /// Create a controller starting at `initial_delay_ms`.
    ///
    /// The initial value is clamped into `[min_delay_ms, max_delay_ms]`.
    #[must_use]
    pub fn new(config: RateConfig) -> Self {
        let initial = config
            .initial_delay_ms
            .clamp(config.min_delay_ms, config.max_delay_ms.max(config.min_delay_ms));
        Self {
            delay_ms: RwLock::new(initial),
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms.max(config.min_delay_ms),
        }
    }

    /// Current delay in milliseconds.
    pub async fn current_delay_ms(&self) -> u64 {
        *self.delay_ms.read().await
    }

    /// Current delay.
    pub async fn current_delay(&self) -> Duration {
        Duration::from_millis(self.current_delay_ms().await)
    }

    /// Adjust the delay after a probe outcome and return the new value.
    pub async fn report_outcome(&self, success: bool) -> u64 {
        let mut delay = self.delay_ms.write().await;
        let previous = *delay;
        *delay = if success {
            self.decreased(previous)
        } else {
            self.increased(previous)
        };
        tracing::trace!(success, previous, current = *delay, "rate adjusted");
        *delay
    }

    fn decreased(&self, delay: u64) -> u64 {
        (delay / 5 * 4 + delay % 5 * 4 / 5).max(self.min_delay_ms)
    }

    fn increased(&self, delay: u64) -> u64 {
        delay.saturating_mul(2).min(self.max_delay_ms)
    }
}
