//! Retry policy for the candle GET endpoints.
//!
//! Retries live here, below the adapter: the feed layer never retries, it
//! only reports (historical path) or skips a tick (subscription path). Both
//! candle endpoints are idempotent GETs, so the policy space is small.

use std::time::Duration;

/// Per-endpoint retry selection.
#[derive(Debug, Clone, Copy, Default)]
pub enum RetryPolicy {
    /// Fail on the first error.
    #[default]
    None,
    /// Retry transport failures and 429/502/503/504 with exponential
    /// backoff. The candle endpoints use this.
    Idempotent,
}

/// Backoff schedule for one retried request.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry attempts after the initial request.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each attempt.
    pub initial_delay: Duration,
    /// Ceiling for the per-attempt delay.
    pub max_delay: Duration,
    /// Spread each delay by ±25% to avoid synchronized retry storms.
    pub jitter: bool,
    /// Status codes worth retrying.
    pub retryable_statuses: Vec<u16>,
}

impl RetryConfig {
    /// The schedule for idempotent (GET) requests.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay before retry `attempt` (0-indexed): `initial * 2^attempt`,
    /// capped at `max_delay`, optionally jittered.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_ms = self
            .initial_delay
            .as_millis()
            .saturating_mul(1u128 << attempt.min(32)) as f64;
        let capped = base_ms.min(self.max_delay.as_millis() as f64);

        if !self.jitter {
            return Duration::from_millis(capped as u64);
        }

        let spread = (rand::random::<f64>() - 0.5) * 0.5 * capped;
        Duration::from_millis((capped + spread).max(0.0) as u64)
    }
}
