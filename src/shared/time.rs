//! Wall-clock access and candle-boundary arithmetic.
//!
//! The adapter's gap and backfill math depends on "now"; routing it through
//! the `Clock` trait lets tests drive that math deterministically while
//! production code uses the system clock.

use std::sync::Arc;

/// Source of the current unix time in seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

impl Clock for Arc<dyn Clock> {
    fn now_unix(&self) -> u64 {
        (**self).now_unix()
    }
}

/// Floor a timestamp to the start of its candle bucket.
pub fn floor_to_period(ts: u64, period_seconds: u64) -> u64 {
    (ts / period_seconds) * period_seconds
}

/// Start of the candle bucket containing `now` (the "current candle boundary").
pub fn current_candle_time(now: u64, period_seconds: u64) -> u64 {
    floor_to_period(now, period_seconds)
}
