//! Candle domain — OHLC bars and the candle-source capability.

pub mod wire;

use async_trait::async_trait;

use crate::error::HttpError;
use crate::shared::time::floor_to_period;
use crate::shared::{ChainId, Resolution};

/// One OHLC candle for a fixed time bucket.
///
/// `time` is the bucket start in epoch seconds everywhere inside the feed;
/// conversion to the widget's milliseconds happens only at the boundary
/// (`shared::transform`).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    pub time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// External price-history capability.
///
/// Implemented by `http::OracleHttp` in production and by in-memory fakes in
/// tests. Both methods return bars for one symbol + resolution; the ordering
/// contract differs per source and is normalized by the adapter.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Most recent `count` candles from the oracle keeper, newest-first.
    async fn fetch_oracle_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        count: usize,
    ) -> Result<Vec<Bar>, HttpError>;

    /// Historical candles from the legacy stats service, oldest-first.
    async fn fetch_historical_stats(
        &self,
        chain: ChainId,
        symbol: &str,
        resolution: Resolution,
        count: usize,
    ) -> Result<Vec<Bar>, HttpError>;
}

/// Synthesize `count` flat unit-value bars ending at the candle boundary
/// containing `to`.
///
/// Stable (pegged) symbols chart as a constant 1; producing these locally
/// avoids a source round-trip entirely.
pub fn synthesize_flat_bars(to: u64, period_seconds: u64, count: usize) -> Vec<Bar> {
    let boundary = floor_to_period(to, period_seconds);
    (0..count)
        .map(|i| {
            let back = (count - 1 - i) as u64;
            Bar {
                time: boundary.saturating_sub(back * period_seconds),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
            }
        })
        .collect()
}
