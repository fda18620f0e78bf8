//! Integration tests against the live candle services.
//!
//! All tests are `#[ignore]` because they require network access. Endpoints
//! come from `ORACLE_URL` / `STATS_URL` (a `.env` file works), falling back
//! to the production defaults.
//!
//! Run with:
//! ```bash
//! cargo test --test oracle_live -- --ignored
//! ```

#![cfg(feature = "http")]

use candlefeed_sdk::http::OracleHttp;
use candlefeed_sdk::prelude::*;

fn live_client() -> OracleHttp {
    dotenvy::dotenv().ok();
    let oracle_url =
        std::env::var("ORACLE_URL").unwrap_or_else(|_| DEFAULT_ORACLE_URL.to_string());
    let stats_url = std::env::var("STATS_URL").unwrap_or_else(|_| DEFAULT_STATS_URL.to_string());
    OracleHttp::new(&oracle_url, &stats_url)
}

#[tokio::test]
#[ignore]
async fn test_live_oracle_candles() {
    let bars = live_client()
        .fetch_oracle_candles("ETH", Resolution::Minute1, 10)
        .await
        .expect("oracle fetch should succeed");

    assert!(!bars.is_empty(), "expected at least one candle");
    // newest-first with sane OHLC
    for pair in bars.windows(2) {
        assert!(pair[0].time > pair[1].time, "candles should be newest-first");
    }
    for bar in &bars {
        assert!(bar.low <= bar.high, "low must not exceed high");
    }
}

#[tokio::test]
#[ignore]
async fn test_live_stats_candles() {
    let bars = live_client()
        .fetch_historical_stats(ARBITRUM, "ETH", Resolution::Hour1, 24)
        .await
        .expect("stats fetch should succeed");

    assert!(!bars.is_empty(), "expected at least one candle");
    for pair in bars.windows(2) {
        assert!(pair[0].time < pair[1].time, "candles should be oldest-first");
    }
}

#[tokio::test]
#[ignore]
async fn test_live_feed_end_to_end() {
    dotenvy::dotenv().ok();
    let feed = DataFeed::builder().build().expect("builder should succeed");
    let symbol = feed.resolve_symbol("ETH");

    let now = SystemClock.now_unix();
    let bars = feed
        .get_bars(
            &symbol,
            Resolution::Minute5,
            &PeriodParams {
                from: now - 3600,
                to: now,
                count_back: 12,
                first_data_request: true,
            },
        )
        .await
        .expect("get_bars should succeed");

    assert!(!bars.is_empty(), "expected at least one bar");
    for pair in bars.windows(2) {
        assert!(pair[0].time < pair[1].time, "bars should be oldest-first");
    }
}
