//! # Candlefeed SDK
//!
//! A Rust data-feed adapter bridging a pull-based charting widget to
//! poll-based candle sources.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared newtypes, candle and symbol domain models
//! 2. **HTTP** — `OracleHttp` candle source with per-endpoint retry policies
//! 3. **Feed** — `DataFeed` with pausable per-subscription polling, prefetch
//!    memoization, and the widget callback facade
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use candlefeed_sdk::prelude::*;
//!
//! let feed = DataFeed::builder()
//!     .chain(ARBITRUM)
//!     .version(ProductVersion::V2)
//!     .build()?;
//!
//! let symbol = feed.resolve_symbol("PEPE*1000");
//! let bars = feed.get_bars(&symbol, Resolution::Minute5, &period).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): candles, symbols, wire types.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP ────────────────────────────────────────────────────────────

/// HTTP candle source with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: Feed ────────────────────────────────────────────────────────────

/// `DataFeed` — the primary entry point.
pub mod feed;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{ChainId, ListenerId, ProductVersion, Resolution};

    // Domain types — candles
    pub use crate::domain::candles::{Bar, CandleSource};

    // Domain types — symbols
    pub use crate::domain::symbols::{SymbolInfo, ARBITRUM, AVALANCHE};

    // Clock + time helpers
    pub use crate::shared::time::{Clock, SystemClock};

    // Errors
    pub use crate::error::{FeedError, HttpError};

    // Network
    pub use crate::network::{DEFAULT_ORACLE_URL, DEFAULT_STATS_URL};

    // Feed
    pub use crate::feed::{
        CallbackDataFeed, DataFeed, DataFeedBuilder, DatafeedConfiguration, FileParamsStore,
        MemoryParamsStore, MetricsEvent, PageVisibility, ParamsStore, PauseableInterval,
        PeriodParams, TickContext, TvParams, VisibilitySignal, DEFAULT_UPDATE_INTERVAL,
    };

    // HTTP source
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
    #[cfg(feature = "http")]
    pub use crate::http::OracleHttp;
}
