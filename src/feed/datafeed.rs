//! The `DataFeed` adapter — the sole integration point between the charting
//! widget contract and the candle sources.
//!
//! The adapter owns one `PauseableInterval` per live subscription, keyed by
//! the widget's listener id. Subscriptions are independent; the only shared
//! coordination is the injected visibility signal, which pauses and resumes
//! every timer at once. Historical fetches report errors once; subscription
//! ticks swallow them and skip the update, so a live pane never hard-fails
//! after initial load.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::candles::{synthesize_flat_bars, Bar, CandleSource};
use crate::domain::symbols::{self, SymbolInfo, ARBITRUM};
use crate::error::{FeedError, HttpError};
use crate::feed::interval::{PauseableInterval, TickContext};
use crate::feed::metrics::{MetricsEvent, MetricsSession};
use crate::feed::params::{MemoryParamsStore, ParamsStore, TvParams};
use crate::feed::visibility::PageVisibility;
use crate::shared::time::{current_candle_time, Clock, SystemClock};
use crate::shared::transform::{parse_symbol_name, to_chart_bar};
use crate::shared::{ChainId, ListenerId, ProductVersion, Resolution};

/// Default polling cadence for live subscriptions.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(1);

/// The widget's requested historical window.
#[derive(Debug, Clone, Copy)]
pub struct PeriodParams {
    pub from: u64,
    pub to: u64,
    pub count_back: usize,
    pub first_data_request: bool,
}

/// A memoized prefetch: the fetch task plus the parameters it was issued
/// with, so a later `get_bars` only reuses it on an exact match.
struct Prefetched {
    resolution: Resolution,
    count: usize,
    handle: JoinHandle<Result<Vec<Bar>, FeedError>>,
}

/// The chart data-feed adapter. Construct via [`DataFeed::builder`].
pub struct DataFeed {
    chain: ChainId,
    version: ProductVersion,
    update_interval: Duration,
    source: Arc<dyn CandleSource>,
    clock: Arc<dyn Clock>,
    params: Arc<dyn ParamsStore>,
    metrics: MetricsSession,
    subscriptions: Arc<Mutex<HashMap<ListenerId, PauseableInterval>>>,
    prefetched: Mutex<HashMap<String, Prefetched>>,
    visibility_task: Mutex<Option<JoinHandle<()>>>,
}

impl DataFeed {
    pub fn builder() -> DataFeedBuilder {
        DataFeedBuilder::default()
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    pub fn version(&self) -> ProductVersion {
        self.version
    }

    // ── Symbol resolution ────────────────────────────────────────────────

    /// Resolve a requested chart symbol. Never fails: a symbol without chart
    /// data falls back to the chain's native token with multiplier 1.
    pub fn resolve_symbol(&self, name_with_multiplier: &str) -> SymbolInfo {
        let parsed = parse_symbol_name(name_with_multiplier);
        let (symbol, visual_multiplier) = if symbols::is_chart_available(self.chain, &parsed.symbol)
        {
            (parsed.symbol, parsed.visual_multiplier)
        } else {
            debug!(
                requested = %parsed.symbol,
                "No chart data for symbol, falling back to native token"
            );
            (symbols::native_token(self.chain).symbol.to_string(), 1)
        };

        let token = symbols::token_by_symbol(self.chain, &symbol)
            .unwrap_or_else(|| symbols::native_token(self.chain));
        SymbolInfo::for_token(token, visual_multiplier)
    }

    // ── Historical bars ──────────────────────────────────────────────────

    /// Fetch historical bars for the requested window, oldest-first, already
    /// transformed for the widget (scaled, millisecond times).
    ///
    /// Over-fetches by the backfill offset between `to` and now, then trims
    /// bars past `to`. Stable symbols synthesize flat unit bars locally.
    pub async fn get_bars(
        &self,
        symbol_info: &SymbolInfo,
        resolution: Resolution,
        period: &PeriodParams,
    ) -> Result<Vec<Bar>, FeedError> {
        let load = self.metrics.load_started();
        let period_seconds = resolution.seconds();
        let now = self.clock.now_unix();
        let offset = (now.saturating_sub(period.to) / period_seconds) as usize;

        let result = if symbol_info.is_stable {
            Ok(synthesize_flat_bars(
                period.to,
                period_seconds,
                period.count_back,
            ))
        } else {
            self.fetch_candles(
                &symbol_info.name,
                resolution,
                period.count_back + offset,
                period.first_data_request,
            )
            .await
        };

        let bars = match result {
            Ok(bars) => bars,
            Err(e) => {
                self.metrics.load_failed(&load, &e.to_string());
                return Err(e);
            }
        };
        self.metrics.load_succeeded(&load);

        let out: Vec<Bar> = bars
            .into_iter()
            .take_while(|bar| bar.time <= period.to)
            .map(|bar| to_chart_bar(bar, symbol_info.visual_multiplier))
            .collect();

        self.params.save(
            self.chain,
            self.version,
            &TvParams {
                resolution,
                count_back: period.count_back,
            },
        );

        Ok(out)
    }

    // ── Live subscriptions ───────────────────────────────────────────────

    /// Start a live bar subscription under `listener_id`.
    ///
    /// One timer per call: subscriptions are keyed by listener identity, not
    /// by symbol/resolution, so two panes on the same pair poll separately.
    /// Requires a tokio runtime context.
    pub fn subscribe_bars(
        &self,
        symbol_info: &SymbolInfo,
        resolution: Resolution,
        on_tick: impl Fn(Bar) + Send + Sync + 'static,
        listener_id: ListenerId,
    ) {
        let source = self.source.clone();
        let clock = self.clock.clone();
        let chain = self.chain;
        let version = self.version;
        let symbol = symbol_info.name.clone();
        let is_stable = symbol_info.is_stable;
        let visual_multiplier = symbol_info.visual_multiplier;
        let on_tick = Arc::new(on_tick);

        let interval = PauseableInterval::new(
            None::<Bar>,
            self.update_interval,
            move |ctx: TickContext<Option<Bar>>| {
                let source = source.clone();
                let clock = clock.clone();
                let symbol = symbol.clone();
                let on_tick = on_tick.clone();
                Box::pin(async move {
                    let last = ctx.last_returned_value;
                    let period_seconds = resolution.seconds();
                    let now = clock.now_unix();
                    let count = candles_to_fetch(
                        ctx.was_paused_since_last_call,
                        last.map(|bar| bar.time),
                        now,
                        period_seconds,
                    );

                    let fetched = if is_stable {
                        Ok(synthesize_flat_bars(now, period_seconds, count))
                    } else {
                        fetch_from_source(
                            source.as_ref(),
                            version,
                            chain,
                            &symbol,
                            resolution,
                            count,
                        )
                        .await
                    };

                    let bars = match fetched {
                        Ok(bars) => bars,
                        Err(e) => {
                            warn!(symbol = %symbol, error = %e, "Candle fetch failed, skipping tick");
                            return last;
                        }
                    };

                    // Strictly-greater-than filter against the advancing last
                    // delivered time: deduplication and ordering guard in one.
                    let mut new_last = last;
                    for bar in bars {
                        if let Some(prev) = &new_last {
                            if bar.time <= prev.time {
                                continue;
                            }
                        }
                        on_tick(to_chart_bar(bar, visual_multiplier));
                        new_last = Some(bar);
                    }
                    new_last
                })
            },
        );

        let mut subs = self.subscriptions.lock().unwrap();
        if let Some(old) = subs.insert(listener_id.clone(), interval) {
            debug!(listener = %listener_id, "Replacing existing subscription");
            old.destroy();
        }
    }

    /// Tear down the subscription registered under `listener_id`.
    ///
    /// Precondition: the id came from a prior `subscribe_bars`. An unknown
    /// id is caller misuse; it is logged and ignored.
    pub fn unsubscribe_bars(&self, listener_id: &ListenerId) {
        match self.subscriptions.lock().unwrap().remove(listener_id) {
            Some(interval) => interval.destroy(),
            None => warn!(listener = %listener_id, "Unsubscribe for unknown listener id"),
        }
    }

    /// Pause every live subscription (page hidden).
    pub fn pause_all(&self) {
        debug!("Pausing all subscriptions");
        for interval in self.subscriptions.lock().unwrap().values() {
            interval.pause();
        }
    }

    /// Resume every live subscription (page visible again).
    pub fn resume_all(&self) {
        debug!("Resuming all subscriptions");
        for interval in self.subscriptions.lock().unwrap().values() {
            interval.resume();
        }
    }

    // ── Prefetch ─────────────────────────────────────────────────────────

    /// Start fetching bars for `symbol` using the last-used cached
    /// parameters, before the widget asks. No-op on a cache miss, an
    /// unsupported cached resolution, or an already-pending prefetch.
    /// Requires a tokio runtime context.
    pub fn prefetch_bars(&self, symbol: &str) {
        let mut prefetched = self.prefetched.lock().unwrap();
        if prefetched.contains_key(symbol) {
            return;
        }

        let Some(params) = self.params.load(self.chain, self.version) else {
            return;
        };
        if !self.version.supports(params.resolution) {
            debug!(resolution = %params.resolution, "Cached resolution unsupported, skipping prefetch");
            return;
        }

        let source = self.source.clone();
        let chain = self.chain;
        let version = self.version;
        let sym = symbol.to_string();
        let resolution = params.resolution;
        let count = params.count_back;
        let handle = tokio::spawn(async move {
            fetch_from_source(source.as_ref(), version, chain, &sym, resolution, count)
                .await
                .map_err(FeedError::from)
        });

        debug!(symbol, %resolution, count, "Prefetching bars");
        prefetched.insert(
            symbol.to_string(),
            Prefetched {
                resolution,
                count,
                handle,
            },
        );
    }

    /// Fetch candles for the historical path, consuming a matching prefetch
    /// if this is the widget's first data request for the symbol.
    async fn fetch_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        count: usize,
        is_first_fetch: bool,
    ) -> Result<Vec<Bar>, FeedError> {
        if is_first_fetch {
            let entry = self.prefetched.lock().unwrap().remove(symbol);
            if let Some(entry) = entry {
                if entry.resolution == resolution && entry.count == count {
                    debug!(symbol, "Reusing prefetched bars");
                    return entry
                        .handle
                        .await
                        .map_err(|e| FeedError::Prefetch(e.to_string()))?;
                }
                // one-shot: a mismatched prefetch is discarded, not kept
                entry.handle.abort();
            }
        }

        fetch_from_source(
            self.source.as_ref(),
            self.version,
            self.chain,
            symbol,
            resolution,
            count,
        )
        .await
        .map_err(FeedError::from)
    }

    // ── Teardown ─────────────────────────────────────────────────────────

    /// Tear down every subscription, pending prefetch, and the visibility
    /// listener. The adapter is not reusable afterward.
    pub fn destroy(&self) {
        debug!("Destroying datafeed");
        for (_, interval) in self.subscriptions.lock().unwrap().drain() {
            interval.destroy();
        }
        for (_, prefetched) in self.prefetched.lock().unwrap().drain() {
            prefetched.handle.abort();
        }
        if let Some(task) = self.visibility_task.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl Drop for DataFeed {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ─── Tick sizing ─────────────────────────────────────────────────────────────

/// How many candles a subscription tick should request.
///
/// Default 1 (only the newest bar can have changed); 2 when a new candle has
/// opened since the last emitted bar or when resuming from a short pause;
/// `ceil(gap / period)` when resuming from a pause longer than one period,
/// so the whole gap is covered.
pub(crate) fn candles_to_fetch(
    was_paused: bool,
    last_bar_time: Option<u64>,
    now: u64,
    period_seconds: u64,
) -> usize {
    let boundary = current_candle_time(now, period_seconds);
    match last_bar_time {
        Some(last) if was_paused => {
            let gap = now.abs_diff(last);
            if gap > period_seconds {
                gap.div_ceil(period_seconds) as usize
            } else {
                2
            }
        }
        None if was_paused => 2,
        Some(last) if last < boundary => 2,
        _ => 1,
    }
}

/// Route a fetch to the version-appropriate source and normalize ordering to
/// oldest-first.
async fn fetch_from_source(
    source: &dyn CandleSource,
    version: ProductVersion,
    chain: ChainId,
    symbol: &str,
    resolution: Resolution,
    count: usize,
) -> Result<Vec<Bar>, HttpError> {
    match version {
        ProductVersion::V1 => {
            source
                .fetch_historical_stats(chain, symbol, resolution, count)
                .await
        }
        ProductVersion::V2 => {
            // the oracle returns newest-first
            let mut bars = source.fetch_oracle_candles(symbol, resolution, count).await?;
            bars.reverse();
            Ok(bars)
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DataFeedBuilder {
    chain: ChainId,
    version: ProductVersion,
    update_interval: Duration,
    oracle_url: String,
    stats_url: String,
    source: Option<Arc<dyn CandleSource>>,
    clock: Arc<dyn Clock>,
    params: Option<Arc<dyn ParamsStore>>,
    metrics_sink: Option<mpsc::UnboundedSender<MetricsEvent>>,
    visibility: Option<watch::Receiver<PageVisibility>>,
}

impl Default for DataFeedBuilder {
    fn default() -> Self {
        Self {
            chain: ARBITRUM,
            version: ProductVersion::V2,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            oracle_url: crate::network::DEFAULT_ORACLE_URL.to_string(),
            stats_url: crate::network::DEFAULT_STATS_URL.to_string(),
            source: None,
            clock: Arc::new(SystemClock),
            params: None,
            metrics_sink: None,
            visibility: None,
        }
    }
}

impl DataFeedBuilder {
    pub fn chain(mut self, chain: ChainId) -> Self {
        self.chain = chain;
        self
    }

    pub fn version(mut self, version: ProductVersion) -> Self {
        self.version = version;
        self
    }

    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn oracle_url(mut self, url: &str) -> Self {
        self.oracle_url = url.to_string();
        self
    }

    pub fn stats_url(mut self, url: &str) -> Self {
        self.stats_url = url.to_string();
        self
    }

    /// Substitute the candle source (tests, alternative transports).
    pub fn source(mut self, source: Arc<dyn CandleSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn params_store(mut self, store: Arc<dyn ParamsStore>) -> Self {
        self.params = Some(store);
        self
    }

    pub fn metrics_sink(mut self, sink: mpsc::UnboundedSender<MetricsEvent>) -> Self {
        self.metrics_sink = Some(sink);
        self
    }

    /// Attach the host's page-visibility signal. When set, `build` spawns a
    /// listener task (requires a tokio runtime context) that pauses all
    /// subscriptions on hidden and resumes them on visible.
    pub fn visibility(mut self, receiver: watch::Receiver<PageVisibility>) -> Self {
        self.visibility = Some(receiver);
        self
    }

    pub fn build(self) -> Result<DataFeed, FeedError> {
        let source: Arc<dyn CandleSource> = match self.source {
            Some(source) => source,
            None => {
                #[cfg(feature = "http")]
                {
                    Arc::new(crate::http::OracleHttp::new(&self.oracle_url, &self.stats_url))
                }
                #[cfg(not(feature = "http"))]
                {
                    return Err(FeedError::Other(
                        "no candle source configured and the http feature is disabled".to_string(),
                    ));
                }
            }
        };

        let subscriptions: Arc<Mutex<HashMap<ListenerId, PauseableInterval>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let visibility_task = self.visibility.map(|mut rx| {
            let subs = subscriptions.clone();
            tokio::spawn(async move {
                while rx.changed().await.is_ok() {
                    let state = *rx.borrow_and_update();
                    let subs = subs.lock().unwrap();
                    match state {
                        PageVisibility::Hidden => {
                            debug!("Page hidden, pausing all subscriptions");
                            for interval in subs.values() {
                                interval.pause();
                            }
                        }
                        PageVisibility::Visible => {
                            debug!("Page visible, resuming all subscriptions");
                            for interval in subs.values() {
                                interval.resume();
                            }
                        }
                    }
                }
            })
        });

        Ok(DataFeed {
            chain: self.chain,
            version: self.version,
            update_interval: self.update_interval,
            source,
            clock: self.clock,
            params: self
                .params
                .unwrap_or_else(|| Arc::new(MemoryParamsStore::new())),
            metrics: MetricsSession::new(self.metrics_sink),
            subscriptions,
            prefetched: Mutex::new(HashMap::new()),
            visibility_task: Mutex::new(visibility_task),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candles_to_fetch_default_is_one() {
        // last bar sits in the current candle bucket
        assert_eq!(candles_to_fetch(false, Some(120), 130, 60), 1);
        // no last bar yet
        assert_eq!(candles_to_fetch(false, None, 130, 60), 1);
    }

    #[test]
    fn test_candles_to_fetch_new_candle_opened() {
        // last bar is before the current boundary (120)
        assert_eq!(candles_to_fetch(false, Some(60), 130, 60), 2);
    }

    #[test]
    fn test_candles_to_fetch_short_pause() {
        // paused but the gap is within one period
        assert_eq!(candles_to_fetch(true, Some(100), 130, 60), 2);
        // paused with no prior bar
        assert_eq!(candles_to_fetch(true, None, 130, 60), 2);
    }

    #[test]
    fn test_candles_to_fetch_long_pause_covers_gap() {
        // 5 full minutes of gap at 1m resolution
        assert_eq!(candles_to_fetch(true, Some(300), 600, 60), 5);
        // partial trailing period rounds up
        assert_eq!(candles_to_fetch(true, Some(300), 610, 60), 6);
    }
}
