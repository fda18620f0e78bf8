//! Callback-style facade over [`DataFeed`] matching the charting widget's
//! pull contract.
//!
//! The widget speaks in callbacks and resolution strings ("1", "60", "1D");
//! everything behind this module is async and typed. Results are delivered
//! by spawned tasks, so the widget never blocks the caller.

use std::sync::Arc;

use tracing::debug;

use crate::domain::candles::Bar;
use crate::domain::symbols::SymbolInfo;
use crate::feed::datafeed::{DataFeed, PeriodParams};
use crate::shared::{ListenerId, Resolution};

/// Capabilities reported to the widget during the ready handshake.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatafeedConfiguration {
    pub supported_resolutions: Vec<String>,
    pub supports_marks: bool,
    pub supports_timescale_marks: bool,
    pub supports_time: bool,
    /// How long the widget keeps stale bars before re-requesting, in ms.
    pub reset_cache_timeout: u32,
}

/// The widget-facing adapter. Holds the async [`DataFeed`] and translates
/// each contract call into it. Requires a tokio runtime context.
#[derive(Clone)]
pub struct CallbackDataFeed {
    inner: Arc<DataFeed>,
}

impl CallbackDataFeed {
    pub fn new(inner: Arc<DataFeed>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Arc<DataFeed> {
        &self.inner
    }

    /// Ready handshake: report the resolutions the product version serves.
    pub fn on_ready(&self, callback: impl FnOnce(DatafeedConfiguration) + Send + 'static) {
        let configuration = DatafeedConfiguration {
            supported_resolutions: self
                .inner
                .version()
                .supported_resolutions()
                .iter()
                .map(|r| r.as_tv().to_string())
                .collect(),
            supports_marks: false,
            supports_timescale_marks: false,
            supports_time: true,
            reset_cache_timeout: 100,
        };
        callback(configuration);
    }

    /// Symbol search is not served; the widget always gets an empty result.
    pub fn search_symbols(
        &self,
        _user_input: &str,
        on_result: impl FnOnce(Vec<SymbolInfo>) + Send + 'static,
    ) {
        on_result(Vec::new());
    }

    /// Resolve is infallible (unknown symbols fall back to the native
    /// token), so only the success callback exists.
    pub fn resolve_symbol(
        &self,
        symbol_name: &str,
        on_resolve: impl FnOnce(SymbolInfo) + Send + 'static,
    ) {
        on_resolve(self.inner.resolve_symbol(symbol_name));
    }

    /// Historical window request. `resolution` is the widget's string form;
    /// an unknown resolution reports through `on_error`.
    pub fn get_bars(
        &self,
        symbol_info: &SymbolInfo,
        resolution: &str,
        period: PeriodParams,
        on_history: impl FnOnce(Vec<Bar>, bool) + Send + 'static,
        on_error: impl FnOnce(String) + Send + 'static,
    ) {
        let Some(resolution) = Resolution::from_tv(resolution) else {
            on_error(format!("unsupported resolution: {resolution}"));
            return;
        };

        let inner = self.inner.clone();
        let symbol_info = symbol_info.clone();
        tokio::spawn(async move {
            match inner.get_bars(&symbol_info, resolution, &period).await {
                Ok(bars) => {
                    let no_data = bars.is_empty();
                    on_history(bars, no_data);
                }
                Err(e) => on_error(e.to_string()),
            }
        });
    }

    /// Live subscription. An unknown resolution string is dropped with a log
    /// line; the contract has no error channel here.
    pub fn subscribe_bars(
        &self,
        symbol_info: &SymbolInfo,
        resolution: &str,
        on_tick: impl Fn(Bar) + Send + Sync + 'static,
        listener_id: ListenerId,
    ) {
        let Some(resolution) = Resolution::from_tv(resolution) else {
            debug!(resolution, "Ignoring subscription with unsupported resolution");
            return;
        };
        self.inner
            .subscribe_bars(symbol_info, resolution, on_tick, listener_id);
    }

    pub fn unsubscribe_bars(&self, listener_id: &ListenerId) {
        self.inner.unsubscribe_bars(listener_id);
    }
}
