//! The feed layer: the chart data-feed adapter and its runtime plumbing.
//!
//! [`DataFeed`] is the core async adapter; [`CallbackDataFeed`] wraps it in
//! the widget's callback contract. The rest of the layer is the machinery
//! the adapter runs on: pausable per-subscription timers, the injected
//! page-visibility signal, the last-used parameters cache, and per-session
//! load metrics.

pub mod contract;
pub mod datafeed;
pub mod interval;
pub mod metrics;
pub mod params;
pub mod visibility;

pub use contract::{CallbackDataFeed, DatafeedConfiguration};
pub use datafeed::{DataFeed, DataFeedBuilder, PeriodParams, DEFAULT_UPDATE_INTERVAL};
pub use interval::{PauseableInterval, TickContext};
pub use metrics::{LoadContext, MetricsEvent, MetricsSession};
pub use params::{FileParamsStore, MemoryParamsStore, ParamsStore, TvParams};
pub use visibility::{PageVisibility, VisibilitySignal};
