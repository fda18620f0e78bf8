//! Per-adapter load metrics.
//!
//! First-load flags and timers are instance state (one session per adapter)
//! rather than process globals, so parallel adapters and tests never bleed
//! into each other. Events go to an optional sink channel; hosts that do not
//! care simply never attach one.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::mpsc;

/// Events describing the candle-load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsEvent {
    CandlesLoadStarted {
        request_id: String,
        is_first_load: bool,
    },
    CandlesLoadSuccess {
        request_id: String,
        is_first_load: bool,
        elapsed_ms: u64,
    },
    CandlesLoadFailed {
        request_id: String,
        is_first_load: bool,
        error: String,
    },
    CandlesDisplayFailed {
        request_id: String,
    },
}

/// Correlation handle for one historical load. Owns its own start instant
/// so overlapping loads time independently.
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub request_id: String,
    pub is_first_load: bool,
    started_at: Instant,
}

/// One adapter's metrics state.
pub struct MetricsSession {
    sink: Option<mpsc::UnboundedSender<MetricsEvent>>,
    first_load: AtomicBool,
}

impl MetricsSession {
    pub fn new(sink: Option<mpsc::UnboundedSender<MetricsEvent>>) -> Self {
        Self {
            sink,
            first_load: AtomicBool::new(true),
        }
    }

    /// Record the start of a historical load and hand back its correlation
    /// context. The first call per session is flagged as the first load.
    pub fn load_started(&self) -> LoadContext {
        let is_first_load = self.first_load.swap(false, Ordering::SeqCst);
        let ctx = LoadContext {
            request_id: request_id(),
            is_first_load,
            started_at: Instant::now(),
        };
        self.push(MetricsEvent::CandlesLoadStarted {
            request_id: ctx.request_id.clone(),
            is_first_load,
        });
        ctx
    }

    pub fn load_succeeded(&self, ctx: &LoadContext) {
        let elapsed_ms = ctx.started_at.elapsed().as_millis() as u64;
        self.push(MetricsEvent::CandlesLoadSuccess {
            request_id: ctx.request_id.clone(),
            is_first_load: ctx.is_first_load,
            elapsed_ms,
        });
    }

    pub fn load_failed(&self, ctx: &LoadContext, error: &str) {
        self.push(MetricsEvent::CandlesLoadFailed {
            request_id: ctx.request_id.clone(),
            is_first_load: ctx.is_first_load,
            error: error.to_string(),
        });
        self.push(MetricsEvent::CandlesDisplayFailed {
            request_id: ctx.request_id.clone(),
        });
    }

    fn push(&self, event: MetricsEvent) {
        tracing::debug!(?event, "feed metrics");
        if let Some(sink) = &self.sink {
            let _ = sink.send(event);
        }
    }
}

/// Short random correlation id for one load.
fn request_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_flag_is_consumed_once() {
        let session = MetricsSession::new(None);
        assert!(session.load_started().is_first_load);
        assert!(!session.load_started().is_first_load);
        assert!(!session.load_started().is_first_load);
    }

    #[tokio::test]
    async fn test_events_reach_the_sink_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = MetricsSession::new(Some(tx));

        let ctx = session.load_started();
        session.load_succeeded(&ctx);

        let ctx2 = session.load_started();
        session.load_failed(&ctx2, "boom");

        match rx.recv().await.unwrap() {
            MetricsEvent::CandlesLoadStarted { is_first_load, .. } => assert!(is_first_load),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            MetricsEvent::CandlesLoadSuccess { .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            MetricsEvent::CandlesLoadStarted { is_first_load: false, .. }
        ));
        match rx.recv().await.unwrap() {
            MetricsEvent::CandlesLoadFailed { error, .. } => assert_eq!(error, "boom"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            MetricsEvent::CandlesDisplayFailed { .. }
        ));
    }

    #[test]
    fn test_overlapping_loads_time_independently() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = MetricsSession::new(Some(tx));

        let first = session.load_started();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let second = session.load_started();
        session.load_succeeded(&first);
        session.load_succeeded(&second);

        let mut elapsed = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let MetricsEvent::CandlesLoadSuccess { elapsed_ms, .. } = event {
                elapsed.push(elapsed_ms);
            }
        }
        assert_eq!(elapsed.len(), 2);
        assert!(elapsed[0] >= 20, "first load spans the full wait, got {}ms", elapsed[0]);
        assert!(
            elapsed[0] > elapsed[1],
            "first load ({}ms) started before the second ({}ms)",
            elapsed[0],
            elapsed[1]
        );
    }

    #[test]
    fn test_request_ids_are_unique_enough() {
        let a = request_id();
        let b = request_id();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }
}
