//! Page-visibility capability.
//!
//! Background browser tabs throttle timers unpredictably, so the host pauses
//! the feed while hidden and resumes on return; the resume path triggers the
//! gap-aware backfill in the subscription timer. The signal is injected so
//! the adapter can be tested without a real page host.

use tokio::sync::watch;

/// Whether the hosting page is currently visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageVisibility {
    #[default]
    Visible,
    Hidden,
}

/// Producer half of the visibility signal.
///
/// The host owns one of these and calls `set` from its visibility-change
/// hook; the adapter subscribes via `subscribe()`.
#[derive(Debug)]
pub struct VisibilitySignal {
    tx: watch::Sender<PageVisibility>,
}

impl VisibilitySignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(PageVisibility::Visible);
        Self { tx }
    }

    pub fn set(&self, visibility: PageVisibility) {
        // send_replace never fails even with no receivers
        self.tx.send_replace(visibility);
    }

    pub fn hidden(&self) {
        self.set(PageVisibility::Hidden);
    }

    pub fn visible(&self) {
        self.set(PageVisibility::Visible);
    }

    pub fn subscribe(&self) -> watch::Receiver<PageVisibility> {
        self.tx.subscribe()
    }
}

impl Default for VisibilitySignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let signal = VisibilitySignal::new();
        let mut rx = signal.subscribe();
        assert_eq!(*rx.borrow(), PageVisibility::Visible);

        signal.hidden();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), PageVisibility::Hidden);

        signal.visible();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), PageVisibility::Visible);
    }
}
