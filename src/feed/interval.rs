//! Pausable repeating timer — `PauseableInterval`.
//!
//! A single background tokio task owns the cadence and the tick state. Ticks
//! are serialized: the interval re-arms only after the previous tick's future
//! resolves, so one subscription can never have overlapping ticks. Pausing
//! disables future ticks without cancelling an in-flight one and sets a flag
//! the next tick observes; resuming re-arms the interval.

use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What a tick handler sees about the interval's state.
#[derive(Debug, Clone)]
pub struct TickContext<T> {
    /// True if `pause()` was called since the previous tick ran.
    pub was_paused_since_last_call: bool,
    /// The value returned by the previous tick (the initial value on the
    /// first tick).
    pub last_returned_value: T,
}

enum Command {
    Pause,
    Resume,
}

/// A repeating timer whose tick handler carries typed state from tick to
/// tick. The handle owns the background task; dropping it (or calling
/// `destroy`) aborts the task permanently.
pub struct PauseableInterval {
    cmd_tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl PauseableInterval {
    /// Start the interval. Requires a tokio runtime context.
    ///
    /// `tick` receives the previous tick's return value and the paused flag,
    /// and returns the new state value.
    pub fn new<T, F>(initial: T, period: Duration, mut tick: F) -> Self
    where
        T: Clone + Send + 'static,
        F: FnMut(TickContext<T>) -> BoxFuture<'static, T> + Send + 'static,
    {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut last = initial;
            let mut paused = false;
            let mut was_paused = false;

            loop {
                tokio::select! {
                    cmd = cmd_rx.recv() => match cmd {
                        Some(Command::Pause) => {
                            paused = true;
                            was_paused = true;
                        }
                        Some(Command::Resume) => {
                            paused = false;
                        }
                        // handle dropped
                        None => break,
                    },
                    _ = tokio::time::sleep(period), if !paused => {
                        let ctx = TickContext {
                            was_paused_since_last_call: was_paused,
                            last_returned_value: last.clone(),
                        };
                        was_paused = false;
                        last = tick(ctx).await;
                    }
                }
            }
        });

        Self { cmd_tx, task }
    }

    /// Halt future ticks. Does not cancel an in-flight tick; the next tick
    /// after `resume()` sees `was_paused_since_last_call = true`.
    pub fn pause(&self) {
        let _ = self.cmd_tx.send(Command::Pause);
    }

    /// Re-arm the interval.
    pub fn resume(&self) {
        let _ = self.cmd_tx.send(Command::Resume);
    }

    /// Stop the interval permanently. An in-flight tick is dropped at its
    /// next await point and its result discarded.
    pub fn destroy(self) {
        // Drop runs and aborts the task.
    }
}

impl Drop for PauseableInterval {
    fn drop(&mut self) {
        self.task.abort();
    }
}
