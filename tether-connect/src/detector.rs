//! Detects when an authorization window has closed.
//!
//! There is no callback from the provider's page, so the detector polls the
//! window handle on a fixed interval. The first check runs immediately, so a
//! window that closed before the first tick (or never opened) is seen at
//! once. The result is sent exactly once over a oneshot channel.

use std::time::Duration;
use tether_fetch::WindowHandle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Default time between two checks of the window.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// How a watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The window is closed (or never existed).
    Closed,
    /// The watch was cancelled before the window closed.
    Cancelled,
}

// ============================================================================
// Detector
// ============================================================================

/// Polls window handles for closure.
#[derive(Debug, Clone, Copy)]
pub struct WindowCompletionDetector {
    interval: Duration,
}

impl Default for WindowCompletionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl WindowCompletionDetector {
    /// Creates a detector with the given poll interval.
    ///
    /// A zero interval is raised to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Returns the poll interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts watching `handle` on a background task.
    ///
    /// Cancelling `cancel`, or dropping the returned watch, stops the timer.
    /// Must be called within a tokio runtime.
    pub fn watch(
        &self,
        handle: Option<Box<dyn WindowHandle>>,
        cancel: &CancellationToken,
    ) -> CompletionWatch {
        let token = cancel.child_token();
        let (tx, rx) = oneshot::channel();
        let interval = self.interval;

        let task = tokio::spawn({
            let token = token.clone();
            async move {
                let completion = poll_until_closed(handle, interval, token).await;
                // The receiver may be gone if the watch was dropped.
                let _ = tx.send(completion);
            }
        });

        CompletionWatch { rx, token, task }
    }
}

async fn poll_until_closed(
    handle: Option<Box<dyn WindowHandle>>,
    interval: Duration,
    token: CancellationToken,
) -> Completion {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut checks: u64 = 0;

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(checks, "Window watch cancelled");
                if let Some(handle) = &handle {
                    handle.close();
                }
                return Completion::Cancelled;
            }
            _ = ticker.tick() => {
                checks += 1;
                let closed = handle.as_ref().is_none_or(|h| h.is_closed());
                trace!(checks, closed, "Checked window");
                if closed {
                    debug!(checks, "Window closed");
                    return Completion::Closed;
                }
            }
        }
    }
}

// ============================================================================
// Completion Watch
// ============================================================================

/// A running watch. Resolves to a single [`Completion`].
#[derive(Debug)]
pub struct CompletionWatch {
    rx: oneshot::Receiver<Completion>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl CompletionWatch {
    /// Stops the watch. [`wait`](Self::wait) then yields `Cancelled` unless
    /// the window had already been seen closed.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once the polling task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the watch to end.
    pub async fn wait(mut self) -> Completion {
        (&mut self.rx).await.unwrap_or(Completion::Cancelled)
    }
}

impl Drop for CompletionWatch {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
