//! Cancellation and incremental delivery for long-running remote commands.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// One-shot cancellation signal shared by a transport and its owner.
///
/// Clones observe the same signal. Cancelling more than once has no
/// further effect.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Returns `true` only for the call that fired it.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        })
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the token has been cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Cancel after `after` unless the returned guard is dropped first.
    #[must_use = "dropping the guard disarms the deadline"]
    pub fn arm_deadline(&self, after: Duration) -> DeadlineGuard {
        let token = self.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            token.cancel();
        });
        DeadlineGuard { task }
    }
}

/// Disarms a deadline armed by [`CancelToken::arm_deadline`] on drop.
#[derive(Debug)]
pub struct DeadlineGuard {
    task: JoinHandle<()>,
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Output of a streaming command, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A chunk of remote output.
    Data(Vec<u8>),
    /// The transport or the command failed.
    Error(String),
    /// The stream ended. Always the last event, delivered once.
    Closed,
}

/// Consumer end of a streaming command.
///
/// Owns the transport through its [`CancelToken`]: [`close`](Self::close)
/// or dropping the handle tears it down.
#[derive(Debug)]
pub struct StreamHandle {
    events: mpsc::Receiver<StreamEvent>,
    cancel: CancelToken,
    done: bool,
}

impl StreamHandle {
    /// Wrap the receiving side of a producer task.
    #[must_use]
    pub fn new(events: mpsc::Receiver<StreamEvent>, cancel: CancelToken) -> Self {
        Self {
            events,
            cancel,
            done: false,
        }
    }

    /// Next event, or `None` once [`StreamEvent::Closed`] has been seen.
    pub async fn next(&mut self) -> Option<StreamEvent> {
        if self.done {
            return None;
        }
        // A producer that vanished without a farewell still ends the stream.
        let event = self.events.recv().await.unwrap_or(StreamEvent::Closed);
        if event == StreamEvent::Closed {
            self.done = true;
        }
        Some(event)
    }

    /// Ask the producer to tear down the transport. Safe to call repeatedly;
    /// returns `true` only for the call that initiated the close.
    pub fn close(&self) -> bool {
        self.cancel.cancel()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
