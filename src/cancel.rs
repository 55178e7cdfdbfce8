//! Cooperative cancellation coordination.
//!
//! Provides a lightweight [`CancelToken`] shared between the controller and
//! the worker task. The worker polls it at window and page boundaries and
//! races it against backoff sleeps, so a cancellation request is honored no
//! later than the longest configured pause.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared handle to a cancellation token.
pub type SharedCancel = Arc<CancelToken>;

/// One-shot cooperative cancellation flag.
#[derive(Debug, Default)]
pub struct CancelToken {
    is_cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a new token.
    pub fn new() -> Self {
        Self {
            is_cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Create a new shared token wrapped in [`Arc`].
    pub fn shared() -> SharedCancel {
        Arc::new(Self::new())
    }

    /// Request cancellation. Notifies all waiters exactly once.
    pub fn cancel(&self) {
        if !self.is_cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled.load(Ordering::SeqCst)
    }

    /// Wait until cancellation is requested. Returns immediately if the
    /// flag is already set.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}
