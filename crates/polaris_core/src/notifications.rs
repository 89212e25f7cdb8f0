use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::debug;

/// How long a success indicator stays up unless configured otherwise.
pub const DEFAULT_SUCCESS_NOTICE: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Identifies one `show` call. Only the handle of the indicator currently on
/// screen can cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationSnapshot {
    /// Kind of the most recent indicator, kept after it hides.
    pub kind: Option<NotificationKind>,
    pub visible: bool,
}

impl NotificationSnapshot {
    pub fn is_showing(&self, kind: NotificationKind) -> bool {
        self.visible && self.kind == Some(kind)
    }
}

struct TimerState {
    next_id: u64,
    /// Handle of the visible indicator.
    current: Option<u64>,
    /// Pending auto-clear, if the visible indicator has one.
    pending: Option<(u64, AbortHandle)>,
    snapshot: NotificationSnapshot,
}

impl TimerState {
    fn cancel_pending(&mut self) {
        if let Some((id, handle)) = self.pending.take() {
            debug!(notification = id, "auto-clear cancelled");
            handle.abort();
        }
    }

    fn hide(&mut self) -> bool {
        self.current = None;
        let changed = self.snapshot.visible;
        self.snapshot.visible = false;
        changed
    }
}

struct Inner {
    state: Mutex<TimerState>,
    snapshot_tx: watch::Sender<NotificationSnapshot>,
}

impl Inner {
    fn expire(&self, id: u64) {
        let mut state = self.state.lock();
        // Superseded or cancelled while the sleep was finishing.
        if state.current != Some(id) {
            return;
        }
        state.pending = None;
        state.hide();
        debug!(notification = id, "notification auto-cleared");
        self.snapshot_tx.send_replace(state.snapshot);
    }
}

/// A single transient success/error indicator.
///
/// Success indicators clear themselves after the configured duration; error
/// indicators stay until [`dismiss`](Self::dismiss) (the owning flow calls it
/// on the next submit or reset). A new `show` supersedes whatever is on
/// screen, so at most one auto-clear timer is ever pending.
#[derive(Clone)]
pub struct NotificationTimer {
    inner: Arc<Inner>,
    success_duration: Duration,
}

impl NotificationTimer {
    pub fn new(success_duration: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(NotificationSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(TimerState {
                    next_id: 1,
                    current: None,
                    pending: None,
                    snapshot: NotificationSnapshot::default(),
                }),
                snapshot_tx,
            }),
            success_duration,
        }
    }

    /// Show an indicator. With `Some(duration)` it hides itself once the
    /// duration elapses; with `None` it persists. Must be called from within a
    /// tokio runtime when a duration is given.
    pub fn show(&self, kind: NotificationKind, duration: Option<Duration>) -> NotificationHandle {
        let mut state = self.inner.state.lock();
        state.cancel_pending();

        let id = state.next_id;
        state.next_id += 1;
        state.current = Some(id);
        state.snapshot = NotificationSnapshot {
            kind: Some(kind),
            visible: true,
        };

        if let Some(duration) = duration {
            let deadline = Instant::now() + duration;
            let inner = Arc::clone(&self.inner);
            let handle = tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                inner.expire(id);
            });
            state.pending = Some((id, handle.abort_handle()));
        }

        debug!(notification = id, ?kind, ?duration, "notification shown");
        self.inner.snapshot_tx.send_replace(state.snapshot);
        NotificationHandle(id)
    }

    pub fn show_success(&self) -> NotificationHandle {
        self.show(NotificationKind::Success, Some(self.success_duration))
    }

    pub fn show_error(&self) -> NotificationHandle {
        self.show(NotificationKind::Error, None)
    }

    /// Cancel the indicator identified by `handle`: its auto-clear never fires
    /// and it is hidden now. Idempotent; a no-op once the handle has fired or
    /// been superseded.
    pub fn cancel(&self, handle: NotificationHandle) {
        let mut state = self.inner.state.lock();
        if state.current != Some(handle.0) {
            return;
        }
        state.cancel_pending();
        if state.hide() {
            self.inner.snapshot_tx.send_replace(state.snapshot);
        }
    }

    /// Hide whatever is showing and cancel its auto-clear.
    pub fn dismiss(&self) {
        let mut state = self.inner.state.lock();
        state.cancel_pending();
        if state.hide() {
            self.inner.snapshot_tx.send_replace(state.snapshot);
        }
    }

    /// Teardown. After this no timer callback fires.
    pub fn dispose(&self) {
        self.dismiss();
    }

    pub fn snapshot(&self) -> NotificationSnapshot {
        *self.inner.snapshot_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn success_duration(&self) -> Duration {
        self.success_duration
    }
}

impl Default for NotificationTimer {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_NOTICE)
    }
}
