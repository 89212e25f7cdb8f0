//! Cached ledger read that is re-fetched after writes that may affect it.

use std::sync::Arc;

use parking_lot::Mutex;
use polaris_chain::{AbiValue, LedgerClient, ReadError, ReadQuery};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::error::PolarisError;

/// Read-cache state as seen by a UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSnapshot {
    /// Last committed value; survives failed refreshes.
    pub value: Option<AbiValue>,
    pub is_loading: bool,
    pub is_error: bool,
    /// Version of the read that produced `value` (0 before the first commit).
    pub version: u64,
    pub last_error: Option<ReadError>,
}

impl ReadSnapshot {
    pub fn uint(&self) -> Option<u128> {
        self.value.as_ref().and_then(AbiValue::as_uint)
    }

    pub fn failure(&self) -> Option<PolarisError> {
        if !self.is_error {
            return None;
        }
        self.last_error.clone().map(PolarisError::ReadFailed)
    }
}

struct RefreshState {
    /// Highest version handed out so far.
    issued: u64,
    snapshot: ReadSnapshot,
    in_flight: Vec<AbortHandle>,
}

struct Inner {
    ledger: Arc<dyn LedgerClient>,
    query: ReadQuery,
    state: Mutex<RefreshState>,
    snapshot_tx: watch::Sender<ReadSnapshot>,
}

impl Inner {
    fn commit(&self, version: u64, result: Result<AbiValue, ReadError>) {
        let mut state = self.state.lock();
        if version != state.issued {
            debug!(version, latest = state.issued, query = %self.query, "discarding stale read");
            return;
        }
        state.snapshot.is_loading = false;
        match result {
            Ok(value) => {
                state.snapshot.value = Some(value);
                state.snapshot.version = version;
                state.snapshot.is_error = false;
                state.snapshot.last_error = None;
            }
            Err(e) => {
                warn!(version, query = %self.query, error = %e, "read failed, keeping cached value");
                state.snapshot.is_error = true;
                state.snapshot.last_error = Some(e);
            }
        }
        self.snapshot_tx.send_replace(state.snapshot.clone());
    }
}

/// Keeps one [`ReadQuery`] fresh.
///
/// Overlapping refreshes are allowed; each is tagged with a pre-incremented
/// version and only the most recently issued one may commit, whatever order
/// the ledger answers in. Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct ReadRefresher {
    inner: Arc<Inner>,
}

impl ReadRefresher {
    pub fn new(ledger: Arc<dyn LedgerClient>, query: ReadQuery) -> Self {
        let (snapshot_tx, _) = watch::channel(ReadSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                ledger,
                query,
                state: Mutex::new(RefreshState {
                    issued: 0,
                    snapshot: ReadSnapshot::default(),
                    in_flight: Vec::new(),
                }),
                snapshot_tx,
            }),
        }
    }

    /// Issue a read. Must be called from within a tokio runtime. The handle
    /// completes once the response has been committed or discarded.
    pub fn refresh(&self) -> JoinHandle<()> {
        let mut state = self.inner.state.lock();
        state.issued += 1;
        let version = state.issued;
        state.snapshot.is_loading = true;
        self.inner.snapshot_tx.send_replace(state.snapshot.clone());
        debug!(version, query = %self.inner.query, "refresh issued");

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let result = inner.ledger.read(&inner.query).await;
            inner.commit(version, result);
        });
        state.in_flight.retain(|h| !h.is_finished());
        state.in_flight.push(handle.abort_handle());
        handle
    }

    /// Abort in-flight reads and invalidate their versions. The cached value
    /// is kept.
    pub fn dispose(&self) {
        let mut state = self.inner.state.lock();
        for handle in state.in_flight.drain(..) {
            handle.abort();
        }
        state.issued += 1;
        if state.snapshot.is_loading {
            state.snapshot.is_loading = false;
            self.inner.snapshot_tx.send_replace(state.snapshot.clone());
        }
    }

    pub fn query(&self) -> &ReadQuery {
        &self.inner.query
    }

    pub fn snapshot(&self) -> ReadSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReadSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Latest version handed out, committed or not.
    pub fn issued_version(&self) -> u64 {
        self.inner.state.lock().issued
    }
}
