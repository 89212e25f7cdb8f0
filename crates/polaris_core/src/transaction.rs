//! Lifecycle of a single ledger write: `Idle -> Pending -> Success | Error`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use polaris_chain::{LedgerClient, OperationDescriptor, TxHash, WalletConnection, WriteError};
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::PolarisError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl TransactionStatus {
    /// `Success` and `Error` are terminal until the next submit or reset.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

// ---------------------------------------------------------------------------
// TransactionRecord
// ---------------------------------------------------------------------------

/// The submission currently owned by a controller.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: String,
    pub descriptor: OperationDescriptor,
    pub status: TransactionStatus,
    pub result_handle: Option<TxHash>,
    pub error_info: Option<WriteError>,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TransactionRecord {
    /// Creates a new record in the `Pending` state.
    fn new(descriptor: OperationDescriptor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            descriptor,
            status: TransactionStatus::Pending,
            result_handle: None,
            error_info: None,
            submitted_at: Utc::now(),
            completed_at: None,
        }
    }

    fn succeed(&mut self, hash: TxHash) {
        self.status = TransactionStatus::Success;
        self.result_handle = Some(hash);
        self.completed_at = Some(Utc::now());
    }

    fn fail(&mut self, error: WriteError) {
        self.status = TransactionStatus::Error;
        self.error_info = Some(error);
        self.completed_at = Some(Utc::now());
    }
}

/// What a UI needs to draw the transaction state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionSnapshot {
    pub status: TransactionStatus,
    pub result_handle: Option<TxHash>,
    pub error_info: Option<WriteError>,
}

impl TransactionSnapshot {
    fn from_record(record: Option<&TransactionRecord>) -> Self {
        match record {
            Some(r) => Self {
                status: r.status,
                result_handle: r.result_handle.clone(),
                error_info: r.error_info.clone(),
            },
            None => Self::default(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// The recorded write failure as a wallet error, if any.
    pub fn failure(&self) -> Option<PolarisError> {
        self.error_info.clone().map(PolarisError::WriteFailed)
    }
}

/// Lifecycle notifications delivered to listeners registered with
/// [`TransactionController::on_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionEvent {
    Submitted { id: String },
    Succeeded { id: String, hash: TxHash },
    Failed { id: String, error: WriteError },
    Reset,
}

type Listener = Arc<dyn Fn(&TransactionEvent) + Send + Sync>;

// ---------------------------------------------------------------------------
// TransactionController
// ---------------------------------------------------------------------------

struct ControllerState {
    record: Option<TransactionRecord>,
    /// Bumped on every accepted submit and every reset; an outcome only
    /// commits if its generation is still current.
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl ControllerState {
    fn status(&self) -> TransactionStatus {
        self.record
            .as_ref()
            .map_or(TransactionStatus::Idle, |r| r.status)
    }
}

struct Inner {
    ledger: Arc<dyn LedgerClient>,
    wallet: Arc<dyn WalletConnection>,
    state: Mutex<ControllerState>,
    snapshot_tx: watch::Sender<TransactionSnapshot>,
    listeners: RwLock<Vec<Listener>>,
}

impl Inner {
    fn publish(&self, state: &ControllerState) {
        self.snapshot_tx
            .send_replace(TransactionSnapshot::from_record(state.record.as_ref()));
    }

    /// Listeners run without any controller lock held, so they may call back
    /// into the controller.
    fn emit(&self, event: &TransactionEvent) {
        let listeners: Vec<Listener> = self.listeners.read().clone();
        for listener in listeners {
            listener(event);
        }
    }

    fn resolve(&self, generation: u64, outcome: Result<TxHash, WriteError>) -> TransactionStatus {
        let (event, status) = {
            let mut state = self.state.lock();
            if state.generation != generation {
                debug!(generation, "discarding outcome of superseded write");
                return state.status();
            }
            state.in_flight = None;
            let Some(record) = state.record.as_mut() else {
                return TransactionStatus::Idle;
            };
            let event = match outcome {
                Ok(hash) => {
                    info!(tx_id = %record.id, hash = %hash, "transaction succeeded");
                    record.succeed(hash.clone());
                    TransactionEvent::Succeeded {
                        id: record.id.clone(),
                        hash,
                    }
                }
                Err(error) => {
                    warn!(tx_id = %record.id, error = %error, "transaction failed");
                    record.fail(error.clone());
                    TransactionEvent::Failed {
                        id: record.id.clone(),
                        error,
                    }
                }
            };
            let status = record.status;
            self.publish(&state);
            (event, status)
        };
        self.emit(&event);
        status
    }
}

/// Owns the lifecycle of one in-flight ledger write.
///
/// Cloning yields another handle to the same controller. At most one write is
/// in flight per controller: `submit` while `Pending` is rejected with
/// [`PolarisError::Busy`] and never reaches the ledger.
///
/// Every state change is published synchronously to [`subscribe`] receivers
/// and to [`on_event`] listeners before the call that caused it returns.
/// Events arrive in lifecycle order on any runtime flavor: the ledger write
/// does not start until `Submitted` has been delivered. Outcome events run on
/// whatever task resolved the write.
///
/// [`subscribe`]: Self::subscribe
/// [`on_event`]: Self::on_event
#[derive(Clone)]
pub struct TransactionController {
    inner: Arc<Inner>,
}

impl TransactionController {
    pub fn new(ledger: Arc<dyn LedgerClient>, wallet: Arc<dyn WalletConnection>) -> Self {
        let (snapshot_tx, _) = watch::channel(TransactionSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                ledger,
                wallet,
                state: Mutex::new(ControllerState {
                    record: None,
                    generation: 0,
                    in_flight: None,
                }),
                snapshot_tx,
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Submit a write. Must be called from within a tokio runtime.
    ///
    /// Returns a handle that resolves to the terminal status once the ledger
    /// answers. If the controller is reset in the meantime the write task is
    /// aborted and awaiting the handle yields a cancelled `JoinError`.
    ///
    /// # Errors
    /// - [`PolarisError::NotConnected`] when the wallet has no current address.
    /// - [`PolarisError::Busy`] when a write is already pending.
    ///
    /// Neither error touches the existing record or issues a ledger call.
    pub fn submit(
        &self,
        descriptor: OperationDescriptor,
    ) -> Result<JoinHandle<TransactionStatus>, PolarisError> {
        if self.inner.wallet.current_address().is_none() {
            warn!(operation = %descriptor, "submit rejected: wallet not connected");
            return Err(PolarisError::NotConnected);
        }

        let (id, handle, start) = {
            let mut state = self.inner.state.lock();
            if state.status() == TransactionStatus::Pending {
                warn!(operation = %descriptor, "submit rejected: transaction already pending");
                return Err(PolarisError::Busy);
            }

            state.generation += 1;
            let generation = state.generation;
            let record = TransactionRecord::new(descriptor.clone());
            let id = record.id.clone();
            state.record = Some(record);

            // The write waits until `Submitted` has reached every listener.
            let (start, started) = oneshot::channel::<()>();
            let inner = Arc::clone(&self.inner);
            let handle = tokio::spawn(async move {
                if started.await.is_err() {
                    return inner.state.lock().status();
                }
                let outcome = inner.ledger.write(&descriptor).await;
                inner.resolve(generation, outcome)
            });
            state.in_flight = Some(handle.abort_handle());
            self.inner.publish(&state);
            (id, handle, start)
        };

        info!(tx_id = %id, "transaction submitted");
        self.inner.emit(&TransactionEvent::Submitted { id });
        // Fails only if a listener already reset the controller and aborted the task.
        let _ = start.send(());
        Ok(handle)
    }

    /// Return to `Idle` and forget the current record. Safe at any time; an
    /// in-flight write is aborted and its outcome discarded.
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            if let Some(in_flight) = state.in_flight.take() {
                debug!("aborting in-flight write on reset");
                in_flight.abort();
            }
            state.record = None;
            self.inner.publish(&state);
        }
        debug!("transaction controller reset");
        self.inner.emit(&TransactionEvent::Reset);
    }

    /// Teardown: reset and drop every listener.
    pub fn dispose(&self) {
        self.reset();
        self.inner.listeners.write().clear();
    }

    /// Register a listener for lifecycle events.
    pub fn on_event<F>(&self, listener: F)
    where
        F: Fn(&TransactionEvent) + Send + Sync + 'static,
    {
        self.inner.listeners.write().push(Arc::new(listener));
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<TransactionSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> TransactionSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    pub fn status(&self) -> TransactionStatus {
        self.inner.state.lock().status()
    }

    /// A copy of the current record, if any.
    pub fn record(&self) -> Option<TransactionRecord> {
        self.inner.state.lock().record.clone()
    }
}
