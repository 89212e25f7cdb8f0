//! Nullable collaborators for deterministic testing.
//!
//! [`NullLedgerClient`] answers from a script instead of a network and records
//! every call it receives. Responses are either ready immediately or gated on a
//! `oneshot` channel so a test decides exactly when (and in which order) each
//! call resolves.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::address::Address;
use crate::client::{LedgerClient, ReadError, WalletConnection, WriteError};
use crate::operation::{AbiValue, OperationDescriptor, ReadQuery, TxHash};

type WriteResult = Result<TxHash, WriteError>;
type ReadResult = Result<AbiValue, ReadError>;

enum Scripted<T> {
    Ready(T),
    Gated(oneshot::Receiver<T>),
}

/// A ledger that never leaves the process.
///
/// Unscripted writes succeed with a synthetic hash; unscripted reads return
/// the fallback value (`Uint(0)` unless changed).
pub struct NullLedgerClient {
    writes: Mutex<VecDeque<Scripted<WriteResult>>>,
    reads: Mutex<VecDeque<Scripted<ReadResult>>>,
    write_calls: Mutex<Vec<OperationDescriptor>>,
    read_calls: Mutex<Vec<ReadQuery>>,
    fallback_read: Mutex<AbiValue>,
    next_hash: AtomicU64,
}

impl NullLedgerClient {
    pub fn new() -> Self {
        Self {
            writes: Mutex::new(VecDeque::new()),
            reads: Mutex::new(VecDeque::new()),
            write_calls: Mutex::new(Vec::new()),
            read_calls: Mutex::new(Vec::new()),
            fallback_read: Mutex::new(AbiValue::Uint(0)),
            next_hash: AtomicU64::new(1),
        }
    }

    /// Queue an immediate answer for the next unanswered write.
    pub fn script_write(&self, result: WriteResult) {
        self.writes.lock().push_back(Scripted::Ready(result));
    }

    /// Queue a write that stays pending until the returned sender fires.
    /// Dropping the sender resolves the write with a network error.
    pub fn gate_write(&self) -> oneshot::Sender<WriteResult> {
        let (tx, rx) = oneshot::channel();
        self.writes.lock().push_back(Scripted::Gated(rx));
        tx
    }

    /// Queue an immediate answer for the next unanswered read.
    pub fn script_read(&self, result: ReadResult) {
        self.reads.lock().push_back(Scripted::Ready(result));
    }

    /// Queue a read that stays pending until the returned sender fires.
    pub fn gate_read(&self) -> oneshot::Sender<ReadResult> {
        let (tx, rx) = oneshot::channel();
        self.reads.lock().push_back(Scripted::Gated(rx));
        tx
    }

    /// Value returned by reads once the script is exhausted.
    pub fn set_fallback_read(&self, value: AbiValue) {
        *self.fallback_read.lock() = value;
    }

    pub fn write_calls(&self) -> Vec<OperationDescriptor> {
        self.write_calls.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.write_calls.lock().len()
    }

    pub fn read_calls(&self) -> Vec<ReadQuery> {
        self.read_calls.lock().clone()
    }

    pub fn read_count(&self) -> usize {
        self.read_calls.lock().len()
    }

    fn synthetic_hash(&self) -> TxHash {
        let n = self.next_hash.fetch_add(1, Ordering::Relaxed);
        TxHash(format!("0x{n:064x}"))
    }
}

impl Default for NullLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for NullLedgerClient {
    async fn write(&self, operation: &OperationDescriptor) -> WriteResult {
        self.write_calls.lock().push(operation.clone());
        let next = self.writes.lock().pop_front();
        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(WriteError::Network("response dropped".into()))),
            None => Ok(self.synthetic_hash()),
        }
    }

    async fn read(&self, query: &ReadQuery) -> ReadResult {
        self.read_calls.lock().push(query.clone());
        let next = self.reads.lock().pop_front();
        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ReadError::Network("response dropped".into()))),
            None => Ok(self.fallback_read.lock().clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// NullWallet
// ---------------------------------------------------------------------------

/// A wallet whose connection state is set directly by the test.
#[derive(Default)]
pub struct NullWallet {
    address: Mutex<Option<Address>>,
}

impl NullWallet {
    pub fn connected(address: Address) -> Self {
        Self {
            address: Mutex::new(Some(address)),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connect(&self, address: Address) {
        *self.address.lock() = Some(address);
    }

    pub fn disconnect(&self) {
        *self.address.lock() = None;
    }
}

impl WalletConnection for NullWallet {
    fn current_address(&self) -> Option<Address> {
        self.address.lock().clone()
    }
}
