//! Collaborator traits the wallet core consumes: the ledger and the connected
//! wallet. Transport and signing live behind these seams.

use async_trait::async_trait;

use crate::address::Address;
use crate::operation::{AbiValue, OperationDescriptor, ReadQuery, TxHash};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a ledger write can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request rejected by wallet")]
    Rejected,

    #[error("Execution reverted: {0}")]
    Reverted(String),
}

/// Reasons a ledger read can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Call reverted: {0}")]
    Reverted(String),

    #[error("Could not decode result: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Executes writes and reads against the ledger.
///
/// Each call is fire-once-observe-once: implementations must not retry or
/// replay on the caller's behalf.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a state-changing call. Resolves once the ledger has accepted
    /// (or refused) it.
    async fn write(&self, operation: &OperationDescriptor) -> Result<TxHash, WriteError>;

    /// Evaluate a read-only call.
    async fn read(&self, query: &ReadQuery) -> Result<AbiValue, ReadError>;
}

/// The wallet provider's view of the current account.
pub trait WalletConnection: Send + Sync {
    fn current_address(&self) -> Option<Address>;

    fn is_connected(&self) -> bool {
        self.current_address().is_some()
    }
}
