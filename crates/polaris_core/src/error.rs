use polaris_chain::{ReadError, WriteError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level wallet error type.
///
/// `NotConnected`, `Busy` and `InvalidInput` are returned synchronously before
/// any ledger call is made. `WriteFailed` and `ReadFailed` never escape as
/// `Err` from the core; they are recorded in snapshots and surfaced through
/// [`TransactionSnapshot::failure`](crate::TransactionSnapshot::failure) and
/// [`ReadSnapshot::failure`](crate::ReadSnapshot::failure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolarisError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("A transaction is already pending")]
    Busy,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Write failed: {0}")]
    WriteFailed(#[from] WriteError),

    #[error("Read failed: {0}")]
    ReadFailed(#[from] ReadError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Classification of errors for logging and user display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Caused by user action or wallet state (not connected, bad input, busy).
    UserError,
    /// The ledger refused or reverted the call.
    LedgerError,
    /// Connectivity problem between the wallet and the ledger.
    NetworkError,
    /// Invalid or missing configuration.
    ConfigError,
}

impl PolarisError {
    /// Returns the broad error category for routing and display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotConnected | Self::Busy | Self::InvalidInput(_) => ErrorCategory::UserError,
            Self::WriteFailed(WriteError::Rejected) => ErrorCategory::UserError,
            Self::WriteFailed(WriteError::Network(_)) => ErrorCategory::NetworkError,
            Self::ReadFailed(ReadError::Network(_)) => ErrorCategory::NetworkError,
            Self::WriteFailed(_) | Self::ReadFailed(_) => ErrorCategory::LedgerError,
            Self::Config(_) => ErrorCategory::ConfigError,
        }
    }

    /// Returns a user-friendly message (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConnected => "Connect your wallet to continue.".into(),
            Self::Busy => "Please wait for the current transaction to finish.".into(),
            Self::InvalidInput(msg) => format!("Check your input: {msg}"),
            Self::WriteFailed(WriteError::Rejected) => "Transaction was cancelled in the wallet.".into(),
            Self::WriteFailed(_) => "The transaction failed. Please try again.".into(),
            Self::ReadFailed(_) => "Something went wrong. Please try again.".into(),
            Self::Config(msg) => format!("Configuration issue: {msg}"),
        }
    }
}
