// Ledger-facing vocabulary shared by the wallet core and its panels.

pub mod address;
pub mod chain;
pub mod client;
pub mod contracts;
pub mod nullable;
pub mod operation;

// Re-export primary types for convenient access.
pub use address::{Address, AddressError};
pub use chain::Chain;
pub use client::{LedgerClient, ReadError, WalletConnection, WriteError};
pub use contracts::{ContractInfo, TokenStandard, polaris_nft, polaris_token};
pub use nullable::{NullLedgerClient, NullWallet};
pub use operation::{AbiValue, OperationDescriptor, ReadQuery, TxHash};
