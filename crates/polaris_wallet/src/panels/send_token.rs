use std::sync::Arc;

use polaris_chain::{
    Address, ContractInfo, LedgerClient, OperationDescriptor, ReadQuery, WalletConnection,
    polaris_token,
};
use polaris_core::{
    NotificationSnapshot, PolarisConfig, PolarisError, ReadSnapshot, TransactionSnapshot,
    TransactionStatus, WriteFlow,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::connected_owner;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything the send form draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTokenSnapshot {
    pub owner: Address,
    pub token: ContractInfo,
    pub balance: ReadSnapshot,
    pub transaction: TransactionSnapshot,
    pub notification: NotificationSnapshot,
}

impl SendTokenSnapshot {
    /// Balance in base units; zero until the first read commits.
    pub fn balance_or_zero(&self) -> u128 {
        self.balance.uint().unwrap_or(0)
    }

    /// The send button is disabled while a transfer is pending.
    pub fn can_send(&self) -> bool {
        !self.transaction.is_pending()
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// Transfer of the Polaris token from the connected wallet.
///
/// Holds the owner's `balanceOf` read, which is refreshed once after every
/// successful transfer.
pub struct SendTokenPanel {
    owner: Address,
    token: ContractInfo,
    flow: WriteFlow,
}

impl SendTokenPanel {
    /// # Errors
    /// [`PolarisError::NotConnected`] when no wallet address is available.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        wallet: Arc<dyn WalletConnection>,
        config: &PolarisConfig,
    ) -> Result<Self, PolarisError> {
        let owner = connected_owner(wallet.as_ref())?;
        let token = polaris_token(config.chain, config.token_address.clone());
        let query = ReadQuery::balance_of(token.address.clone(), owner.clone());
        let flow = WriteFlow::from_parts(ledger, wallet, query, config);
        Ok(Self { owner, token, flow })
    }

    /// Fetch the balance when the panel opens.
    pub fn load(&self) -> JoinHandle<()> {
        self.flow.refresher().refresh()
    }

    /// Transfer `amount` base units to `recipient`.
    ///
    /// # Errors
    /// - [`PolarisError::InvalidInput`] for an unparseable recipient or a
    ///   zero amount. No ledger call is made.
    /// - Anything [`WriteFlow::submit`] returns.
    pub fn send(
        &self,
        recipient: &str,
        amount: u128,
    ) -> Result<JoinHandle<TransactionStatus>, PolarisError> {
        let recipient = Address::parse(recipient).map_err(|e| {
            warn!(error = %e, "send rejected: bad recipient");
            PolarisError::InvalidInput(format!("recipient: {e}"))
        })?;
        if amount == 0 {
            warn!("send rejected: zero amount");
            return Err(PolarisError::InvalidInput(
                "amount must be greater than zero".into(),
            ));
        }

        info!(
            token = %self.token.address,
            recipient = %recipient.short(),
            amount,
            "sending {}",
            self.token.symbol
        );
        self.flow.submit(OperationDescriptor::transfer(
            self.token.address.clone(),
            recipient,
            amount,
        ))
    }

    pub fn reset(&self) {
        self.flow.reset();
    }

    pub fn dispose(&self) {
        self.flow.dispose();
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn token(&self) -> &ContractInfo {
        &self.token
    }

    pub fn flow(&self) -> &WriteFlow {
        &self.flow
    }

    pub fn snapshot(&self) -> SendTokenSnapshot {
        SendTokenSnapshot {
            owner: self.owner.clone(),
            token: self.token.clone(),
            balance: self.flow.refresher().snapshot(),
            transaction: self.flow.controller().snapshot(),
            notification: self.flow.notifier().snapshot(),
        }
    }
}
