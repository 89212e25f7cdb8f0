use std::sync::Arc;

use polaris_chain::{
    Address, ContractInfo, LedgerClient, OperationDescriptor, ReadQuery, WalletConnection,
    polaris_nft,
};
use polaris_core::{
    NotificationSnapshot, NotificationTimer, PolarisConfig, PolarisError, ReadRefresher,
    TransactionController, TransactionSnapshot, TransactionStatus, WriteFlow,
};
use tokio::task::JoinHandle;
use tracing::info;

use super::connected_owner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintNftSnapshot {
    pub owner: Address,
    pub transaction: TransactionSnapshot,
    pub notification: NotificationSnapshot,
}

impl MintNftSnapshot {
    pub fn is_minting(&self) -> bool {
        self.transaction.is_pending()
    }
}

/// Mints one Polaris NFT to the connected wallet.
pub struct MintNftPanel {
    owner: Address,
    contract: ContractInfo,
    flow: WriteFlow,
}

impl MintNftPanel {
    /// Open with a private NFT balance read.
    ///
    /// # Errors
    /// - [`PolarisError::NotConnected`] without a wallet address.
    /// - [`PolarisError::Config`] when no NFT contract is configured.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        wallet: Arc<dyn WalletConnection>,
        config: &PolarisConfig,
    ) -> Result<Self, PolarisError> {
        let owner = connected_owner(wallet.as_ref())?;
        let contract = polaris_nft(config.chain, config.nft_contract()?);
        let refresher = ReadRefresher::new(
            ledger.clone(),
            ReadQuery::balance_of(contract.address.clone(), owner.clone()),
        );
        Ok(Self::assemble(ledger, wallet, config, owner, contract, refresher))
    }

    /// Open against an existing NFT balance read, typically the holdings
    /// panel's, so a mint refreshes the grid.
    pub fn with_refresher(
        ledger: Arc<dyn LedgerClient>,
        wallet: Arc<dyn WalletConnection>,
        config: &PolarisConfig,
        refresher: ReadRefresher,
    ) -> Result<Self, PolarisError> {
        let owner = connected_owner(wallet.as_ref())?;
        let contract = polaris_nft(config.chain, config.nft_contract()?);
        Ok(Self::assemble(ledger, wallet, config, owner, contract, refresher))
    }

    fn assemble(
        ledger: Arc<dyn LedgerClient>,
        wallet: Arc<dyn WalletConnection>,
        config: &PolarisConfig,
        owner: Address,
        contract: ContractInfo,
        refresher: ReadRefresher,
    ) -> Self {
        let flow = WriteFlow::new(
            TransactionController::new(ledger, wallet),
            refresher,
            NotificationTimer::new(config.success_notice()),
        );
        Self {
            owner,
            contract,
            flow,
        }
    }

    /// Submit `safeMint(owner)`.
    ///
    /// # Errors
    /// [`PolarisError::NotConnected`] if the wallet disconnected, or
    /// [`PolarisError::Busy`] while a mint is pending.
    pub fn mint(&self) -> Result<JoinHandle<TransactionStatus>, PolarisError> {
        info!(contract = %self.contract.address, to = %self.owner.short(), "minting");
        self.flow.submit(OperationDescriptor::safe_mint(
            self.contract.address.clone(),
            self.owner.clone(),
        ))
    }

    pub fn reset(&self) {
        self.flow.reset();
    }

    /// Tears down the mint flow, including the balance read it holds.
    pub fn dispose(&self) {
        self.flow.dispose();
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn contract(&self) -> &ContractInfo {
        &self.contract
    }

    pub fn flow(&self) -> &WriteFlow {
        &self.flow
    }

    pub fn snapshot(&self) -> MintNftSnapshot {
        MintNftSnapshot {
            owner: self.owner.clone(),
            transaction: self.flow.controller().snapshot(),
            notification: self.flow.notifier().snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaris_chain::{NullLedgerClient, NullWallet, contracts::FN_SAFE_MINT};

    fn nft() -> Address {
        Address::parse("0x3333333333333333333333333333333333333333").unwrap()
    }

    fn owner() -> Address {
        Address::parse("0x00000000000000000000000000000000000000ff").unwrap()
    }

    fn config() -> PolarisConfig {
        PolarisConfig {
            nft_contract_address: Some(nft()),
            ..PolarisConfig::default()
        }
    }

    #[test]
    fn requires_connected_wallet() {
        let result = MintNftPanel::new(
            Arc::new(NullLedgerClient::new()),
            Arc::new(NullWallet::disconnected()),
            &config(),
        );
        assert!(matches!(result, Err(PolarisError::NotConnected)));
    }

    #[tokio::test]
    async fn mints_to_owner() {
        let ledger = Arc::new(NullLedgerClient::new());
        let panel =
            MintNftPanel::new(ledger.clone(), Arc::new(NullWallet::connected(owner())), &config())
                .unwrap();

        let status = panel.mint().unwrap().await.unwrap();
        assert_eq!(status, TransactionStatus::Success);

        let calls = ledger.write_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].contract, nft());
        assert_eq!(calls[0].function, FN_SAFE_MINT);
        assert_eq!(calls[0].args[0].as_address(), Some(&owner()));
        assert!(panel.contract().supports(FN_SAFE_MINT));
    }

    #[tokio::test]
    async fn disconnect_after_open_blocks_mint() {
        let ledger = Arc::new(NullLedgerClient::new());
        let wallet = Arc::new(NullWallet::connected(owner()));
        let panel = MintNftPanel::new(ledger.clone(), wallet.clone(), &config()).unwrap();

        wallet.disconnect();
        assert!(matches!(panel.mint(), Err(PolarisError::NotConnected)));
        assert!(!panel.snapshot().is_minting());
        assert_eq!(ledger.write_count(), 0);
    }

    #[tokio::test]
    async fn private_read_targets_owner_nft_balance() {
        let ledger = Arc::new(NullLedgerClient::new());
        let panel =
            MintNftPanel::new(ledger.clone(), Arc::new(NullWallet::connected(owner())), &config())
                .unwrap();

        assert_eq!(
            panel.flow().refresher().query(),
            &ReadQuery::balance_of(nft(), owner())
        );
        panel.mint().unwrap().await.unwrap();
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(ledger.read_calls(), vec![ReadQuery::balance_of(nft(), owner())]);
    }
}
