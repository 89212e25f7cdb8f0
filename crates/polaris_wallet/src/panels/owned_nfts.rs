use std::sync::Arc;

use polaris_chain::{Address, ContractInfo, LedgerClient, ReadQuery, WalletConnection, polaris_nft};
use polaris_core::{
    PolarisConfig, PolarisError, ReadRefresher, ReadSnapshot, Paginator, page_count, page_range,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::connected_owner;

const HOLDING_DESCRIPTION: &str = "A unique Polaris NFT with special properties and attributes.";
const HOLDING_IMAGE: &str = "https://ipfs.io/ipfs/QmVnxgB2HGe4EV4QWagMJK3J8ReavfHxfjDSy5v7gNuGGN";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One NFT card. Holdings are derived from the owner's balance, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub id: usize,
    pub name: String,
    pub description: String,
    pub image: String,
}

impl Holding {
    pub fn numbered(id: usize) -> Self {
        Self {
            id,
            name: format!("Polaris NFT #{id}"),
            description: HOLDING_DESCRIPTION.into(),
            image: HOLDING_IMAGE.into(),
        }
    }
}

/// The visible page of holdings plus what the pager controls need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingsPage {
    pub items: Vec<Holding>,
    pub page_index: usize,
    pub page_count: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Pager controls are hidden when everything fits on one page.
    pub show_controls: bool,
}

impl HoldingsPage {
    /// `"2 / 3"` pager label.
    pub fn label(&self) -> String {
        format!("{} / {}", self.page_index, self.page_count)
    }
}

/// What the holdings panel shows, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedNftsView {
    /// First load still in flight.
    Loading,
    /// The last balance read failed; carries a user-facing message.
    Error(String),
    /// Balance is zero.
    Empty,
    Loaded(HoldingsPage),
}

/// Number of holdings implied by a balance read. Balances beyond `usize`
/// saturate.
pub fn holdings_count(snapshot: &ReadSnapshot) -> usize {
    snapshot
        .uint()
        .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX))
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// Paged grid of the NFTs owned by the connected wallet.
pub struct OwnedNftsPanel {
    owner: Address,
    contract: ContractInfo,
    refresher: ReadRefresher,
    paginator: Paginator,
}

impl OwnedNftsPanel {
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
        let query = ReadQuery::balance_of(contract.address.clone(), owner.clone());
        Ok(Self {
            owner,
            contract,
            refresher: ReadRefresher::new(ledger, query),
            paginator: Paginator::new(config.holdings_page_size),
        })
    }

    /// Fetch the balance when the panel opens.
    pub fn load(&self) -> JoinHandle<()> {
        self.refresher.refresh()
    }

    /// The balance read, shared with flows that change it.
    pub fn refresher(&self) -> &ReadRefresher {
        &self.refresher
    }

    pub fn subscribe(&self) -> watch::Receiver<ReadSnapshot> {
        self.refresher.subscribe()
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn contract(&self) -> &ContractInfo {
        &self.contract
    }

    pub fn next_page(&mut self) -> usize {
        self.sync_total();
        self.paginator.next()
    }

    pub fn previous_page(&mut self) -> usize {
        self.sync_total();
        self.paginator.previous()
    }

    pub fn go_to_page(&mut self, page_index: usize) -> usize {
        self.sync_total();
        self.paginator.go_to(page_index)
    }

    pub fn view(&self) -> OwnedNftsView {
        let snapshot = self.refresher.snapshot();
        if snapshot.is_loading && snapshot.value.is_none() {
            return OwnedNftsView::Loading;
        }
        if let Some(err) = snapshot.failure() {
            return OwnedNftsView::Error(err.user_message());
        }

        let total = holdings_count(&snapshot);
        if total == 0 {
            return OwnedNftsView::Empty;
        }

        let size = self.paginator.page_size();
        let count = page_count(total, size);
        let index = self.paginator.page_index().clamp(1, count);
        let items = page_range(total, index, size)
            .map(|i| Holding::numbered(i + 1))
            .collect();

        OwnedNftsView::Loaded(HoldingsPage {
            items,
            page_index: index,
            page_count: count,
            total,
            has_previous: index > 1,
            has_next: index < count,
            show_controls: total > size,
        })
    }

    pub fn dispose(&self) {
        self.refresher.dispose();
    }

    fn sync_total(&mut self) {
        let total = holdings_count(&self.refresher.snapshot());
        if total != self.paginator.total() {
            debug!(total, "holdings total changed");
            self.paginator.set_total(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaris_chain::{AbiValue, NullLedgerClient, NullWallet};

    fn config() -> PolarisConfig {
        PolarisConfig {
            nft_contract_address: Some(
                Address::parse("0x3333333333333333333333333333333333333333").unwrap(),
            ),
            ..PolarisConfig::default()
        }
    }

    fn wallet() -> Arc<NullWallet> {
        Arc::new(NullWallet::connected(
            Address::parse("0x00000000000000000000000000000000000000ff").unwrap(),
        ))
    }

    #[test]
    fn holding_is_numbered_from_one() {
        let h = Holding::numbered(1);
        assert_eq!(h.name, "Polaris NFT #1");
        assert_eq!(h.description, HOLDING_DESCRIPTION);
        assert!(h.image.starts_with("https://ipfs.io/ipfs/"));
    }

    #[test]
    fn missing_contract_is_config_error() {
        let result = OwnedNftsPanel::new(
            Arc::new(NullLedgerClient::new()),
            wallet(),
            &PolarisConfig::default(),
        );
        assert!(matches!(result, Err(PolarisError::Config(_))));
    }

    #[test]
    fn huge_balance_saturates() {
        let snap = ReadSnapshot {
            value: Some(AbiValue::Uint(u128::MAX)),
            ..ReadSnapshot::default()
        };
        assert_eq!(holdings_count(&snap), usize::MAX);
    }

    #[test]
    fn idle_panel_is_empty() {
        let panel =
            OwnedNftsPanel::new(Arc::new(NullLedgerClient::new()), wallet(), &config()).unwrap();
        assert_eq!(panel.view(), OwnedNftsView::Empty);
    }

    #[tokio::test]
    async fn loaded_page_has_six_cards() {
        let ledger = Arc::new(NullLedgerClient::new());
        ledger.script_read(Ok(AbiValue::Uint(13)));
        let panel = OwnedNftsPanel::new(ledger.clone(), wallet(), &config()).unwrap();
        panel.load().await.unwrap();

        let OwnedNftsView::Loaded(page) = panel.view() else {
            panic!("expected a loaded view");
        };
        assert_eq!(page.items.len(), 6);
        assert_eq!(page.items[0].id, 1);
        assert_eq!(page.label(), "1 / 3");
        assert!(page.show_controls);
        assert!(!page.has_previous);
    }
}
