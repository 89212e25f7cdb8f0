use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use polaris_chain::{LedgerClient, WalletConnection};
use polaris_core::{PolarisConfig, PolarisError};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::panels::mint_nft::MintNftPanel;
use crate::panels::owned_nfts::OwnedNftsPanel;
use crate::panels::send_token::SendTokenPanel;

// ---------------------------------------------------------------------------
// Persisted UI state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalletPanel {
    #[default]
    SendToken,
    MintNft,
    OwnedNfts,
}

/// Restored on the next launch from `~/.polaris/session.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub active_panel: WalletPanel,
    pub holdings_page: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            active_panel: WalletPanel::default(),
            holdings_page: 1,
        }
    }
}

impl SessionState {
    pub fn session_path() -> Result<PathBuf> {
        Ok(PolarisConfig::base_dir()?.join("session.json"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::session_path()?)
    }

    /// Missing or corrupt files yield the default state.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session: {}", path.display()))?;
        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt session file, starting fresh");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::session_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to save session: {}", path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WalletSession
// ---------------------------------------------------------------------------

/// The wallet's panels for one connected address.
///
/// The NFT panels share one balance read, so a successful mint refreshes the
/// holdings grid. They are absent when no NFT contract is configured.
pub struct WalletSession {
    pub state: SessionState,
    pub send_token: SendTokenPanel,
    pub mint_nft: Option<MintNftPanel>,
    pub owned_nfts: Option<OwnedNftsPanel>,
}

impl WalletSession {
    /// # Errors
    /// - [`PolarisError::Config`] when `config` fails validation.
    /// - [`PolarisError::NotConnected`] without a wallet address.
    pub fn open(
        ledger: Arc<dyn LedgerClient>,
        wallet: Arc<dyn WalletConnection>,
        config: &PolarisConfig,
        state: SessionState,
    ) -> Result<Self, PolarisError> {
        config.validate()?;
        let send_token = SendTokenPanel::new(ledger.clone(), wallet.clone(), config)?;

        let (mint_nft, owned_nfts) = if config.nft_contract_address.is_some() {
            let owned = OwnedNftsPanel::new(ledger.clone(), wallet.clone(), config)?;
            let mint =
                MintNftPanel::with_refresher(ledger, wallet, config, owned.refresher().clone())?;
            (Some(mint), Some(owned))
        } else {
            warn!("nft_contract_address not set, NFT panels disabled");
            (None, None)
        };

        info!(owner = %send_token.owner().short(), chain = %config.chain, "wallet session opened");
        Ok(Self {
            state,
            send_token,
            mint_nft,
            owned_nfts,
        })
    }

    /// Issue the initial balance reads.
    pub fn load(&self) -> Vec<JoinHandle<()>> {
        let mut handles = vec![self.send_token.load()];
        if let Some(owned) = &self.owned_nfts {
            handles.push(owned.load());
        }
        handles
    }

    /// Issue the initial reads and wait for them, then return to the saved
    /// holdings page (clamped against the loaded balance).
    pub async fn load_and_restore(&mut self) {
        for handle in self.load() {
            if let Err(e) = handle.await {
                warn!(error = %e, "initial read did not complete");
            }
        }
        let saved = self.state.holdings_page;
        self.go_to_holdings_page(saved);
    }

    /// Move between holdings pages and remember the result.
    pub fn go_to_holdings_page(&mut self, page_index: usize) -> Option<usize> {
        let page = self.owned_nfts.as_mut()?.go_to_page(page_index);
        self.state.holdings_page = page;
        Some(page)
    }

    pub fn set_active_panel(&mut self, panel: WalletPanel) {
        self.state.active_panel = panel;
    }

    /// Teardown every panel. Returns the state to persist.
    pub fn close(self) -> SessionState {
        self.send_token.dispose();
        if let Some(mint) = &self.mint_nft {
            mint.dispose();
        }
        if let Some(owned) = &self.owned_nfts {
            owned.dispose();
        }
        info!("wallet session closed");
        self.state
    }
}
