use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use polaris_chain::contracts::POLARIS_TOKEN_ADDRESS;
use polaris_chain::{Address, Chain};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PolarisError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Wallet configuration stored at `~/.polaris/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarisConfig {
    // Ledger
    pub chain: Chain,
    pub token_address: Address,
    pub nft_contract_address: Option<Address>,

    // UI timing
    /// How long a success indicator stays visible, in milliseconds.
    pub success_notice_ms: u64,
    pub holdings_page_size: usize,

    // General
    pub log_level: String,
}

impl Default for PolarisConfig {
    fn default() -> Self {
        Self {
            chain: Chain::default(),
            token_address: Address::parse(POLARIS_TOKEN_ADDRESS)
                .expect("token address constant is valid"),
            nft_contract_address: None,
            success_notice_ms: 5_000,
            holdings_page_size: 6,
            log_level: "info".into(),
        }
    }
}

impl PolarisConfig {
    /// Returns the base config directory: `~/.polaris/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".polaris"))
    }

    /// Returns the config file path: `~/.polaris/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.polaris/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Loads config from `~/.polaris/config.json`, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path. A missing file yields defaults; a
    /// corrupt file is logged and also yields defaults (never errors on bad
    /// JSON).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        match serde_json::from_str(&content) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Ignoring unreadable config {} ({e})", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Saves config to `~/.polaris/config.json`.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific file path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Check values that serde alone cannot enforce.
    pub fn validate(&self) -> Result<(), PolarisError> {
        if self.success_notice_ms == 0 {
            return Err(PolarisError::Config(
                "success_notice_ms must be greater than zero".into(),
            ));
        }
        if self.holdings_page_size == 0 {
            return Err(PolarisError::Config(
                "holdings_page_size must be greater than zero".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(PolarisError::Config(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn success_notice(&self) -> Duration {
        Duration::from_millis(self.success_notice_ms)
    }

    /// The NFT contract, required by the mint and holdings flows.
    pub fn nft_contract(&self) -> Result<Address, PolarisError> {
        self.nft_contract_address
            .clone()
            .ok_or_else(|| PolarisError::Config("nft_contract_address is not set".into()))
    }
}
