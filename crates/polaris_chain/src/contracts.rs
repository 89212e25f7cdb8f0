use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::chain::Chain;

pub const FN_TRANSFER: &str = "transfer";
pub const FN_SAFE_MINT: &str = "safeMint";
pub const FN_BALANCE_OF: &str = "balanceOf";

/// Deployed Polaris ERC-20 token.
pub const POLARIS_TOKEN_ADDRESS: &str = "0xAaf6A734114437b719c28cfd44c0b2B515eD29be";

/// Token standard implemented by a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStandard {
    Erc20,
    Erc721,
}

impl TokenStandard {
    pub fn label(self) -> &'static str {
        match self {
            Self::Erc20 => "ERC-20",
            Self::Erc721 => "ERC-721",
        }
    }

    /// Function names this wallet calls on a contract of this standard.
    pub fn supported_functions(self) -> &'static [&'static str] {
        match self {
            Self::Erc20 => &[FN_TRANSFER, FN_BALANCE_OF],
            Self::Erc721 => &[FN_SAFE_MINT, FN_BALANCE_OF],
        }
    }
}

/// A contract the wallet knows how to talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub name: String,
    pub symbol: String,
    pub standard: TokenStandard,
    pub chain: Chain,
    pub address: Address,
}

impl ContractInfo {
    pub fn supports(&self, function: &str) -> bool {
        self.standard.supported_functions().contains(&function)
    }
}

/// The Polaris fungible token.
pub fn polaris_token(chain: Chain, address: Address) -> ContractInfo {
    ContractInfo {
        name: "Polaris".into(),
        symbol: "POLARIS".into(),
        standard: TokenStandard::Erc20,
        chain,
        address,
    }
}

/// The mintable Polaris NFT collection.
pub fn polaris_nft(chain: Chain, address: Address) -> ContractInfo {
    ContractInfo {
        name: "Polaris NFT".into(),
        symbol: "PNFT".into(),
        standard: TokenStandard::Erc721,
        chain,
        address,
    }
}
