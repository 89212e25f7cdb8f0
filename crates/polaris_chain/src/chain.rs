use std::fmt;

use serde::{Deserialize, Serialize};

/// EVM networks the wallet can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Base,
    #[default]
    Sepolia,
}

impl Chain {
    /// Human-readable label for the chain.
    pub fn label(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum Mainnet",
            Chain::Base => "Base Mainnet",
            Chain::Sepolia => "Sepolia Testnet",
        }
    }

    /// EIP-155 chain ID.
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Base => 8453,
            Chain::Sepolia => 11_155_111,
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Chain::Sepolia)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
