pub mod panels;
pub mod session;

pub use panels::mint_nft::{MintNftPanel, MintNftSnapshot};
pub use panels::owned_nfts::{Holding, HoldingsPage, OwnedNftsPanel, OwnedNftsView, holdings_count};
pub use panels::send_token::{SendTokenPanel, SendTokenSnapshot};
pub use session::{SessionState, WalletPanel, WalletSession};
