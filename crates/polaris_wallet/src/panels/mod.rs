pub mod mint_nft;
pub mod owned_nfts;
pub mod send_token;

use polaris_chain::{Address, WalletConnection};
use polaris_core::PolarisError;

/// Panels are bound to the address connected when they open; a wallet switch
/// reopens them.
pub(crate) fn connected_owner(wallet: &dyn WalletConnection) -> Result<Address, PolarisError> {
    wallet.current_address().ok_or(PolarisError::NotConnected)
}
