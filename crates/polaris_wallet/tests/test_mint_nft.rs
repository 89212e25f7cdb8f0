use std::sync::Arc;

use polaris_chain::{AbiValue, Address, NullLedgerClient, NullWallet, TxHash, WriteError};
use polaris_core::{NotificationKind, PolarisConfig, PolarisError, TransactionStatus};
use polaris_wallet::panels::mint_nft::*;
use polaris_wallet::panels::owned_nfts::{OwnedNftsPanel, OwnedNftsView};

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

async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[test]
fn missing_contract_is_config_error() {
    let result = MintNftPanel::new(
        Arc::new(NullLedgerClient::new()),
        Arc::new(NullWallet::connected(owner())),
        &PolarisConfig::default(),
    );
    assert!(matches!(result, Err(PolarisError::Config(_))));
}

#[tokio::test(start_paused = true)]
async fn mint_success_refreshes_nft_balance() {
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_read(Ok(AbiValue::Uint(1)));
    let panel =
        MintNftPanel::new(ledger.clone(), Arc::new(NullWallet::connected(owner())), &config())
            .unwrap();

    let status = panel.mint().unwrap().await.unwrap();
    assert_eq!(status, TransactionStatus::Success);
    settle().await;

    assert_eq!(ledger.read_count(), 1);
    assert_eq!(panel.flow().refresher().snapshot().uint(), Some(1));
    assert!(panel.snapshot().notification.is_showing(NotificationKind::Success));
}

#[tokio::test(start_paused = true)]
async fn minting_flag_tracks_pending_write() {
    let ledger = Arc::new(NullLedgerClient::new());
    let gate = ledger.gate_write();
    let panel =
        MintNftPanel::new(ledger.clone(), Arc::new(NullWallet::connected(owner())), &config())
            .unwrap();

    let pending = panel.mint().unwrap();
    assert!(panel.snapshot().is_minting());
    assert!(matches!(panel.mint(), Err(PolarisError::Busy)));

    gate.send(Err(WriteError::Reverted("sold out".into()))).unwrap();
    assert_eq!(pending.await.unwrap(), TransactionStatus::Error);
    assert!(!panel.snapshot().is_minting());
    assert!(panel.snapshot().notification.is_showing(NotificationKind::Error));
}

#[tokio::test(start_paused = true)]
async fn retry_after_error_clears_error_notice() {
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_write(Err(WriteError::Network("timeout".into())));
    ledger.script_write(Ok(TxHash("0x2".into())));
    let panel =
        MintNftPanel::new(ledger.clone(), Arc::new(NullWallet::connected(owner())), &config())
            .unwrap();

    panel.mint().unwrap().await.unwrap();
    assert!(panel.snapshot().notification.is_showing(NotificationKind::Error));

    panel.mint().unwrap().await.unwrap();
    assert!(panel.snapshot().notification.is_showing(NotificationKind::Success));
    assert_eq!(ledger.write_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn shared_refresher_updates_holdings_grid() {
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_read(Ok(AbiValue::Uint(0)));
    ledger.script_read(Ok(AbiValue::Uint(1)));
    let wallet = Arc::new(NullWallet::connected(owner()));

    let owned = OwnedNftsPanel::new(ledger.clone(), wallet.clone(), &config()).unwrap();
    owned.load().await.unwrap();
    assert_eq!(owned.view(), OwnedNftsView::Empty);

    let mint = MintNftPanel::with_refresher(
        ledger.clone(),
        wallet,
        &config(),
        owned.refresher().clone(),
    )
    .unwrap();
    mint.mint().unwrap().await.unwrap();
    settle().await;

    let OwnedNftsView::Loaded(page) = owned.view() else {
        panic!("expected holdings after mint");
    };
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Polaris NFT #1");
}
