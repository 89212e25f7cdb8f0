use std::sync::Arc;

use polaris_chain::{AbiValue, Address, NullLedgerClient, NullWallet, ReadError};
use polaris_core::PolarisConfig;
use polaris_wallet::panels::owned_nfts::*;

fn config() -> PolarisConfig {
    PolarisConfig {
        nft_contract_address: Some(
            Address::parse("0x3333333333333333333333333333333333333333").unwrap(),
        ),
        ..PolarisConfig::default()
    }
}

fn open(ledger: &Arc<NullLedgerClient>) -> OwnedNftsPanel {
    let wallet = NullWallet::connected(
        Address::parse("0x00000000000000000000000000000000000000ff").unwrap(),
    );
    OwnedNftsPanel::new(ledger.clone(), Arc::new(wallet), &config()).unwrap()
}

async fn loaded(balance: u128) -> OwnedNftsPanel {
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_read(Ok(AbiValue::Uint(balance)));
    let panel = open(&ledger);
    panel.load().await.unwrap();
    panel
}

fn page(panel: &OwnedNftsPanel) -> HoldingsPage {
    match panel.view() {
        OwnedNftsView::Loaded(page) => page,
        other => panic!("expected loaded view, got {other:?}"),
    }
}

#[tokio::test]
async fn loading_before_first_answer() {
    let ledger = Arc::new(NullLedgerClient::new());
    let gate = ledger.gate_read();
    let panel = open(&ledger);

    let handle = panel.load();
    assert_eq!(panel.view(), OwnedNftsView::Loading);

    gate.send(Ok(AbiValue::Uint(2))).unwrap();
    handle.await.unwrap();
    assert_eq!(page(&panel).total, 2);
}

#[tokio::test]
async fn failed_read_shows_error() {
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_read(Err(ReadError::Network("offline".into())));
    let panel = open(&ledger);
    panel.load().await.unwrap();

    assert!(matches!(panel.view(), OwnedNftsView::Error(msg) if !msg.is_empty()));
}

#[tokio::test]
async fn zero_balance_is_empty() {
    let panel = loaded(0).await;
    assert_eq!(panel.view(), OwnedNftsView::Empty);
}

#[tokio::test]
async fn thirteen_holdings_span_three_pages() {
    let mut panel = loaded(13).await;

    let first = page(&panel);
    assert_eq!(first.items.len(), 6);
    assert_eq!(first.page_count, 3);
    assert!(first.show_controls);
    assert!(first.has_next);

    assert_eq!(panel.go_to_page(3), 3);
    let last = page(&panel);
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].id, 13);
    assert_eq!(last.items[0].name, "Polaris NFT #13");
    assert!(!last.has_next);
    assert!(last.has_previous);
    assert_eq!(last.label(), "3 / 3");
}

#[tokio::test]
async fn navigation_clamps() {
    let mut panel = loaded(13).await;
    assert_eq!(panel.go_to_page(0), 1);
    assert_eq!(panel.go_to_page(999), 3);
    assert_eq!(panel.next_page(), 3);
    assert_eq!(panel.previous_page(), 2);
    assert_eq!(page(&panel).items[0].id, 7);
}

#[tokio::test]
async fn single_page_hides_controls() {
    let panel = loaded(6).await;
    let only = page(&panel);
    assert_eq!(only.page_count, 1);
    assert!(!only.show_controls);
    assert!(!only.has_previous);
    assert!(!only.has_next);
}

#[tokio::test]
async fn shrinking_balance_pulls_page_back() {
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_read(Ok(AbiValue::Uint(13)));
    ledger.script_read(Ok(AbiValue::Uint(4)));
    let mut panel = open(&ledger);
    panel.load().await.unwrap();
    panel.go_to_page(3);

    panel.refresher().refresh().await.unwrap();
    let current = page(&panel);
    assert_eq!(current.page_index, 1);
    assert_eq!(current.items.len(), 4);
    assert_eq!(panel.next_page(), 1);
}

#[tokio::test]
async fn refetch_keeps_grid_visible() {
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_read(Ok(AbiValue::Uint(3)));
    let gate = ledger.gate_read();
    let panel = open(&ledger);
    panel.load().await.unwrap();

    let handle = panel.refresher().refresh();
    assert_eq!(page(&panel).total, 3);

    gate.send(Ok(AbiValue::Uint(4))).unwrap();
    handle.await.unwrap();
    assert_eq!(page(&panel).total, 4);
}

#[tokio::test]
async fn custom_page_size_from_config() {
    let config = PolarisConfig {
        holdings_page_size: 4,
        ..config()
    };
    let ledger = Arc::new(NullLedgerClient::new());
    ledger.script_read(Ok(AbiValue::Uint(5)));
    let panel = OwnedNftsPanel::new(
        ledger.clone(),
        Arc::new(NullWallet::connected(Address::zero())),
        &config,
    )
    .unwrap();
    panel.load().await.unwrap();

    let first = page(&panel);
    assert_eq!(first.items.len(), 4);
    assert_eq!(first.page_count, 2);
}
