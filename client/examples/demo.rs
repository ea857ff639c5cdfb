//! Offline walkthrough of a submission lifecycle.
//!
//! Generates a wallet, autofills and signs a payment, submits it to a
//! scripted node that takes two ledgers to include it, and waits for the
//! validated outcome. A second payment is dropped by the node and expires.
//!
//! Run with:
//!   cargo run --example demo

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use ledgerline_client::network::rpc::{RpcCommand, TXN_NOT_FOUND};
use ledgerline_client::network::{ScriptedTransport, TransportError};
use ledgerline_client::submission::RecordingClock;
use ledgerline_client::{
    Client, ClientConfig, SubmitOptions, TransactionBuilder, TransactionKind, Wallet,
};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

fn step(title: &str) {
    println!("\n{BOLD}▶ {title}{RESET}");
}

fn node() -> Arc<ScriptedTransport> {
    let node = Arc::new(ScriptedTransport::new());
    node.set_default(RpcCommand::ServerInfo, json!({ "network_id": 0 }))
        .set_default(RpcCommand::AccountInfo, json!({ "account_data": { "sequence": 1 } }))
        .set_default(
            RpcCommand::Fee,
            json!({ "base_fee": 10, "open_ledger_fee": 12, "owner_reserve": 200000 }),
        )
        .set_default(
            RpcCommand::Submit,
            json!({ "engine_result": "tesSUCCESS", "engine_result_message": "applied" }),
        );
    node
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let wallet = Arc::new(Wallet::generate());
    let destination = Wallet::generate().address();
    let config = ClientConfig {
        ledger_close_interval: Duration::from_millis(1_000),
        ..ClientConfig::default()
    };

    step("Wallet");
    println!("  address    {}", wallet.address());
    println!("  public key {DIM}{}{RESET}", wallet.public_key_hex());

    step("Payment included two ledgers after submission");
    let included = node();
    included
        .push_ok(RpcCommand::Ledger, json!({ "ledger_index": 100 }))
        .push_ok(RpcCommand::Ledger, json!({ "ledger_index": 101 }))
        .push_ok(RpcCommand::Ledger, json!({ "ledger_index": 102 }))
        .push_ok(RpcCommand::Ledger, json!({ "ledger_index": 103 }))
        .push_err(RpcCommand::Tx, TransportError::rpc(TXN_NOT_FOUND, ""))
        .push_ok(
            RpcCommand::Tx,
            json!({ "validated": true, "ledger_index": 103, "meta": { "TransactionResult": "tesSUCCESS" } }),
        );
    let clock = Arc::new(RecordingClock::new());
    let client = Client::new(included.clone())
        .with_config(config.clone())
        .with_clock(clock.clone());
    let tx = TransactionBuilder::new(
        wallet.address(),
        TransactionKind::Payment {
            destination: destination.clone(),
            amount: 25_000_000,
            destination_tag: None,
        },
    )
    .memo(Some("text/plain".into()), b"rent".to_vec())
    .build();

    let outcome = client
        .submit_and_wait(tx, SubmitOptions::default().with_wallet(wallet.clone()))
        .await?;
    println!("  {GREEN}{outcome}{RESET}");
    println!(
        "  {DIM}{} node calls, {} poll cycles{RESET}",
        included.call_count(),
        clock.count()
    );

    step("Payment dropped by the node");
    let dropped = node();
    dropped
        .push_ok(RpcCommand::Ledger, json!({ "ledger_index": 200 }))
        .set_default(RpcCommand::Ledger, json!({ "ledger_index": 206 }))
        .set_default_err(RpcCommand::Tx, TransportError::rpc(TXN_NOT_FOUND, ""));
    let client = Client::new(dropped)
        .with_config(config)
        .with_clock(Arc::new(RecordingClock::new()));
    let tx = TransactionBuilder::new(
        wallet.address(),
        TransactionKind::Payment {
            destination,
            amount: 1,
            destination_tag: None,
        },
    )
    .last_ledger_sequence(205)
    .build();

    let outcome = client
        .submit_and_wait(tx, SubmitOptions::default().with_wallet(wallet))
        .await?;
    println!("  {YELLOW}{outcome}{RESET}");

    Ok(())
}
