// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledgerline: Reliable Transaction Submission
//!
//! A client library that gets a transaction into a decentralized ledger and
//! then tells you, with proof, whether it made it. A node saying
//! `tesSUCCESS` is an opinion. A validated ledger containing your hash is a
//! fact, and so is a validated ledger past your `last_ledger_sequence`
//! that doesn't contain it. This crate only ever reports facts as final.
//!
//! ## Architecture
//!
//! - **transaction**: Drafts, canonical encoding, signing, multisign.
//! - **crypto**: Ed25519 wallets, addresses, SHA-2 hashing.
//! - **network**: The `Transport` seam, the JSON RPC envelope, a WebSocket
//!   transport, and a scripted transport for tests.
//! - **submission**: Autofill, the submission gateway, the finality
//!   tracker, and the `Client` that composes them.
//! - **metrics**: Prometheus counters for all of the above.
//! - **config**: Protocol constants and default tuning.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ledgerline_client::{Client, SubmitOptions, TransactionBuilder, TransactionKind, Wallet, WsTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(WsTransport::connect("ws://127.0.0.1:6006", Duration::from_secs(20)).await?);
//! let wallet = Arc::new(Wallet::generate());
//! let tx = TransactionBuilder::new(
//!     wallet.address(),
//!     TransactionKind::Payment { destination: "r...".into(), amount: 1_000, destination_tag: None },
//! )
//! .build();
//!
//! let outcome = Client::new(transport)
//!     .submit_and_wait(tx, SubmitOptions::default().with_wallet(wallet))
//!     .await?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod metrics;
pub mod network;
pub mod submission;
pub mod transaction;

pub use config::ClientConfig;
pub use crypto::Wallet;
pub use metrics::SubmissionMetrics;
pub use network::{ScriptedTransport, Transport, TransportError, WsTransport};
pub use submission::{
    Client, FinalityOutcome, SubmissionInput, SubmitError, SubmitOptions,
};
pub use transaction::{
    EngineResult, SignedTransaction, Signer, Transaction, TransactionBuilder, TransactionKind,
};
