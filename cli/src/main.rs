// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledgerline CLI
//!
//! Entry point for the `ledgerline` binary. Parses CLI arguments,
//! initializes logging, connects to a node, and runs one command:
//!
//! - `keygen`      : generate or derive a wallet
//! - `submit`      : sign and submit a JSON draft, optionally waiting
//! - `submit-blob` : submit a pre-signed blob, optionally waiting
//! - `lookup`      : look up a transaction by hash
//! - `version`     : print build version information
//!
//! Results go to stdout as JSON; logs and metrics go to stderr.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::io::Read;
use std::sync::Arc;

use ledgerline_client::network::rpc::{RpcCommand, TxParams};
use ledgerline_client::network::{Transport, WsTransport};
use ledgerline_client::submission::SubmissionInput;
use ledgerline_client::{
    Client, SignedTransaction, SubmissionMetrics, SubmitOptions, Transaction, Wallet,
};

use cli::{Commands, GlobalArgs, LedgerlineCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = LedgerlineCli::parse();

    match cli.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
        Commands::Submit(args) => {
            logging::init_logging(&cli.global.log_level, cli.global.log_format);
            submit(&cli.global, args).await
        }
        Commands::SubmitBlob(args) => {
            logging::init_logging(&cli.global.log_level, cli.global.log_format);
            submit_blob(&cli.global, args).await
        }
        Commands::Lookup(args) => {
            logging::init_logging(&cli.global.log_level, cli.global.log_format);
            lookup(&cli.global, args).await
        }
    }
}

fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let wallet = match args.seed {
        Some(seed) => Wallet::from_hex(&seed).context("invalid seed")?,
        None => Wallet::generate(),
    };
    print_json(&json!({
        "address": wallet.address(),
        "public_key": wallet.public_key_hex(),
        "seed": wallet.seed_hex(),
    }))
}

async fn connect(global: &GlobalArgs) -> Result<Arc<WsTransport>> {
    let transport = WsTransport::connect(&global.url, global.request_timeout())
        .await
        .with_context(|| format!("failed to connect to {}", global.url))?;
    tracing::info!(url = %global.url, "connected");
    Ok(Arc::new(transport))
}

fn client(global: &GlobalArgs, transport: Arc<WsTransport>) -> Result<(Client, Arc<SubmissionMetrics>)> {
    let metrics = Arc::new(SubmissionMetrics::new().context("failed to create metrics")?);
    let client = Client::new(transport)
        .with_config(global.client_config())
        .with_metrics(Arc::clone(&metrics));
    Ok((client, metrics))
}

async fn submit(global: &GlobalArgs, args: cli::SubmitArgs) -> Result<()> {
    let draft = read_draft(&args.tx_file)?;
    let wallet = Arc::new(Wallet::from_hex(&args.secret).context("invalid secret")?);
    let mut options = SubmitOptions::default()
        .autofill(!args.no_autofill)
        .fail_hard(args.fail_hard)
        .with_wallet(wallet);
    if args.multisign {
        options = options.multisign(args.signers_count);
    }

    let transport = connect(global).await?;
    let (client, metrics) = client(global, transport)?;
    let signed = client
        .prepare(SubmissionInput::Unsigned(draft), &options)
        .await
        .context("failed to prepare transaction")?;

    if args.sign_only {
        return print_json(&json!({ "hash": signed.hash(), "tx_blob": signed.blob() }));
    }

    let result = run(&client, signed, options, args.wait).await?;
    print_json(&result)?;
    report_metrics(global, &metrics)
}

async fn submit_blob(global: &GlobalArgs, args: cli::SubmitBlobArgs) -> Result<()> {
    let transport = connect(global).await?;
    let (client, metrics) = client(global, transport)?;
    let options = SubmitOptions::default().fail_hard(args.fail_hard);
    let signed = client
        .prepare(SubmissionInput::Blob(args.blob), &options)
        .await
        .context("invalid blob")?;

    let result = run(&client, signed, options, args.wait).await?;
    print_json(&result)?;
    report_metrics(global, &metrics)
}

/// Submit `signed`, optionally waiting for finality, and describe the
/// result as JSON.
async fn run(
    client: &Client,
    signed: SignedTransaction,
    options: SubmitOptions,
    wait: bool,
) -> Result<serde_json::Value> {
    let hash = signed.hash().to_string();
    if wait {
        let outcome = client
            .submit_and_wait(signed, options)
            .await
            .context("submission failed")?;
        Ok(json!({ "hash": hash, "outcome": outcome }))
    } else {
        let engine_result = client
            .submit(signed, options)
            .await
            .context("submission failed")?;
        Ok(json!({ "hash": hash, "engine_result": engine_result }))
    }
}

async fn lookup(global: &GlobalArgs, args: cli::LookupArgs) -> Result<()> {
    let transport = connect(global).await?;
    let params = serde_json::to_value(TxParams {
        transaction: args.hash.to_uppercase(),
    })?;
    let result = transport
        .request(RpcCommand::Tx, params)
        .await
        .with_context(|| format!("lookup of {} failed", args.hash))?;
    print_json(&result)
}

fn read_draft(path: &std::path::Path) -> Result<Transaction> {
    let text = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read draft from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).context("draft is not a valid transaction")
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_metrics(global: &GlobalArgs, metrics: &SubmissionMetrics) -> Result<()> {
    if global.print_metrics {
        eprint!("{}", metrics.encode().context("failed to encode metrics")?);
    }
    Ok(())
}

fn print_version() {
    println!("ledgerline {}", env!("CARGO_PKG_VERSION"));
    println!("client library ledgerline-client");
    println!(
        "default ledger close interval {:?}",
        ledgerline_client::config::DEFAULT_LEDGER_CLOSE_INTERVAL
    );
}
