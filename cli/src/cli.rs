//! # CLI Interface
//!
//! Defines the command-line argument structure for `ledgerline` using
//! `clap` derive. Connection and tuning flags are global and fall back to
//! `LEDGERLINE_*` environment variables.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use ledgerline_client::config::{self, ClientConfig};

use crate::logging::LogFormat;

/// Submit transactions to a ledger node and wait for proof of their fate.
#[derive(Parser, Debug)]
#[command(
    name = "ledgerline",
    about = "Reliable transaction submission for ledger nodes",
    version,
    propagate_version = true
)]
pub struct LedgerlineCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// WebSocket endpoint of the node.
    #[arg(
        long,
        global = true,
        env = "LEDGERLINE_URL",
        default_value = "ws://127.0.0.1:6006"
    )]
    pub url: String,

    /// Per-request timeout in milliseconds.
    #[arg(
        long,
        global = true,
        env = "LEDGERLINE_REQUEST_TIMEOUT_MS",
        default_value_t = 20_000
    )]
    pub request_timeout_ms: u64,

    /// Wait between finality polls in milliseconds.
    #[arg(
        long,
        global = true,
        env = "LEDGERLINE_LEDGER_CLOSE_MS",
        default_value_t = 1_000
    )]
    pub ledger_close_ms: u64,

    /// Consecutive network failures tolerated while waiting.
    #[arg(
        long,
        global = true,
        env = "LEDGERLINE_MAX_TRANSIENT_RETRIES",
        default_value_t = config::DEFAULT_MAX_TRANSIENT_RETRIES
    )]
    pub max_transient_retries: u32,

    /// Ledgers of headroom when autofilling the expiry bound.
    #[arg(
        long,
        global = true,
        env = "LEDGERLINE_LEDGER_OFFSET",
        default_value_t = config::LEDGER_OFFSET
    )]
    pub ledger_offset: u32,

    /// Ceiling for autofilled fees, in drops.
    #[arg(
        long,
        global = true,
        env = "LEDGERLINE_MAX_FEE",
        default_value_t = config::DEFAULT_MAX_FEE_DROPS
    )]
    pub max_fee: u64,

    /// Log output format.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "LEDGERLINE_LOG_FORMAT",
        default_value = "pretty"
    )]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "LEDGERLINE_LOG", default_value = "warn")]
    pub log_level: String,

    /// Print Prometheus metrics to stderr when the command finishes.
    #[arg(long, global = true)]
    pub print_metrics: bool,
}

impl GlobalArgs {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Client tuning assembled from the flags.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            ledger_close_interval: Duration::from_millis(self.ledger_close_ms),
            max_transient_retries: self.max_transient_retries,
            ledger_offset: self.ledger_offset,
            max_fee_drops: self.max_fee,
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a wallet (or derive one from a seed) and print it as JSON.
    Keygen(KeygenArgs),
    /// Sign and submit a JSON transaction draft.
    Submit(SubmitArgs),
    /// Submit a pre-signed hex blob.
    SubmitBlob(SubmitBlobArgs),
    /// Look up a transaction by hash.
    Lookup(LookupArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for `keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Hex-encoded 32-byte seed. A random one is generated when omitted.
    #[arg(long)]
    pub seed: Option<String>,
}

/// Arguments for `submit`.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Path to the JSON transaction draft, or `-` for stdin.
    pub tx_file: PathBuf,

    /// Hex-encoded 32-byte wallet seed.
    ///
    /// Prefer the environment variable over the flag so the seed does not
    /// end up in shell history.
    #[arg(long, env = "LEDGERLINE_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Submit the draft exactly as written.
    #[arg(long)]
    pub no_autofill: bool,

    /// Ask the node not to relay or queue on local failure.
    #[arg(long)]
    pub fail_hard: bool,

    /// Wait until the transaction is validated or expired.
    #[arg(long)]
    pub wait: bool,

    /// Produce a multisign entry instead of a single signature.
    #[arg(long)]
    pub multisign: bool,

    /// Expected number of multisign participants (sizes the fee).
    #[arg(long, requires = "multisign")]
    pub signers_count: Option<u32>,

    /// Print the signed blob and hash without submitting.
    #[arg(long, conflicts_with = "wait")]
    pub sign_only: bool,
}

/// Arguments for `submit-blob`.
#[derive(Args, Debug)]
pub struct SubmitBlobArgs {
    /// Upper-case hex `tx_blob`.
    pub blob: String,

    /// Ask the node not to relay or queue on local failure.
    #[arg(long)]
    pub fail_hard: bool,

    /// Wait until the transaction is validated or expired.
    #[arg(long)]
    pub wait: bool,
}

/// Arguments for `lookup`.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Upper-case hex transaction hash.
    pub hash: String,
}
