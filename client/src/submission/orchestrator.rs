//! # Submission Orchestrator
//!
//! [`Client`] ties the pipeline together:
//!
//! ```text
//! SubmissionInput ─► (Assembler) ─► Signer ─► SubmissionGateway ─► FinalityTracker
//!                       autofill      sign        submit              submit_and_wait only
//! ```
//!
//! Whatever the caller hands in, be it a draft, a signed transaction, or a
//! raw blob, is resolved once into a [`SignedTransaction`]. Everything
//! downstream only ever sees that type.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::metrics::SubmissionMetrics;
use crate::network::transport::Transport;
use crate::transaction::builder::Transaction;
use crate::transaction::signing::{SignedTransaction, Signer};
use crate::transaction::types::EngineResult;

use super::assembler::{Assembler, AssemblerConfig, LedgerAssembler};
use super::clock::{Clock, TokioClock};
use super::error::SubmitError;
use super::gateway::SubmissionGateway;
use super::outcome::FinalityOutcome;
use super::tracker::{FinalityTracker, TrackerConfig};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Anything the client can submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionInput {
    /// A draft that still needs signing (and possibly autofill). A draft
    /// that already carries signatures is treated as signed.
    Unsigned(Transaction),
    /// A transaction signed elsewhere.
    Signed(SignedTransaction),
    /// A hex `tx_blob`. Must decode to a signed transaction.
    Blob(String),
}

impl From<Transaction> for SubmissionInput {
    fn from(tx: Transaction) -> Self {
        Self::Unsigned(tx)
    }
}

impl From<SignedTransaction> for SubmissionInput {
    fn from(signed: SignedTransaction) -> Self {
        Self::Signed(signed)
    }
}

impl From<String> for SubmissionInput {
    fn from(blob: String) -> Self {
        Self::Blob(blob)
    }
}

impl From<&str> for SubmissionInput {
    fn from(blob: &str) -> Self {
        Self::Blob(blob.to_string())
    }
}

/// Per-call submission options.
#[derive(Clone)]
pub struct SubmitOptions {
    /// Fill fee, sequence, network id, and expiry for unsigned input.
    pub autofill: bool,
    /// Ask the node not to relay or queue on local failure.
    pub fail_hard: bool,
    /// Signer for unsigned input. Ignored for signed input.
    pub wallet: Option<Arc<dyn Signer>>,
    /// Produce a multisign entry instead of a single signature.
    pub multisign: bool,
    /// Expected multisign participants, used to size the autofilled fee.
    pub signers_count: Option<u32>,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            autofill: true,
            fail_hard: false,
            wallet: None,
            multisign: false,
            signers_count: None,
        }
    }
}

impl SubmitOptions {
    pub fn with_wallet(mut self, wallet: Arc<dyn Signer>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn autofill(mut self, autofill: bool) -> Self {
        self.autofill = autofill;
        self
    }

    pub fn fail_hard(mut self, fail_hard: bool) -> Self {
        self.fail_hard = fail_hard;
        self
    }

    pub fn multisign(mut self, signers_count: Option<u32>) -> Self {
        self.multisign = true;
        self.signers_count = signers_count;
        self
    }
}

impl std::fmt::Debug for SubmitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitOptions")
            .field("autofill", &self.autofill)
            .field("fail_hard", &self.fail_hard)
            .field("wallet", &self.wallet.as_ref().map(|w| w.address()))
            .field("multisign", &self.multisign)
            .field("signers_count", &self.signers_count)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Submits transactions and, on request, waits for their final outcome.
///
/// Holds no per-submission state: one client can drive any number of
/// concurrent submissions over one shared transport.
pub struct Client {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    assembler: Arc<dyn Assembler>,
    config: ClientConfig,
    metrics: Option<Arc<SubmissionMetrics>>,
}

impl Client {
    /// A client with default configuration, real timers, and a
    /// [`LedgerAssembler`] on the same transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let config = ClientConfig::default();
        let assembler = Arc::new(LedgerAssembler::new(
            Arc::clone(&transport),
            assembler_config(&config),
        ));
        Self {
            transport,
            clock: Arc::new(TokioClock),
            assembler,
            config,
            metrics: None,
        }
    }

    /// Replace the time source used between poll cycles.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Apply `config`. Rebuilds the default assembler with the new offset
    /// and fee cap.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.assembler = Arc::new(LedgerAssembler::new(
            Arc::clone(&self.transport),
            assembler_config(&config),
        ));
        self.config = config;
        self
    }

    /// Replace the assembler used for autofill.
    pub fn with_assembler(mut self, assembler: Arc<dyn Assembler>) -> Self {
        self.assembler = assembler;
        self
    }

    /// Record activity into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<SubmissionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve `input` into a signed transaction, assembling and signing
    /// as needed. Makes network calls only when autofill runs.
    pub async fn prepare(
        &self,
        input: SubmissionInput,
        options: &SubmitOptions,
    ) -> Result<SignedTransaction, SubmitError> {
        match input {
            SubmissionInput::Signed(signed) => Ok(signed),
            SubmissionInput::Blob(blob) => SignedTransaction::from_blob(&blob),
            SubmissionInput::Unsigned(tx) if tx.is_signed() => {
                SignedTransaction::from_transaction(tx)
            }
            SubmissionInput::Unsigned(tx) => {
                let wallet = options.wallet.as_ref().ok_or_else(|| {
                    SubmitError::validation("a wallet is required to sign an unsigned transaction")
                })?;
                let tx = if options.autofill {
                    self.assembler.assemble(&tx, options.signers_count).await?
                } else {
                    tx
                };
                wallet.sign(&tx, options.multisign)
            }
        }
    }

    /// Submit without waiting for finality.
    ///
    /// A node-side rejection comes back as a non-success [`EngineResult`],
    /// not as an error.
    pub async fn submit(
        &self,
        input: impl Into<SubmissionInput>,
        options: SubmitOptions,
    ) -> Result<EngineResult, SubmitError> {
        let signed = self.prepare(input.into(), &options).await?;
        self.gateway().submit(&signed, options.fail_hard).await
    }

    /// Submit and wait until the transaction is validated or provably
    /// expired.
    ///
    /// The prepared transaction must carry `last_ledger_sequence`; without
    /// it expiry cannot be proven and the call fails before submitting. The
    /// bound must also lie beyond the latest validated ledger, which is
    /// queried right before submission.
    /// Dropping the returned future stops waiting, nothing more.
    pub async fn submit_and_wait(
        &self,
        input: impl Into<SubmissionInput>,
        options: SubmitOptions,
    ) -> Result<FinalityOutcome, SubmitError> {
        let input = input.into();
        if !options.autofill {
            // Catch the missing bound before autofill or signing could touch
            // the network.
            if let SubmissionInput::Unsigned(tx) = &input {
                if tx.last_ledger_sequence.is_none() {
                    return Err(missing_last_ledger());
                }
            }
        }

        let signed = self.prepare(input, &options).await?;
        let last_ledger = signed
            .last_ledger_sequence()
            .ok_or_else(missing_last_ledger)?;

        let tracker = self.tracker();
        let latest = tracker.latest_validated().await?;
        if last_ledger <= latest {
            return Err(SubmitError::validation(format!(
                "last_ledger_sequence {last_ledger} is not beyond the latest validated ledger {latest}"
            )));
        }

        let engine_result = self.gateway().submit(&signed, options.fail_hard).await?;
        debug!(
            hash = signed.hash(),
            engine_result = %engine_result.code,
            last_ledger,
            "waiting for finality"
        );

        let outcome = tracker
            .track(signed.hash(), last_ledger, engine_result)
            .await;
        info!(hash = signed.hash(), outcome = outcome.label(), "submission finished");
        Ok(outcome)
    }

    fn gateway(&self) -> SubmissionGateway {
        let gateway = SubmissionGateway::new(Arc::clone(&self.transport));
        match &self.metrics {
            Some(metrics) => gateway.with_metrics(Arc::clone(metrics)),
            None => gateway,
        }
    }

    fn tracker(&self) -> FinalityTracker {
        let tracker = FinalityTracker::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.clock),
            TrackerConfig {
                ledger_close_interval: self.config.ledger_close_interval,
                max_transient_retries: self.config.max_transient_retries,
            },
        );
        match &self.metrics {
            Some(metrics) => tracker.with_metrics(Arc::clone(metrics)),
            None => tracker,
        }
    }
}

fn assembler_config(config: &ClientConfig) -> AssemblerConfig {
    AssemblerConfig {
        ledger_offset: config.ledger_offset,
        max_fee_drops: config.max_fee_drops,
    }
}

fn missing_last_ledger() -> SubmitError {
    SubmitError::validation("submit_and_wait requires last_ledger_sequence")
}
