//! # Finality Tracker
//!
//! Observes a submitted transaction until the ledger proves what happened
//! to it. A node's preliminary answer is never trusted: only two facts end
//! tracking successfully.
//!
//! 1. The transaction appears in a **validated** ledger.
//! 2. The validated ledger has moved **past** the transaction's
//!    `last_ledger_sequence`, so it can never be included.
//!
//! ## Poll Cycle
//!
//! ```text
//!        ┌──────────────────────────────────────────────┐
//!        ▼                                              │
//!   sleep(ledger_close_interval)                        │
//!        │                                              │
//!   ledger{validated} ── last < latest ──► Expired      │
//!        │                                              │
//!   tx{hash} ─┬─ validated ──────────────► Validated    │
//!             ├─ txnNotFound / unvalidated ─────────────┘
//!             └─ other RPC error ────────► Failed
//! ```
//!
//! Network and timeout errors on either query are retried on the next
//! cycle, up to `max_transient_retries` in a row. A cycle that ends in a
//! definite lookup answer resets the count.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config;
use crate::metrics::SubmissionMetrics;
use crate::network::rpc::{self, LedgerParams, LedgerResponse, RpcCommand, TxParams, TxResponse};
use crate::network::transport::{Transport, TransportError};
use crate::transaction::types::EngineResult;

use super::clock::Clock;
use super::outcome::FinalityOutcome;

/// Tracker tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Sleep before every poll cycle.
    pub ledger_close_interval: Duration,
    /// Consecutive network/timeout failures tolerated before giving up.
    pub max_transient_retries: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ledger_close_interval: config::DEFAULT_LEDGER_CLOSE_INTERVAL,
            max_transient_retries: config::DEFAULT_MAX_TRANSIENT_RETRIES,
        }
    }
}

/// Polls a node until a submitted transaction reaches a terminal state.
#[derive(Clone)]
pub struct FinalityTracker {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    config: TrackerConfig,
    metrics: Option<Arc<SubmissionMetrics>>,
}

impl FinalityTracker {
    pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>, config: TrackerConfig) -> Self {
        Self {
            transport,
            clock,
            config,
            metrics: None,
        }
    }

    /// Record poll cycles, retries, and outcomes into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<SubmissionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The configuration this tracker polls with.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Track `hash` until it is validated, provably expired, or can no
    /// longer be observed.
    ///
    /// # Arguments
    ///
    /// * `hash`: upper-case hex id of the submitted transaction.
    /// * `last_ledger`: the transaction's `last_ledger_sequence`.
    /// * `engine_result`: preliminary result from submission, carried into
    ///   [`FinalityOutcome::Failed`].
    ///
    /// Dropping the returned future stops observation only. The transaction
    /// stays submitted.
    pub async fn track(
        &self,
        hash: &str,
        last_ledger: u32,
        engine_result: EngineResult,
    ) -> FinalityOutcome {
        let outcome = self.poll(hash, last_ledger, &engine_result).await;
        match &outcome {
            FinalityOutcome::Validated { ledger_index, .. } => {
                info!(hash, ledger_index, "transaction validated")
            }
            FinalityOutcome::Expired { latest_ledger, .. } => {
                info!(hash, last_ledger, latest_ledger, "transaction expired")
            }
            FinalityOutcome::Failed { cause, .. } => {
                warn!(hash, error = %cause, "transaction tracking failed")
            }
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(&outcome);
        }
        outcome
    }

    async fn poll(
        &self,
        hash: &str,
        last_ledger: u32,
        engine_result: &EngineResult,
    ) -> FinalityOutcome {
        let failed = |cause: TransportError| FinalityOutcome::Failed {
            engine_result: engine_result.clone(),
            cause,
        };
        let mut transient_failures = 0u32;
        let mut cycle = 0u64;

        loop {
            self.clock.sleep(self.config.ledger_close_interval).await;
            cycle += 1;
            if let Some(metrics) = &self.metrics {
                metrics.poll_cycles_total.inc();
            }

            let latest = match self.latest_validated().await {
                Ok(latest) => latest,
                Err(e) => match self.absorb(e, &mut transient_failures) {
                    Some(cause) => return failed(cause),
                    None => continue,
                },
            };

            if last_ledger < latest {
                return FinalityOutcome::Expired {
                    last_ledger,
                    latest_ledger: latest,
                };
            }

            match self.lookup(hash).await {
                Ok(resp) if resp.validated => {
                    return match resp.ledger_index {
                        Some(ledger_index) => FinalityOutcome::Validated {
                            ledger_index,
                            meta: resp.meta.unwrap_or(serde_json::Value::Null),
                        },
                        None => failed(TransportError::Decode {
                            command: RpcCommand::Tx.to_string(),
                            reason: "validated transaction without ledger_index".to_string(),
                        }),
                    };
                }
                Ok(_) => {
                    transient_failures = 0;
                    debug!(hash, cycle, latest, "transaction seen but not yet validated");
                }
                Err(e) if e.is_not_found() => {
                    transient_failures = 0;
                    debug!(hash, cycle, latest, "transaction not found yet");
                }
                Err(e) => {
                    if let Some(cause) = self.absorb(e, &mut transient_failures) {
                        return failed(cause);
                    }
                }
            }
        }
    }

    /// Returns the error back if it ends tracking, `None` if the next cycle
    /// should try again.
    fn absorb(&self, error: TransportError, transient_failures: &mut u32) -> Option<TransportError> {
        if !error.is_retryable() {
            return Some(error);
        }
        *transient_failures += 1;
        if *transient_failures > self.config.max_transient_retries {
            return Some(error);
        }
        warn!(
            error = %error,
            attempt = *transient_failures,
            max = self.config.max_transient_retries,
            "transient failure while tracking, retrying"
        );
        if let Some(metrics) = &self.metrics {
            metrics.transient_retries_total.inc();
        }
        None
    }

    /// Index of the latest validated ledger, as the node reports it.
    pub async fn latest_validated(&self) -> Result<u32, TransportError> {
        let resp: LedgerResponse = rpc::call(
            self.transport.as_ref(),
            RpcCommand::Ledger,
            &LedgerParams::validated(),
        )
        .await?;
        Ok(resp.ledger_index)
    }

    async fn lookup(&self, hash: &str) -> Result<TxResponse, TransportError> {
        rpc::call(
            self.transport.as_ref(),
            RpcCommand::Tx,
            &TxParams {
                transaction: hash.to_string(),
            },
        )
        .await
    }
}
