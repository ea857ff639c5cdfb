//! # Prometheus Metrics
//!
//! Counters describing what the submission pipeline has done. All metrics
//! live in a dedicated [`prometheus::Registry`] (prefix `ledgerline`) so an
//! embedding application can expose or merge them as it sees fit.
//!
//! Recording is optional: a [`crate::submission::Client`] without metrics
//! attached skips every counter update.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::submission::FinalityOutcome;
use crate::transaction::types::EngineResult;

/// Metric handles for submissions and finality tracking.
///
/// Share it behind an `Arc`; prometheus handles are internally synchronized.
#[derive(Clone)]
pub struct SubmissionMetrics {
    registry: Registry,
    /// Transactions handed to a node via `submit`.
    pub submissions_total: IntCounter,
    /// Preliminary results, labelled by result class (`success`, `retry`, ...).
    pub engine_results_total: IntCounterVec,
    /// Terminal tracking outcomes, labelled `validated`, `expired`, `failed`.
    pub outcomes_total: IntCounterVec,
    /// Tracker poll cycles (one per ledger-close interval).
    pub poll_cycles_total: IntCounter,
    /// Network or timeout errors the tracker absorbed and retried.
    pub transient_retries_total: IntCounter,
}

impl SubmissionMetrics {
    /// Creates and registers all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("ledgerline".into()), None)?;

        let submissions_total = IntCounter::new(
            "submissions_total",
            "Total number of transactions submitted to a node",
        )?;
        registry.register(Box::new(submissions_total.clone()))?;

        let engine_results_total = IntCounterVec::new(
            Opts::new(
                "engine_results_total",
                "Preliminary engine results by result class",
            ),
            &["class"],
        )?;
        registry.register(Box::new(engine_results_total.clone()))?;

        let outcomes_total = IntCounterVec::new(
            Opts::new("outcomes_total", "Terminal finality outcomes by kind"),
            &["outcome"],
        )?;
        registry.register(Box::new(outcomes_total.clone()))?;

        let poll_cycles_total = IntCounter::new(
            "poll_cycles_total",
            "Total number of finality poll cycles",
        )?;
        registry.register(Box::new(poll_cycles_total.clone()))?;

        let transient_retries_total = IntCounter::new(
            "transient_retries_total",
            "Transient transport failures retried while tracking",
        )?;
        registry.register(Box::new(transient_retries_total.clone()))?;

        Ok(Self {
            registry,
            submissions_total,
            engine_results_total,
            outcomes_total,
            poll_cycles_total,
            transient_retries_total,
        })
    }

    /// Count one submission and its preliminary result.
    pub fn record_submission(&self, result: &EngineResult) {
        self.submissions_total.inc();
        let class = format!("{:?}", result.class()).to_lowercase();
        self.engine_results_total.with_label_values(&[class.as_str()]).inc();
    }

    /// Count one terminal outcome.
    pub fn record_outcome(&self, outcome: &FinalityOutcome) {
        self.outcomes_total
            .with_label_values(&[outcome.label()])
            .inc();
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
