//! # Submission Gateway
//!
//! Hands a signed transaction to a node and reports the node's preliminary
//! opinion. The gateway never waits for a ledger: an [`EngineResult`] is
//! one server's local view at submission time, not a finality verdict.
//!
//! ## Wire Format
//!
//! ```text
//! submit { tx_blob, fail_hard }  ->  { engine_result, engine_result_message, tx_blob }
//! ```

use std::sync::Arc;
use tracing::{debug, info};

use crate::metrics::SubmissionMetrics;
use crate::network::rpc::{self, RpcCommand, SubmitParams, SubmitResponse};
use crate::network::transport::Transport;
use crate::transaction::signing::SignedTransaction;
use crate::transaction::types::EngineResult;

use super::error::SubmitError;

/// Transmits signed transactions to a node.
#[derive(Clone)]
pub struct SubmissionGateway {
    transport: Arc<dyn Transport>,
    metrics: Option<Arc<SubmissionMetrics>>,
}

impl SubmissionGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            metrics: None,
        }
    }

    /// Record submissions into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<SubmissionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Submit `signed` and return the node's preliminary result.
    ///
    /// Irreversible transaction kinds are always sent with `fail_hard` set,
    /// whatever the caller asked for.
    ///
    /// # Errors
    ///
    /// * [`SubmitError::Validation`] if the payload carries no signature.
    /// * [`SubmitError::Transport`] if the node is unreachable, answers with
    ///   an error, or omits `engine_result`.
    pub async fn submit(
        &self,
        signed: &SignedTransaction,
        fail_hard: bool,
    ) -> Result<EngineResult, SubmitError> {
        let source = signed.source();
        if !source.is_signed() {
            return Err(SubmitError::validation("refusing to submit an unsigned payload"));
        }

        let fail_hard = fail_hard || source.kind.is_irreversible();
        debug!(
            hash = signed.hash(),
            kind = %source.kind,
            fail_hard,
            "submitting transaction"
        );

        let params = SubmitParams {
            tx_blob: signed.blob().to_string(),
            fail_hard,
        };
        let response: SubmitResponse =
            rpc::call(self.transport.as_ref(), RpcCommand::Submit, &params).await?;
        let result = EngineResult::new(response.engine_result, response.engine_result_message);

        info!(
            hash = signed.hash(),
            engine_result = %result.code,
            "transaction submitted"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_submission(&result);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Wallet;
    use crate::network::scripted::ScriptedTransport;
    use crate::network::transport::TransportError;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::signing::Signer;
    use crate::transaction::types::TransactionKind;
    use serde_json::json;

    fn signed(kind: TransactionKind) -> SignedTransaction {
        let wallet = Wallet::from_seed(&[7u8; 32]);
        let tx = TransactionBuilder::new(wallet.address(), kind)
            .fee(12)
            .sequence(3)
            .last_ledger_sequence(40)
            .build();
        wallet.sign(&tx, false).unwrap()
    }

    fn payment() -> TransactionKind {
        TransactionKind::Payment {
            destination: "dest".into(),
            amount: 5,
            destination_tag: None,
        }
    }

    #[tokio::test]
    async fn submit_sends_blob_and_returns_engine_result() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(
            RpcCommand::Submit,
            json!({ "engine_result": "tesSUCCESS", "engine_result_message": "applied" }),
        );
        let gateway = SubmissionGateway::new(transport.clone());
        let tx = signed(payment());

        let result = gateway.submit(&tx, false).await.unwrap();
        assert!(result.is_success());

        let calls = transport.calls_for(RpcCommand::Submit);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["tx_blob"], tx.blob());
        assert_eq!(calls[0]["fail_hard"], false);
    }

    #[tokio::test]
    async fn account_delete_forces_fail_hard() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.set_default(
            RpcCommand::Submit,
            json!({ "engine_result": "tesSUCCESS", "engine_result_message": "" }),
        );
        let gateway = SubmissionGateway::new(transport.clone());
        let tx = signed(TransactionKind::AccountDelete {
            destination: "dest".into(),
            destination_tag: None,
        });

        gateway.submit(&tx, false).await.unwrap();
        assert_eq!(transport.calls_for(RpcCommand::Submit)[0]["fail_hard"], true);
    }

    #[tokio::test]
    async fn local_rejection_is_not_an_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(
            RpcCommand::Submit,
            json!({ "engine_result": "telINSUF_FEE_P", "engine_result_message": "fee too low" }),
        );
        let gateway = SubmissionGateway::new(transport);

        let result = gateway.submit(&signed(payment()), false).await.unwrap();
        assert!(!result.is_success());
        assert_eq!(result.code, "telINSUF_FEE_P");
    }

    #[tokio::test]
    async fn transport_failures_are_retryable_and_missing_result_is_decode() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_err(RpcCommand::Submit, TransportError::Network("refused".into()))
            .push_ok(RpcCommand::Submit, json!({ "engine_result_message": "?" }));
        let gateway = SubmissionGateway::new(transport);
        let tx = signed(payment());

        let err = gateway.submit(&tx, false).await.unwrap_err();
        assert!(err.is_retryable());

        let err = gateway.submit(&tx, false).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Transport(TransportError::Decode { .. })
        ));
    }
}
