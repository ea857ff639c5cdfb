//! # Transaction Assembly (Autofill)
//!
//! Fills the fields a draft needs before it can be signed: `network_id`,
//! `sequence`, `fee`, and `last_ledger_sequence`. Values the caller already
//! set are never overwritten.
//!
//! ## Fee Rules
//!
//! | Case                         | Fee                                        |
//! |------------------------------|--------------------------------------------|
//! | Regular transaction          | `max(base_fee, open_ledger_fee)`           |
//! | `AccountDelete`              | `owner_reserve`                            |
//! | Multisigned by `n` signers   | above `+ net_fee × (1 + n)`                |
//!
//! The result is capped at `max_fee_drops`, except for `AccountDelete`
//! whose fee is set by the ledger, not by the caller's budget.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::config;
use crate::network::rpc::{
    self, AccountInfoParams, AccountInfoResponse, FeeResponse, LedgerParams, LedgerResponse,
    RpcCommand, ServerInfoResponse,
};
use crate::network::transport::{Transport, TransportError};
use crate::transaction::builder::Transaction;
use crate::transaction::types::TransactionKind;

use super::error::AssembleError;

/// Fills missing fields of an unsigned draft.
#[async_trait]
pub trait Assembler: Send + Sync {
    /// Return a copy of `tx` with every required field present.
    ///
    /// `signers_count` is the number of multisign participants, when known;
    /// it raises the autofilled fee.
    async fn assemble(
        &self,
        tx: &Transaction,
        signers_count: Option<u32>,
    ) -> Result<Transaction, AssembleError>;
}

/// Assembler tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Ledgers of headroom added to the latest validated sequence.
    pub ledger_offset: u32,
    /// Fee ceiling, in drops.
    pub max_fee_drops: u64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            ledger_offset: config::LEDGER_OFFSET,
            max_fee_drops: config::DEFAULT_MAX_FEE_DROPS,
        }
    }
}

/// Assembler that queries a node for live ledger state.
pub struct LedgerAssembler {
    transport: Arc<dyn Transport>,
    config: AssemblerConfig,
}

impl LedgerAssembler {
    pub fn new(transport: Arc<dyn Transport>, config: AssemblerConfig) -> Self {
        Self { transport, config }
    }

    async fn network_id(&self, tx: &Transaction) -> Result<Option<u32>, AssembleError> {
        if tx.network_id.is_some() {
            return Ok(tx.network_id);
        }
        let info: ServerInfoResponse = rpc::call(
            self.transport.as_ref(),
            RpcCommand::ServerInfo,
            &serde_json::json!({}),
        )
        .await?;
        Ok(info
            .network_id
            .filter(|id| *id > config::RESTRICTED_NETWORK_ID_THRESHOLD))
    }

    async fn sequence(&self, tx: &Transaction) -> Result<u32, AssembleError> {
        if let Some(sequence) = tx.sequence {
            return Ok(sequence);
        }
        let params = AccountInfoParams {
            account: tx.account.clone(),
        };
        match rpc::call::<_, AccountInfoResponse>(
            self.transport.as_ref(),
            RpcCommand::AccountInfo,
            &params,
        )
        .await
        {
            Ok(info) => Ok(info.account_data.sequence),
            Err(TransportError::Rpc { code, .. }) if code == rpc::ACCOUNT_NOT_FOUND => {
                Err(AssembleError::AccountNotFound {
                    account: tx.account.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fee(&self, tx: &Transaction, signers_count: Option<u32>) -> Result<u64, AssembleError> {
        if let Some(fee) = tx.fee {
            return Ok(fee);
        }
        let schedule: FeeResponse = rpc::call(
            self.transport.as_ref(),
            RpcCommand::Fee,
            &serde_json::json!({}),
        )
        .await
        .map_err(AssembleError::FeeQuery)?;
        compute_fee(&tx.kind, &schedule, signers_count, self.config.max_fee_drops)
    }

    async fn last_ledger_sequence(&self, tx: &Transaction) -> Result<u32, AssembleError> {
        if let Some(last) = tx.last_ledger_sequence {
            return Ok(last);
        }
        let ledger: LedgerResponse = rpc::call(
            self.transport.as_ref(),
            RpcCommand::Ledger,
            &LedgerParams::validated(),
        )
        .await?;
        ledger
            .ledger_index
            .checked_add(self.config.ledger_offset)
            .ok_or_else(|| AssembleError::Validation("ledger sequence overflow".to_string()))
    }
}

#[async_trait]
impl Assembler for LedgerAssembler {
    async fn assemble(
        &self,
        tx: &Transaction,
        signers_count: Option<u32>,
    ) -> Result<Transaction, AssembleError> {
        if tx.is_signed() {
            return Err(AssembleError::Validation(
                "cannot autofill a signed transaction".to_string(),
            ));
        }
        if tx.account.is_empty() {
            return Err(AssembleError::Validation(
                "transaction has no account".to_string(),
            ));
        }

        let (network_id, sequence, fee, last_ledger_sequence) = tokio::try_join!(
            self.network_id(tx),
            self.sequence(tx),
            self.fee(tx, signers_count),
            self.last_ledger_sequence(tx),
        )?;

        let mut filled = tx.clone();
        filled.network_id = network_id;
        filled.sequence = Some(sequence);
        filled.fee = Some(fee);
        filled.last_ledger_sequence = Some(last_ledger_sequence);

        debug!(
            account = %filled.account,
            sequence,
            fee,
            last_ledger_sequence,
            ?network_id,
            "transaction assembled"
        );
        Ok(filled)
    }
}

/// Apply the fee rules to a fee schedule.
pub fn compute_fee(
    kind: &TransactionKind,
    schedule: &FeeResponse,
    signers_count: Option<u32>,
    max_fee_drops: u64,
) -> Result<u64, AssembleError> {
    let overflow = || AssembleError::Validation("fee overflow".to_string());
    let net_fee = schedule.base_fee.max(schedule.open_ledger_fee);

    let mut fee = if kind.is_irreversible() {
        schedule.owner_reserve
    } else {
        net_fee
    };

    if let Some(count) = signers_count.filter(|n| *n > 0) {
        let extra = net_fee
            .checked_mul(1 + u64::from(count))
            .ok_or_else(overflow)?;
        fee = fee.checked_add(extra).ok_or_else(overflow)?;
    }

    if kind.is_irreversible() {
        Ok(fee)
    } else {
        Ok(fee.min(max_fee_drops))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::scripted::ScriptedTransport;
    use crate::transaction::builder::TransactionBuilder;
    use serde_json::json;

    fn schedule() -> FeeResponse {
        FeeResponse {
            base_fee: 10,
            open_ledger_fee: 15,
            owner_reserve: 2_000_000,
        }
    }

    fn payment() -> TransactionKind {
        TransactionKind::Payment {
            destination: "dest".into(),
            amount: 100,
            destination_tag: None,
        }
    }

    fn delete() -> TransactionKind {
        TransactionKind::AccountDelete {
            destination: "dest".into(),
            destination_tag: None,
        }
    }

    fn scripted(network_id: u32) -> Arc<ScriptedTransport> {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .set_default(RpcCommand::ServerInfo, json!({ "network_id": network_id }))
            .set_default(
                RpcCommand::AccountInfo,
                json!({ "account_data": { "sequence": 7 } }),
            )
            .set_default(RpcCommand::Fee, schedule())
            .set_default(RpcCommand::Ledger, json!({ "ledger_index": 80 }));
        transport
    }

    #[test]
    fn fee_rules() {
        let s = schedule();
        assert_eq!(compute_fee(&payment(), &s, None, 1_000).unwrap(), 15);
        assert_eq!(compute_fee(&payment(), &s, Some(2), 1_000).unwrap(), 15 + 45);
        assert_eq!(compute_fee(&payment(), &s, Some(0), 1_000).unwrap(), 15);
        assert_eq!(compute_fee(&payment(), &s, None, 12).unwrap(), 12);
        assert_eq!(compute_fee(&delete(), &s, None, 12).unwrap(), 2_000_000);
        assert_eq!(
            compute_fee(&delete(), &s, Some(1), 12).unwrap(),
            2_000_000 + 30
        );
    }

    #[tokio::test]
    async fn fills_missing_fields_from_the_node() {
        let transport = scripted(21_338);
        let assembler = LedgerAssembler::new(transport.clone(), AssemblerConfig::default());
        let draft = TransactionBuilder::new("acct", payment()).build();

        let filled = assembler.assemble(&draft, None).await.unwrap();
        assert_eq!(filled.sequence, Some(7));
        assert_eq!(filled.fee, Some(15));
        assert_eq!(filled.last_ledger_sequence, Some(80 + config::LEDGER_OFFSET));
        assert_eq!(filled.network_id, Some(21_338));
        assert_eq!(transport.calls_for(RpcCommand::AccountInfo)[0]["account"], "acct");
    }

    #[tokio::test]
    async fn legacy_network_id_is_left_out() {
        let assembler = LedgerAssembler::new(scripted(1), AssemblerConfig::default());
        let draft = TransactionBuilder::new("acct", payment()).build();
        let filled = assembler.assemble(&draft, None).await.unwrap();
        assert_eq!(filled.network_id, None);
    }

    #[tokio::test]
    async fn caller_values_are_kept_and_not_queried() {
        let transport = scripted(5_000);
        let assembler = LedgerAssembler::new(transport.clone(), AssemblerConfig::default());
        let draft = TransactionBuilder::new("acct", payment())
            .fee(99)
            .sequence(3)
            .last_ledger_sequence(500)
            .network_id(5_000)
            .build();

        let filled = assembler.assemble(&draft, None).await.unwrap();
        assert_eq!(filled, draft);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_account_is_reported() {
        let transport = scripted(0);
        transport.push_err(
            RpcCommand::AccountInfo,
            TransportError::rpc(rpc::ACCOUNT_NOT_FOUND, "no such account"),
        );
        let assembler = LedgerAssembler::new(transport, AssemblerConfig::default());
        let draft = TransactionBuilder::new("ghost", payment()).build();

        let err = assembler.assemble(&draft, None).await.unwrap_err();
        assert_eq!(
            err,
            AssembleError::AccountNotFound {
                account: "ghost".into()
            }
        );
    }

    #[tokio::test]
    async fn fee_query_failure_is_distinguished() {
        let transport = scripted(0);
        transport.push_err(RpcCommand::Fee, TransportError::Network("down".into()));
        let assembler = LedgerAssembler::new(transport, AssemblerConfig::default());
        let draft = TransactionBuilder::new("acct", payment()).build();

        let err = assembler.assemble(&draft, None).await.unwrap_err();
        assert!(matches!(err, AssembleError::FeeQuery(_)));
        assert!(err.is_retryable());
    }
}
