//! Shared fixtures for integration tests.
//!
//! [`InMemoryLedger`] is a tiny node: it accepts submissions, closes a
//! ledger every time the validated index is queried, and includes each
//! submitted transaction a configurable number of ledgers later (or never).

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;

use ledgerline_client::network::rpc::{
    RpcCommand, RpcErrorBody, ACCOUNT_NOT_FOUND, TXN_NOT_FOUND,
};
use ledgerline_client::network::{Transport, TransportError};
use ledgerline_client::transaction::codec;
use ledgerline_client::transaction::{TransactionBuilder, TransactionKind};
use ledgerline_client::Wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Included this many ledgers after the one open at submission.
    After(u32),
    /// Silently dropped: never included anywhere.
    Never,
}

#[derive(Debug, Clone)]
pub struct Submitted {
    pub hash: String,
    pub fail_hard: bool,
    pub included_at: Option<u32>,
}

struct State {
    validated: u32,
    inclusion: Inclusion,
    sequences: HashMap<String, u32>,
    submissions: Vec<Submitted>,
    log: Vec<RpcCommand>,
}

pub struct InMemoryLedger {
    state: Mutex<State>,
    network_id: u32,
}

impl InMemoryLedger {
    pub fn new(validated: u32, inclusion: Inclusion) -> Self {
        Self {
            state: Mutex::new(State {
                validated,
                inclusion,
                sequences: HashMap::new(),
                submissions: Vec::new(),
                log: Vec::new(),
            }),
            network_id: 0,
        }
    }

    pub fn fund(&self, account: &str, sequence: u32) {
        self.state.lock().sequences.insert(account.to_string(), sequence);
    }

    pub fn validated(&self) -> u32 {
        self.state.lock().validated
    }

    /// Close `n` ledgers without anyone asking.
    pub fn advance(&self, n: u32) {
        self.state.lock().validated += n;
    }

    pub fn submissions(&self) -> Vec<Submitted> {
        self.state.lock().submissions.clone()
    }

    pub fn log(&self) -> Vec<RpcCommand> {
        self.state.lock().log.clone()
    }

    pub fn count(&self, command: RpcCommand) -> usize {
        self.state.lock().log.iter().filter(|c| **c == command).count()
    }

    fn handle(&self, command: RpcCommand, params: &Value) -> Result<Value, RpcErrorBody> {
        let mut state = self.state.lock();
        state.log.push(command);
        match command {
            RpcCommand::ServerInfo => Ok(json!({ "network_id": self.network_id })),
            RpcCommand::Fee => Ok(json!({
                "base_fee": 10,
                "open_ledger_fee": 12,
                "owner_reserve": 200_000,
            })),
            RpcCommand::AccountInfo => {
                let account = params["account"].as_str().unwrap_or_default();
                match state.sequences.get(account) {
                    Some(sequence) => Ok(json!({ "account_data": { "sequence": sequence } })),
                    None => Err(RpcErrorBody {
                        code: ACCOUNT_NOT_FOUND.to_string(),
                        message: account.to_string(),
                    }),
                }
            }
            RpcCommand::Ledger => {
                state.validated += 1;
                Ok(json!({ "ledger_index": state.validated }))
            }
            RpcCommand::Submit => {
                let blob = params["tx_blob"].as_str().unwrap_or_default();
                let tx = codec::decode(blob).map_err(|e| RpcErrorBody::invalid_params(e.to_string()))?;
                let hash = codec::hash_blob(blob).map_err(|e| RpcErrorBody::invalid_params(e.to_string()))?;
                let last = tx.last_ledger_sequence.unwrap_or(u32::MAX);
                let included_at = match state.inclusion {
                    Inclusion::After(n) => Some(state.validated + 1 + n).filter(|at| *at <= last),
                    Inclusion::Never => None,
                };
                state.submissions.push(Submitted {
                    hash,
                    fail_hard: params["fail_hard"].as_bool().unwrap_or(false),
                    included_at,
                });
                Ok(json!({
                    "engine_result": "tesSUCCESS",
                    "engine_result_message": "applied to open ledger",
                    "tx_blob": blob,
                }))
            }
            RpcCommand::Tx => {
                let hash = params["transaction"].as_str().unwrap_or_default();
                let validated = state.validated;
                let found = state
                    .submissions
                    .iter()
                    .find(|s| s.hash == hash)
                    .and_then(|s| s.included_at)
                    .filter(|at| *at <= validated);
                match found {
                    Some(at) => Ok(json!({
                        "validated": true,
                        "ledger_index": at,
                        "meta": { "TransactionResult": "tesSUCCESS" },
                    })),
                    None => Err(RpcErrorBody {
                        code: TXN_NOT_FOUND.to_string(),
                        message: hash.to_string(),
                    }),
                }
            }
        }
    }
}

#[async_trait]
impl Transport for InMemoryLedger {
    async fn request(&self, command: RpcCommand, params: Value) -> Result<Value, TransportError> {
        self.handle(command, &params)
            .map_err(|e| TransportError::rpc(e.code, e.message))
    }
}

pub fn payment(wallet: &Wallet) -> TransactionBuilder {
    TransactionBuilder::new(
        wallet.address(),
        TransactionKind::Payment {
            destination: Wallet::from_seed(&[99u8; 32]).address(),
            amount: 25_000,
            destination_tag: Some(7),
        },
    )
}
