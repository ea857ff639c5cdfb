//! # Node RPC Definitions
//!
//! Type-safe definitions of the commands the client sends to a ledger node
//! and the payloads it expects back. The envelope is JSON; every request
//! carries a unique `id` that the node echoes, which is how a single
//! connection multiplexes many in-flight requests.
//!
//! ## Command Index
//!
//! | Command        | Purpose                                         |
//! |----------------|-------------------------------------------------|
//! | `submit`       | Relay a signed blob, get a preliminary verdict  |
//! | `tx`           | Look up a transaction by hash                   |
//! | `ledger`       | Latest validated ledger sequence                |
//! | `account_info` | Account sequence number (autofill)              |
//! | `fee`          | Current fee schedule (autofill)                 |
//! | `server_info`  | Network id (autofill)                           |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::transport::{Transport, TransportError};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Supported node commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcCommand {
    /// Submit a signed transaction blob.
    Submit,
    /// Look up a transaction by hash.
    Tx,
    /// Query a ledger header (used for the latest validated index).
    Ledger,
    /// Query account state.
    AccountInfo,
    /// Query the fee schedule.
    Fee,
    /// Query server status.
    ServerInfo,
}

impl RpcCommand {
    /// Wire name of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Tx => "tx",
            Self::Ledger => "ledger",
            Self::AccountInfo => "account_info",
            Self::Fee => "fee",
            Self::ServerInfo => "server_info",
        }
    }
}

impl fmt::Display for RpcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A request frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Correlation id. Echoed back in the response.
    pub id: String,
    /// The command to run.
    pub method: RpcCommand,
    /// Command-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    /// Creates a new request frame.
    pub fn new(id: impl Into<String>, method: RpcCommand, params: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            method,
            params,
        }
    }
}

/// A response frame.
///
/// Exactly one of `result` or `error` is set by a conforming node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Id of the request this answers.
    pub id: String,
    /// Successful result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl RpcResponse {
    /// Creates a successful response.
    pub fn success(id: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(id: impl Into<String>, error: RpcErrorBody) -> Self {
        Self {
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }

    /// Unwraps the envelope into the transport's result type.
    pub fn into_result(self, command: RpcCommand) -> Result<serde_json::Value, TransportError> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(TransportError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(TransportError::Decode {
                command: command.to_string(),
                reason: "response carries neither result nor error".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error code for a transaction the node has never seen (or not yet).
pub const TXN_NOT_FOUND: &str = "txnNotFound";

/// Error code for an account absent from the ledger.
pub const ACCOUNT_NOT_FOUND: &str = "actNotFound";

/// Error code for malformed parameters.
pub const INVALID_PARAMS: &str = "invalidParams";

/// Error code for a node-side failure.
pub const INTERNAL: &str = "internal";

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    /// Machine-readable error token, e.g. `txnNotFound`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl RpcErrorBody {
    /// The transaction is unknown to the node.
    pub fn transaction_not_found(hash: &str) -> Self {
        Self {
            code: TXN_NOT_FOUND.to_string(),
            message: format!("transaction not found: {}", hash),
        }
    }

    /// The account does not exist.
    pub fn account_not_found(account: &str) -> Self {
        Self {
            code: ACCOUNT_NOT_FOUND.to_string(),
            message: format!("account not found: {}", account),
        }
    }

    /// The parameters could not be understood.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS.to_string(),
            message: msg.into(),
        }
    }

    /// The node failed internally.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            code: INTERNAL.to_string(),
            message: msg.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed Payloads
// ---------------------------------------------------------------------------

/// Parameters for `submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitParams {
    /// Canonical hex blob.
    pub tx_blob: String,
    /// Ask the node not to relay or queue on local failure.
    pub fail_hard: bool,
}

/// Result of `submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Preliminary result token.
    pub engine_result: String,
    /// Human-readable explanation.
    #[serde(default)]
    pub engine_result_message: String,
    /// Blob the node received, echoed back.
    #[serde(default)]
    pub tx_blob: Option<String>,
}

/// Parameters for `tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    /// Upper-case hex transaction hash.
    pub transaction: String,
}

/// Result of `tx`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxResponse {
    /// Whether the ledger containing the transaction has been validated.
    #[serde(default)]
    pub validated: bool,
    /// Ledger the transaction was applied in.
    #[serde(default)]
    pub ledger_index: Option<u32>,
    /// Transaction metadata (final result code, affected nodes).
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

/// Parameters for `ledger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Ledger selector. The client only asks for `"validated"`.
    pub ledger_index: String,
}

impl LedgerParams {
    /// Selects the latest validated ledger.
    pub fn validated() -> Self {
        Self {
            ledger_index: "validated".to_string(),
        }
    }
}

/// Result of `ledger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResponse {
    /// Sequence number of the selected ledger.
    pub ledger_index: u32,
}

/// Parameters for `account_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfoParams {
    /// Account address.
    pub account: String,
}

/// Account state returned by `account_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    /// Next sequence number the account must use.
    pub sequence: u32,
}

/// Result of `account_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfoResponse {
    /// Account state.
    pub account_data: AccountData,
}

/// Result of `fee`. All values in drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeResponse {
    /// Minimum fee for a reference transaction.
    pub base_fee: u64,
    /// Fee needed to get into the current open ledger.
    pub open_ledger_fee: u64,
    /// Incremental owner reserve; the fee an AccountDelete must pay.
    pub owner_reserve: u64,
}

/// Result of `server_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfoResponse {
    /// Network id of the server's chain, if it reports one.
    #[serde(default)]
    pub network_id: Option<u32>,
}

/// Issue `command` with typed parameters and decode the typed result.
pub async fn call<P, R>(
    transport: &dyn Transport,
    command: RpcCommand,
    params: &P,
) -> Result<R, TransportError>
where
    P: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let params = serde_json::to_value(params).map_err(|e| TransportError::Decode {
        command: command.to_string(),
        reason: e.to_string(),
    })?;
    let value = transport.request(command, params).await?;
    serde_json::from_value(value).map_err(|e| TransportError::Decode {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_command_name() {
        let req = RpcRequest::new("1", RpcCommand::AccountInfo, serde_json::json!({}));
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"account_info\""));

        let recovered: RpcRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered.method, RpcCommand::AccountInfo);
    }

    #[test]
    fn all_commands_match_their_wire_names() {
        let commands = [
            RpcCommand::Submit,
            RpcCommand::Tx,
            RpcCommand::Ledger,
            RpcCommand::AccountInfo,
            RpcCommand::Fee,
            RpcCommand::ServerInfo,
        ];
        for command in commands {
            let json = serde_json::to_string(&command).unwrap();
            assert_eq!(json, format!("\"{}\"", command.as_str()));
        }
    }

    #[test]
    fn error_envelope_becomes_rpc_error() {
        let resp = RpcResponse::error("7", RpcErrorBody::transaction_not_found("ABC"));
        let err = resp.into_result(RpcCommand::Tx).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn empty_envelope_is_a_decode_error() {
        let resp = RpcResponse {
            id: "1".into(),
            result: None,
            error: None,
        };
        assert!(matches!(
            resp.into_result(RpcCommand::Ledger),
            Err(TransportError::Decode { .. })
        ));
    }

    #[test]
    fn tx_response_defaults_to_unvalidated() {
        let resp: TxResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!resp.validated);
        assert_eq!(resp.ledger_index, None);
    }
}
