//! The request/response seam between the client and a ledger node.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::rpc::{RpcCommand, TXN_NOT_FOUND};

/// Failures a transport can report.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransportError {
    /// The node could not be reached, or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// No response arrived within the per-request timeout.
    #[error("{command} timed out after {after:?}")]
    Timeout {
        /// Command that timed out.
        command: String,
        /// Timeout that elapsed.
        after: Duration,
    },

    /// The node answered with an error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// Machine-readable error token.
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// The node answered with something the client cannot parse.
    #[error("malformed {command} response: {reason}")]
    Decode {
        /// Command whose response was malformed.
        command: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl TransportError {
    /// Shorthand for an [`TransportError::Rpc`].
    pub fn rpc(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rpc {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Network and timeout failures may clear up on their own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }

    /// Returns `true` for the node's "transaction not found" answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rpc { code, .. } if code == TXN_NOT_FOUND)
    }
}

/// Sends one command to a node and returns its result.
///
/// Implementations must allow many concurrent `request` calls on one shared
/// instance, each with its own timeout. The client never serializes access.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `command` with `params` and wait for the matching response.
    async fn request(
        &self,
        command: RpcCommand,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;
}
