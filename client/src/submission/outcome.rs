//! Terminal results of tracking a submitted transaction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::network::transport::TransportError;
use crate::transaction::types::EngineResult;

/// What finally happened to a submitted transaction.
///
/// Every variant is terminal. `Validated` and `Expired` are facts proven by
/// the ledger; `Failed` means the client could no longer observe the
/// transaction and carries the last thing it knew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FinalityOutcome {
    /// Included in a validated ledger.
    Validated {
        /// Ledger the transaction was applied in.
        ledger_index: u32,
        /// Transaction metadata as reported by the node.
        meta: serde_json::Value,
    },
    /// The validated ledger moved past `last_ledger` without including the
    /// transaction. It can never apply.
    Expired {
        /// The transaction's `last_ledger_sequence`.
        last_ledger: u32,
        /// The validated ledger observed when expiry was detected.
        latest_ledger: u32,
    },
    /// Tracking stopped on an error the tracker cannot wait out.
    Failed {
        /// Preliminary result returned at submission.
        engine_result: EngineResult,
        /// The error that ended tracking.
        cause: TransportError,
    },
}

impl FinalityOutcome {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validated { .. } => "validated",
            Self::Expired { .. } => "expired",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, Self::Validated { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    /// Ledger of inclusion, for validated transactions.
    pub fn ledger_index(&self) -> Option<u32> {
        match self {
            Self::Validated { ledger_index, .. } => Some(*ledger_index),
            _ => None,
        }
    }
}

impl fmt::Display for FinalityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validated { ledger_index, .. } => {
                write!(f, "validated in ledger {}", ledger_index)
            }
            Self::Expired {
                last_ledger,
                latest_ledger,
            } => write!(
                f,
                "expired: last ledger {} passed (validated ledger is {})",
                last_ledger, latest_ledger
            ),
            Self::Failed {
                engine_result,
                cause,
            } => write!(f, "failed after {}: {}", engine_result.code, cause),
        }
    }
}
