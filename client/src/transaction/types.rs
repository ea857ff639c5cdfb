//! Core type definitions for ledger transactions.
//!
//! Every type in this file participates in the canonical binary encoding,
//! so serde attributes are limited to what a sequential format can
//! round-trip: no `skip_serializing_if`, no internally tagged enums, no
//! maps with ambiguous ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// The operation a transaction performs, with its type-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Move native value from `account` to `destination`.
    Payment {
        /// Receiving account address.
        destination: String,
        /// Amount in drops.
        amount: u64,
        /// Optional tag identifying a sub-account at the destination.
        destination_tag: Option<u32>,
    },
    /// Change account-level flags.
    AccountSet {
        /// Flag to enable.
        set_flag: Option<u32>,
        /// Flag to disable.
        clear_flag: Option<u32>,
    },
    /// Assign or remove the account's regular signing key.
    SetRegularKey {
        /// New regular key address. `None` removes the current one.
        regular_key: Option<String>,
    },
    /// Delete the sending account and send its remaining balance to
    /// `destination`. Cannot be undone.
    AccountDelete {
        /// Account that receives the remaining balance.
        destination: String,
        /// Optional destination tag.
        destination_tag: Option<u32>,
    },
}

impl TransactionKind {
    /// Short name of the transaction type, used in logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Payment { .. } => "Payment",
            Self::AccountSet { .. } => "AccountSet",
            Self::SetRegularKey { .. } => "SetRegularKey",
            Self::AccountDelete { .. } => "AccountDelete",
        }
    }

    /// Returns `true` for kinds whose effect on the ledger cannot be
    /// reversed. These are always submitted with `fail_hard` set so a node
    /// never relays them after a local failure.
    pub fn is_irreversible(&self) -> bool {
        matches!(self, Self::AccountDelete { .. })
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Memo & SignerEntry
// ---------------------------------------------------------------------------

/// Arbitrary data attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    /// Application-defined memo type (e.g. a MIME type).
    pub memo_type: Option<String>,
    /// Memo payload bytes.
    pub memo_data: Vec<u8>,
}

/// One signature in a multi-signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerEntry {
    /// Address of the signing account.
    pub account: String,
    /// Upper-case hex public key that produced `txn_signature`.
    pub signing_pub_key: String,
    /// Upper-case hex Ed25519 signature over the multisign payload.
    pub txn_signature: String,
}

// ---------------------------------------------------------------------------
// EngineResult
// ---------------------------------------------------------------------------

/// A node's preliminary verdict on a submitted transaction.
///
/// This is one server's local opinion at submission time. A `tesSUCCESS`
/// here does not mean the transaction made it into a validated ledger, and
/// a `ter` retry code does not mean it never will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResult {
    /// Result token such as `tesSUCCESS` or `temMALFORMED`.
    pub code: String,
    /// Human-readable explanation from the node.
    pub message: String,
}

/// Result classes, derived from the three-letter prefix of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineResultClass {
    /// `tes`: applied to the open ledger.
    Success,
    /// `tec`: claimed a fee but did not achieve its intent.
    Claimed,
    /// `ter`: could not be applied yet; may succeed later.
    Retry,
    /// `tef`: failed against the current ledger state.
    Failure,
    /// `tem`: malformed; will never succeed as written.
    Malformed,
    /// `tel`: rejected by this node's local policy.
    Local,
    /// Anything else.
    Unknown,
}

impl EngineResult {
    /// Creates a new engine result.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Classify the result by its prefix.
    pub fn class(&self) -> EngineResultClass {
        match self.code.get(..3) {
            Some("tes") => EngineResultClass::Success,
            Some("tec") => EngineResultClass::Claimed,
            Some("ter") => EngineResultClass::Retry,
            Some("tef") => EngineResultClass::Failure,
            Some("tem") => EngineResultClass::Malformed,
            Some("tel") => EngineResultClass::Local,
            _ => EngineResultClass::Unknown,
        }
    }

    /// Returns `true` if the node applied the transaction to its open ledger.
    pub fn is_success(&self) -> bool {
        self.class() == EngineResultClass::Success
    }
}

impl fmt::Display for EngineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_account_delete_is_irreversible() {
        let delete = TransactionKind::AccountDelete {
            destination: "dest".into(),
            destination_tag: None,
        };
        let payment = TransactionKind::Payment {
            destination: "dest".into(),
            amount: 1,
            destination_tag: None,
        };
        assert!(delete.is_irreversible());
        assert!(!payment.is_irreversible());
        assert!(!TransactionKind::AccountSet {
            set_flag: None,
            clear_flag: None
        }
        .is_irreversible());
    }

    #[test]
    fn engine_result_classes() {
        let cases = [
            ("tesSUCCESS", EngineResultClass::Success),
            ("tecNO_DST", EngineResultClass::Claimed),
            ("terQUEUED", EngineResultClass::Retry),
            ("tefPAST_SEQ", EngineResultClass::Failure),
            ("temMALFORMED", EngineResultClass::Malformed),
            ("telINSUF_FEE_P", EngineResultClass::Local),
            ("??", EngineResultClass::Unknown),
        ];
        for (code, class) in cases {
            assert_eq!(EngineResult::new(code, "").class(), class, "{code}");
        }
        assert!(EngineResult::new("tesSUCCESS", "ok").is_success());
        assert!(!EngineResult::new("tecNO_DST", "").is_success());
    }

    #[test]
    fn kind_display_uses_name() {
        let kind = TransactionKind::SetRegularKey { regular_key: None };
        assert_eq!(kind.to_string(), "SetRegularKey");
    }
}
