//! Transaction drafts and their fluent builder.
//!
//! A [`Transaction`] is a mutable draft: it can be completely unsigned,
//! partially assembled (fee, sequence, expiry filled in), or handed over by
//! the caller fully formed. Signing happens elsewhere and produces an
//! immutable [`super::SignedTransaction`].

use serde::{Deserialize, Serialize};

use super::types::{Memo, SignerEntry, TransactionKind};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A ledger transaction draft.
///
/// Fields that the assembler can compute (`fee`, `sequence`,
/// `last_ledger_sequence`, `network_id`) are `Option` so a draft can be
/// submitted with autofill and still carry whatever the caller pinned
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sending account address.
    pub account: String,

    /// Operation and its type-specific fields.
    pub kind: TransactionKind,

    /// Fee in drops.
    #[serde(default)]
    pub fee: Option<u64>,

    /// Sending account's sequence number.
    #[serde(default)]
    pub sequence: Option<u32>,

    /// Highest ledger this transaction may be included in. Once the
    /// validated ledger passes this value the transaction can never apply.
    #[serde(default)]
    pub last_ledger_sequence: Option<u32>,

    /// Network id, required on networks whose id exceeds 1024.
    #[serde(default)]
    pub network_id: Option<u32>,

    /// Transaction flags.
    #[serde(default)]
    pub flags: u32,

    /// Attached memos.
    #[serde(default)]
    pub memos: Vec<Memo>,

    /// Upper-case hex public key of the single signer. Empty string for
    /// multi-signed transactions.
    #[serde(default)]
    pub signing_pub_key: Option<String>,

    /// Upper-case hex single signature.
    #[serde(default)]
    pub txn_signature: Option<String>,

    /// Multi-signature entries, sorted by account.
    #[serde(default)]
    pub signers: Vec<SignerEntry>,
}

impl Transaction {
    /// Returns `true` if the transaction carries a single signature or at
    /// least one multisign entry.
    pub fn is_signed(&self) -> bool {
        self.txn_signature.is_some() || !self.signers.is_empty()
    }

    /// Returns a copy with every signature field cleared. This is the form
    /// that signing payloads are computed over.
    pub fn without_signatures(&self) -> Self {
        Self {
            txn_signature: None,
            signers: Vec::new(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`] drafts.
///
/// # Usage
///
/// ```rust
/// use ledgerline_client::transaction::{TransactionBuilder, TransactionKind};
///
/// let tx = TransactionBuilder::new(
///     "sender-address",
///     TransactionKind::Payment {
///         destination: "receiver-address".into(),
///         amount: 1_000_000,
///         destination_tag: None,
///     },
/// )
/// .fee(12)
/// .sequence(7)
/// .last_ledger_sequence(120)
/// .build();
///
/// assert!(!tx.is_signed());
/// ```
pub struct TransactionBuilder {
    account: String,
    kind: TransactionKind,
    fee: Option<u64>,
    sequence: Option<u32>,
    last_ledger_sequence: Option<u32>,
    network_id: Option<u32>,
    flags: u32,
    memos: Vec<Memo>,
}

impl TransactionBuilder {
    /// Starts a draft for `account` performing `kind`. Every optional field
    /// starts empty so the assembler can fill it.
    pub fn new(account: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            account: account.into(),
            kind,
            fee: None,
            sequence: None,
            last_ledger_sequence: None,
            network_id: None,
            flags: 0,
            memos: Vec::new(),
        }
    }

    /// Pins the fee in drops.
    pub fn fee(mut self, drops: u64) -> Self {
        self.fee = Some(drops);
        self
    }

    /// Pins the account sequence.
    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Pins the expiry ledger.
    pub fn last_ledger_sequence(mut self, ledger: u32) -> Self {
        self.last_ledger_sequence = Some(ledger);
        self
    }

    /// Pins the network id.
    pub fn network_id(mut self, network_id: u32) -> Self {
        self.network_id = Some(network_id);
        self
    }

    /// Sets transaction flags.
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Appends a memo.
    pub fn memo(mut self, memo_type: Option<String>, memo_data: Vec<u8>) -> Self {
        self.memos.push(Memo {
            memo_type,
            memo_data,
        });
        self
    }

    /// Consumes the builder and returns the unsigned draft.
    pub fn build(self) -> Transaction {
        Transaction {
            account: self.account,
            kind: self.kind,
            fee: self.fee,
            sequence: self.sequence,
            last_ledger_sequence: self.last_ledger_sequence,
            network_id: self.network_id,
            flags: self.flags,
            memos: self.memos,
            signing_pub_key: None,
            txn_signature: None,
            signers: Vec::new(),
        }
    }
}
