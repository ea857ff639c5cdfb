//! Transaction signing.
//!
//! Signing turns a mutable [`Transaction`] draft into an immutable
//! [`SignedTransaction`]: the canonical blob, its identifying hash, and the
//! decoded source. Anything that can sign implements [`Signer`]; the
//! built-in [`Wallet`] signs with an Ed25519 key.
//!
//! Multi-signing is a two-step affair: every participant signs the same
//! draft with `multisign = true`, then [`combine_multisigned`] merges their
//! signer entries into one submittable transaction.

use crate::crypto::keys::{decode_address, verify_hex, Wallet};
use crate::submission::SubmitError;

use super::builder::Transaction;
use super::codec;
use super::types::SignerEntry;

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A signed transaction ready for submission.
///
/// Immutable once built: the hash always identifies exactly this blob.
/// Signing the same draft with a different signer set produces a different
/// blob and therefore a different hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    blob: String,
    hash: String,
    source: Transaction,
}

impl SignedTransaction {
    /// Wrap a transaction that already carries its signatures.
    pub fn from_transaction(tx: Transaction) -> Result<Self, SubmitError> {
        if !tx.is_signed() {
            return Err(SubmitError::validation(
                "transaction carries no signature or signers",
            ));
        }
        let blob = codec::encode(&tx)?;
        let hash = codec::hash_blob(&blob)?;
        Ok(Self {
            blob,
            hash,
            source: tx,
        })
    }

    /// Decode a pre-signed `tx_blob`.
    pub fn from_blob(blob: &str) -> Result<Self, SubmitError> {
        let source = codec::decode(blob)?;
        if !source.is_signed() {
            return Err(SubmitError::validation(
                "blob decodes to an unsigned transaction",
            ));
        }
        let hash = codec::hash_blob(blob)?;
        Ok(Self {
            blob: blob.to_string(),
            hash,
            source,
        })
    }

    /// Canonical upper-case hex payload.
    pub fn blob(&self) -> &str {
        &self.blob
    }

    /// Upper-case hex transaction id.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The decoded transaction behind the blob.
    pub fn source(&self) -> &Transaction {
        &self.source
    }

    /// The expiry bound captured at signing time, if any.
    pub fn last_ledger_sequence(&self) -> Option<u32> {
        self.source.last_ledger_sequence
    }
}

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// Anything that can produce signatures over a transaction draft.
///
/// Signing is synchronous: keys are local. Remote or hardware signers wrap
/// their own runtime behind this interface.
pub trait Signer: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> String;

    /// Sign `tx`. With `multisign` set, produce a single [`SignerEntry`]
    /// instead of a top-level signature.
    ///
    /// Drafts that already carry signatures are rejected with
    /// [`SubmitError::Validation`].
    fn sign(&self, tx: &Transaction, multisign: bool) -> Result<SignedTransaction, SubmitError>;
}

impl Signer for Wallet {
    fn address(&self) -> String {
        Wallet::address(self)
    }

    fn sign(&self, tx: &Transaction, multisign: bool) -> Result<SignedTransaction, SubmitError> {
        if tx.is_signed() {
            return Err(SubmitError::validation(
                "transaction must not already contain a signature or signers",
            ));
        }
        if tx.account.is_empty() {
            return Err(SubmitError::validation("transaction has no account"));
        }

        let mut draft = tx.clone();
        if multisign {
            draft.signing_pub_key = Some(String::new());
            let payload = codec::encode_for_multisigning(&draft, &self.account_id())?;
            draft.signers = vec![SignerEntry {
                account: Wallet::address(self),
                signing_pub_key: self.public_key_hex(),
                txn_signature: hex::encode_upper(self.sign_bytes(&payload)),
            }];
        } else {
            draft.signing_pub_key = Some(self.public_key_hex());
            let payload = codec::encode_for_signing(&draft)?;
            draft.txn_signature = Some(hex::encode_upper(self.sign_bytes(&payload)));
        }

        SignedTransaction::from_transaction(draft)
    }
}

// ---------------------------------------------------------------------------
// Multisign combination & verification
// ---------------------------------------------------------------------------

/// Merge individually multi-signed copies of the same draft.
///
/// Every input must be multi-signed over an identical draft. Signer entries
/// are sorted by account id, and the same account may only sign once.
pub fn combine_multisigned(parts: &[SignedTransaction]) -> Result<SignedTransaction, SubmitError> {
    let first = parts
        .first()
        .ok_or_else(|| SubmitError::validation("no multisigned transactions to combine"))?;
    let base = first.source().without_signatures();

    let mut entries: Vec<([u8; 20], SignerEntry)> = Vec::new();
    for part in parts {
        let source = part.source();
        if source.txn_signature.is_some() || source.signers.is_empty() {
            return Err(SubmitError::validation(format!(
                "transaction {} is not multisigned",
                part.hash()
            )));
        }
        if source.without_signatures() != base {
            return Err(SubmitError::validation(
                "multisigned transactions do not share the same draft",
            ));
        }
        for entry in &source.signers {
            let id = decode_address(&entry.account)?;
            if entries.iter().any(|(existing, _)| *existing == id) {
                return Err(SubmitError::validation(format!(
                    "duplicate signer {}",
                    entry.account
                )));
            }
            entries.push((id, entry.clone()));
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut combined = base;
    combined.signers = entries.into_iter().map(|(_, entry)| entry).collect();
    SignedTransaction::from_transaction(combined)
}

/// Check every signature a transaction carries.
pub fn verify_signatures(tx: &Transaction) -> Result<(), SubmitError> {
    if !tx.signers.is_empty() {
        for entry in &tx.signers {
            let account_id = decode_address(&entry.account)?;
            let payload = codec::encode_for_multisigning(tx, &account_id)?;
            if !verify_hex(&entry.signing_pub_key, &payload, &entry.txn_signature)? {
                return Err(SubmitError::validation(format!(
                    "invalid signature from signer {}",
                    entry.account
                )));
            }
        }
        return Ok(());
    }

    let signature = tx
        .txn_signature
        .as_deref()
        .ok_or_else(|| SubmitError::validation("transaction is not signed"))?;
    let public_key = tx
        .signing_pub_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| SubmitError::validation("signed transaction has no signing key"))?;
    let payload = codec::encode_for_signing(tx)?;
    if !verify_hex(public_key, &payload, signature)? {
        return Err(SubmitError::validation("invalid transaction signature"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
