//! Canonical binary encoding of transactions.
//!
//! Transactions travel as `tx_blob`: the upper-case hex of a fixed-width,
//! little-endian bincode encoding. Fixed-width integers and the absence of
//! maps give every transaction exactly one byte representation, which is
//! what makes the two round-trip laws hold:
//!
//! - `decode(encode(tx)) == tx` for every transaction;
//! - `encode(decode(blob)) == blob` for every well-formed blob.
//!
//! A well-formed blob is non-empty, upper-case hex, decodes without
//! trailing bytes, and stays under [`MAX_TX_BLOB_BYTES`].

use bincode::Options;
use thiserror::Error;

use super::builder::Transaction;
use crate::config::{
    HASH_PREFIX_MULTISIGN, HASH_PREFIX_SIGN, HASH_PREFIX_TRANSACTION_ID, MAX_TX_BLOB_BYTES,
};
use crate::crypto::hash::sha512_half;

/// Encoding and decoding failures. Always a caller problem, never retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The transaction could not be serialized.
    #[error("failed to encode transaction: {0}")]
    Encode(String),

    /// The blob is not canonical upper-case hex.
    #[error("blob is not canonical upper-case hex")]
    NonCanonicalHex,

    /// The blob's bytes do not describe a transaction.
    #[error("failed to decode transaction blob: {0}")]
    Decode(String),
}

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_TX_BLOB_BYTES)
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn to_bytes(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    wire_options()
        .serialize(tx)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

fn is_canonical_hex(blob: &str) -> bool {
    !blob.is_empty()
        && blob.len() % 2 == 0
        && blob
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

fn blob_bytes(blob: &str) -> Result<Vec<u8>, CodecError> {
    if !is_canonical_hex(blob) {
        return Err(CodecError::NonCanonicalHex);
    }
    hex::decode(blob).map_err(|_| CodecError::NonCanonicalHex)
}

/// Encode a transaction into its canonical `tx_blob`.
pub fn encode(tx: &Transaction) -> Result<String, CodecError> {
    Ok(hex::encode_upper(to_bytes(tx)?))
}

/// Decode a canonical `tx_blob`.
pub fn decode(blob: &str) -> Result<Transaction, CodecError> {
    let bytes = blob_bytes(blob)?;
    wire_options()
        .deserialize(&bytes)
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Bytes a single signer signs: `"STX\0" || encode(tx without signatures)`.
pub fn encode_for_signing(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    let body = to_bytes(&tx.without_signatures())?;
    let mut payload = Vec::with_capacity(HASH_PREFIX_SIGN.len() + body.len());
    payload.extend_from_slice(&HASH_PREFIX_SIGN);
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Bytes one multisign participant signs:
/// `"SMT\0" || encode(tx without signatures) || signer_account_id`.
///
/// Appending the account id keeps one participant's signature from being
/// replayed as another's.
pub fn encode_for_multisigning(
    tx: &Transaction,
    signer_account_id: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let body = to_bytes(&tx.without_signatures())?;
    let mut payload =
        Vec::with_capacity(HASH_PREFIX_MULTISIGN.len() + body.len() + signer_account_id.len());
    payload.extend_from_slice(&HASH_PREFIX_MULTISIGN);
    payload.extend_from_slice(&body);
    payload.extend_from_slice(signer_account_id);
    Ok(payload)
}

/// Identifying hash of a signed blob: upper-case hex of
/// `sha512_half("TXN\0" || blob_bytes)`.
pub fn hash_blob(blob: &str) -> Result<String, CodecError> {
    let bytes = blob_bytes(blob)?;
    Ok(hex::encode_upper(sha512_half(&[
        HASH_PREFIX_TRANSACTION_ID.as_slice(),
        bytes.as_slice(),
    ])))
}
