//! # Hashing Utilities
//!
//! Two hash constructions cover everything the client needs:
//!
//! - **SHA-512Half**: the first 32 bytes of SHA-512. Transaction ids and
//!   signing payload digests use it. Half of SHA-512 is faster than SHA-256
//!   on 64-bit hardware and still leaves 256 bits of output.
//! - **SHA-256**: account id derivation and the double-SHA-256 checksum
//!   appended to encoded addresses.

use sha2::{Digest, Sha256, Sha512};

/// Compute the SHA-256 hash of the input data as a fixed-size array.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute `SHA-256(SHA-256(data))`.
///
/// Used for the 4-byte checksum on encoded addresses, where a typo should
/// fail loudly instead of sending funds into the void.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute SHA-512 over the concatenation of `parts` and keep the first
/// 32 bytes.
///
/// Taking the parts as a slice lets callers hash `prefix || payload`
/// without first copying both into one buffer.
///
/// # Example
///
/// ```
/// use ledgerline_client::crypto::hash::sha512_half;
///
/// let digest = sha512_half(&[&b"TXN\0"[..], &b"payload"[..]]);
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha512_half(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result[..32]);
    output
}
