//! # Key Management
//!
//! Ed25519 wallets and the account addresses derived from them.
//!
//! An account address is `base58(account_id || checksum)` where
//! `account_id = sha256(public_key)[..20]` and `checksum` is the first four
//! bytes of `double_sha256(account_id)`. The checksum makes a mistyped
//! address fail to decode rather than silently naming a different account.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (ed25519-dalek does this for us).
//! - Key generation uses `OsRng`.
//! - Key bytes are never logged, and `Debug` only shows the address.

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use super::hash::{double_sha256, sha256};
use crate::config::ACCOUNT_ID_LENGTH;

/// Errors that can occur during key and address operations.
///
/// Deliberately vague about *why* a secret failed to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid secret key: expected 32 bytes of hex")]
    InvalidSecretKey,

    #[error("invalid public key: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// An Ed25519 signing wallet.
///
/// Implements [`crate::transaction::Signer`] so it can be handed straight to
/// [`crate::submission::SubmitOptions::wallet`].
///
/// # Examples
///
/// ```
/// use ledgerline_client::crypto::keys::Wallet;
///
/// let wallet = Wallet::generate();
/// let sig = wallet.sign_bytes(b"payload");
/// assert!(wallet.verify_bytes(b"payload", &sig));
/// ```
pub struct Wallet {
    signing_key: SigningKey,
}

impl Wallet {
    /// Generate a fresh wallet using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Construct a wallet deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a wallet from a hex-encoded 32-byte seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Export the seed as hex. Handle with care.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Raw 32-byte public key.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Upper-case hex public key, as carried in `signing_pub_key`.
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(self.public_key_bytes())
    }

    /// 20-byte account id derived from the public key.
    pub fn account_id(&self) -> [u8; ACCOUNT_ID_LENGTH] {
        account_id_from_public_key(&self.public_key_bytes())
    }

    /// Encoded account address for this wallet.
    pub fn address(&self) -> String {
        encode_address(&self.account_id())
    }

    /// Sign arbitrary bytes. Ed25519 is deterministic, so the same message
    /// always yields the same signature.
    pub fn sign_bytes(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify a signature produced by this wallet.
    pub fn verify_bytes(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        self.signing_key
            .verifying_key()
            .verify(message, &Signature::from_bytes(signature))
            .is_ok()
    }
}

impl Clone for Wallet {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output.
        write!(f, "Wallet({})", self.address())
    }
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Derive the 20-byte account id for a public key.
pub fn account_id_from_public_key(public_key: &[u8]) -> [u8; ACCOUNT_ID_LENGTH] {
    let digest = sha256(public_key);
    let mut id = [0u8; ACCOUNT_ID_LENGTH];
    id.copy_from_slice(&digest[..ACCOUNT_ID_LENGTH]);
    id
}

/// Encode an account id as a checksummed base58 address.
pub fn encode_address(account_id: &[u8; ACCOUNT_ID_LENGTH]) -> String {
    let checksum = double_sha256(account_id);
    let mut payload = Vec::with_capacity(ACCOUNT_ID_LENGTH + 4);
    payload.extend_from_slice(account_id);
    payload.extend_from_slice(&checksum[..4]);
    bs58::encode(payload).into_string()
}

/// Decode a checksummed address back into its account id.
pub fn decode_address(address: &str) -> Result<[u8; ACCOUNT_ID_LENGTH], KeyError> {
    let payload = bs58::decode(address)
        .into_vec()
        .map_err(|e| KeyError::InvalidAddress(e.to_string()))?;
    if payload.len() != ACCOUNT_ID_LENGTH + 4 {
        return Err(KeyError::InvalidAddress(format!(
            "expected {} bytes, got {}",
            ACCOUNT_ID_LENGTH + 4,
            payload.len()
        )));
    }
    let (id, checksum) = payload.split_at(ACCOUNT_ID_LENGTH);
    if double_sha256(id)[..4] != *checksum {
        return Err(KeyError::InvalidAddress("checksum mismatch".to_string()));
    }
    let mut account_id = [0u8; ACCOUNT_ID_LENGTH];
    account_id.copy_from_slice(id);
    Ok(account_id)
}

/// Verify a hex-encoded signature against a hex-encoded public key.
pub fn verify_hex(public_key_hex: &str, message: &[u8], signature_hex: &str) -> Result<bool, KeyError> {
    let key_bytes: [u8; 32] = hex::decode(public_key_hex)
        .map_err(|_| KeyError::InvalidPublicKey)?
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::InvalidPublicKey)?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| KeyError::InvalidPublicKey)?;
    let sig_bytes: [u8; 64] = hex::decode(signature_hex)
        .map_err(|_| KeyError::InvalidSignature)?
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::InvalidSignature)?;
    Ok(verifying_key
        .verify(message, &Signature::from_bytes(&sig_bytes))
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roundtrip_preserves_identity() {
        let wallet = Wallet::generate();
        let restored = Wallet::from_hex(&wallet.seed_hex()).unwrap();
        assert_eq!(wallet.address(), restored.address());
        assert_eq!(wallet.public_key_hex(), restored.public_key_hex());
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert_eq!(
            Wallet::from_hex("abcd").unwrap_err(),
            KeyError::InvalidSecretKey
        );
        assert!(Wallet::from_hex("not hex at all").is_err());
    }

    #[test]
    fn address_decodes_to_account_id() {
        let wallet = Wallet::from_seed(&[7u8; 32]);
        let decoded = decode_address(&wallet.address()).unwrap();
        assert_eq!(decoded, wallet.account_id());
    }

    #[test]
    fn corrupted_address_fails_checksum() {
        let wallet = Wallet::from_seed(&[9u8; 32]);
        let mut id = wallet.account_id();
        id[0] ^= 0xFF;
        let mut payload = id.to_vec();
        payload.extend_from_slice(&double_sha256(&wallet.account_id())[..4]);
        let forged = bs58::encode(payload).into_string();
        assert!(matches!(
            decode_address(&forged),
            Err(KeyError::InvalidAddress(_))
        ));
    }

    #[test]
    fn verify_hex_accepts_own_signature() {
        let wallet = Wallet::generate();
        let sig = wallet.sign_bytes(b"message");
        let ok = verify_hex(&wallet.public_key_hex(), b"message", &hex::encode(sig)).unwrap();
        assert!(ok);
        let bad = verify_hex(&wallet.public_key_hex(), b"other", &hex::encode(sig)).unwrap();
        assert!(!bad);
    }

    #[test]
    fn debug_output_hides_secret() {
        let wallet = Wallet::from_seed(&[1u8; 32]);
        let debug = format!("{:?}", wallet);
        assert!(!debug.contains(&wallet.seed_hex()));
        assert!(debug.contains(&wallet.address()));
    }
}
