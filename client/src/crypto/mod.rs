//! # Cryptographic Primitives
//!
//! Thin, typed wrappers around audited implementations:
//!
//! - **Ed25519** (`ed25519-dalek`) for transaction signatures.
//! - **SHA-512Half** (`sha2`) for transaction ids and signing digests.
//! - **SHA-256** (`sha2`) for account ids and address checksums.
//!
//! Nothing here is hand-rolled beyond the glue.

pub mod hash;
pub mod keys;

pub use hash::{double_sha256, sha256, sha512_half};
pub use keys::{decode_address, encode_address, KeyError, Wallet};
