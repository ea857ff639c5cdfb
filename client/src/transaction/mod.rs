//! # Transaction Module
//!
//! Drafting, encoding, and signing of ledger transactions.
//!
//! ```text
//! types.rs   : TransactionKind, Memo, SignerEntry, EngineResult
//! builder.rs : Transaction drafts and the fluent TransactionBuilder
//! codec.rs   : canonical tx_blob encoding, signing payloads, hashing
//! signing.rs : Signer trait, SignedTransaction, multisign helpers
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Draft**: build a [`Transaction`] with [`TransactionBuilder`].
//! 2. **Assemble**: optionally let the client fill fee, sequence, and expiry.
//! 3. **Sign**: a [`Signer`] turns the draft into a [`SignedTransaction`].
//! 4. **Submit**: the blob goes to a node; the hash is what gets tracked.

pub mod builder;
pub mod codec;
pub mod signing;
pub mod types;

pub use builder::{Transaction, TransactionBuilder};
pub use codec::CodecError;
pub use signing::{combine_multisigned, verify_signatures, SignedTransaction, Signer};
pub use types::{EngineResult, EngineResultClass, Memo, SignerEntry, TransactionKind};
