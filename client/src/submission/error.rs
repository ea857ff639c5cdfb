//! Error types for the submission pipeline.
//!
//! Every fallible `submit`/`submit_and_wait` step returns a [`SubmitError`].
//! Expiry and tracking failures are *not* errors: they are terminal
//! [`super::FinalityOutcome`] values.

use thiserror::Error;

use crate::crypto::keys::KeyError;
use crate::network::transport::TransportError;
use crate::transaction::codec::CodecError;

/// Errors that can occur while preparing or submitting a transaction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    /// The caller asked for something impossible: a missing wallet, a
    /// missing or already passed `last_ledger_sequence` in wait mode, a
    /// malformed blob. Never raised after submission and never worth
    /// retrying as is.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Filling missing transaction fields failed.
    #[error("autofill failed: {0}")]
    Assemble(#[from] AssembleError),

    /// The node could not be reached or rejected the request itself.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// Shorthand for a [`SubmitError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns `true` when repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Assemble(e) => e.is_retryable(),
            Self::Transport(e) => e.is_retryable(),
        }
    }
}

impl From<CodecError> for SubmitError {
    fn from(e: CodecError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<KeyError> for SubmitError {
    fn from(e: KeyError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Errors raised while autofilling a transaction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssembleError {
    /// The sending account does not exist in the current ledger.
    #[error("account not found: {account}")]
    AccountNotFound {
        /// Address that was looked up.
        account: String,
    },

    /// The fee schedule could not be fetched.
    #[error("fee query failed: {0}")]
    FeeQuery(TransportError),

    /// Any other query needed for autofill failed.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The draft or the node's answers make autofill impossible.
    #[error("invalid draft: {0}")]
    Validation(String),
}

impl AssembleError {
    /// Returns `true` when the underlying failure was transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AccountNotFound { .. } | Self::Validation(_) => false,
            Self::FeeQuery(e) | Self::Transport(e) => e.is_retryable(),
        }
    }
}
