//! # Client Configuration & Constants
//!
//! Every magic number the submission pipeline depends on lives here. Values
//! that legitimately differ between networks (ledger close cadence, request
//! timeouts, fee ceilings) also have a typed home in [`ClientConfig`] so
//! callers can override them without touching constants.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Approximate time between validated ledgers on a healthy network.
///
/// The finality tracker sleeps this long before every poll. Polling faster
/// than the network can close a ledger only burns requests.
pub const DEFAULT_LEDGER_CLOSE_INTERVAL: Duration = Duration::from_millis(1_000);

/// Per-request transport timeout. Applies to every individual RPC call,
/// independently of the expiry bound of a tracked transaction.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Consecutive network/timeout failures the tracker absorbs before giving
/// up on a submission and reporting `Failed`.
pub const DEFAULT_MAX_TRANSIENT_RETRIES: u32 = 3;

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Ledgers added to the latest validated sequence when autofilling
/// `last_ledger_sequence`. At ~1s per ledger this gives a submission about
/// twenty seconds to land before it provably expires.
pub const LEDGER_OFFSET: u32 = 20;

/// Upper bound on an autofilled fee, in drops. AccountDelete is exempt
/// because its fee is the owner reserve, which is usually far higher.
pub const DEFAULT_MAX_FEE_DROPS: u64 = 2_000_000;

/// Networks with an id above this value require `network_id` to be present
/// in every transaction. Legacy networks at or below it reject the field.
pub const RESTRICTED_NETWORK_ID_THRESHOLD: u32 = 1024;

// ---------------------------------------------------------------------------
// Wire & Hashing
// ---------------------------------------------------------------------------

/// Hash prefix for transaction ids: `"TXN\0"`.
pub const HASH_PREFIX_TRANSACTION_ID: [u8; 4] = *b"TXN\0";

/// Hash prefix for single-signature signing payloads: `"STX\0"`.
pub const HASH_PREFIX_SIGN: [u8; 4] = *b"STX\0";

/// Hash prefix for multi-signature signing payloads: `"SMT\0"`.
pub const HASH_PREFIX_MULTISIGN: [u8; 4] = *b"SMT\0";

/// Largest decoded transaction the codec accepts. Bounds allocations when
/// decoding untrusted blobs.
pub const MAX_TX_BLOB_BYTES: u64 = 1024 * 1024;

/// Account ids are the first 20 bytes of `sha256(public_key)`.
pub const ACCOUNT_ID_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Runtime knobs for a [`crate::submission::Client`].
///
/// Defaults match a mainnet-like network. Tests typically shrink
/// `ledger_close_interval` to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Sleep between finality polls.
    pub ledger_close_interval: Duration,
    /// Consecutive transient failures tolerated while tracking.
    pub max_transient_retries: u32,
    /// Ledgers of headroom added when autofilling `last_ledger_sequence`.
    pub ledger_offset: u32,
    /// Fee ceiling for autofilled fees, in drops.
    pub max_fee_drops: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ledger_close_interval: DEFAULT_LEDGER_CLOSE_INTERVAL,
            max_transient_retries: DEFAULT_MAX_TRANSIENT_RETRIES,
            ledger_offset: LEDGER_OFFSET,
            max_fee_drops: DEFAULT_MAX_FEE_DROPS,
        }
    }
}
