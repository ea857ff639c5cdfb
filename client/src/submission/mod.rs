//! # Submission Module
//!
//! Reliable submission of signed transactions and proof of their fate.
//!
//! ```text
//! assembler.rs   : autofill of fee, sequence, network id, expiry bound
//! gateway.rs     : one-shot submit, returns the preliminary EngineResult
//! tracker.rs     : poll loop ending in Validated / Expired / Failed
//! orchestrator.rs: Client: submit and submit_and_wait
//! clock.rs       : injectable time source
//! outcome.rs     : FinalityOutcome
//! error.rs       : SubmitError, AssembleError
//! ```
//!
//! ## Guarantees
//!
//! - A preliminary result is never reported as final.
//! - `Expired` is only returned once a validated ledger beyond the
//!   transaction's `last_ledger_sequence` has been observed.
//! - No state outlives a call; cancelling a wait leaves the submitted
//!   transaction alone.

pub mod assembler;
pub mod clock;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod outcome;
pub mod tracker;

pub use assembler::{Assembler, AssemblerConfig, LedgerAssembler};
pub use clock::{Clock, RecordingClock, TokioClock};
pub use error::{AssembleError, SubmitError};
pub use gateway::SubmissionGateway;
pub use orchestrator::{Client, SubmissionInput, SubmitOptions};
pub use outcome::FinalityOutcome;
pub use tracker::{FinalityTracker, TrackerConfig};
