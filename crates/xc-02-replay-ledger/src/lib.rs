//! # XC-02 Replay Ledger
//!
//! Durable exactly-once marker keyed by `(source_chain_id, cross_chain_id)`.
//!
//! **Subsystem ID:** XC-02
//!
//! Every proof verifier calls `mark_applied` right after accepting a proof and
//! before returning an instruction. A marker is never removed; a second mark
//! for the same pair fails with `ReplayError::AlreadyApplied`, classified as
//! `ErrorKind::ReplayRejected`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;

pub use application::ReplayLedger;
pub use domain::{ReplayError, ReplayMarker};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
