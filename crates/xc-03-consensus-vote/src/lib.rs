//! # XC-03 Consensus Vote Engine
//!
//! Byzantine-quorum voting over opaque messages, used for source chains that
//! offer no verifiable proof.
//!
//! **Subsystem ID:** XC-03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Rules
//!
//! | Rule | Behavior |
//! |------|----------|
//! | First submitter | Fixes the canonical message for `sha256(message)` |
//! | Conflicting content | `VoteError::InvalidSign` |
//! | Duplicate signer | `Ok(false)`, no state change |
//! | Non-member | `VoteError::InvalidAuthority` |
//! | Quorum crossing | `Ok(true)` exactly once per message |
//!
//! ## Module Structure
//!
//! ```text
//! xc-03-consensus-vote/
//! ├── domain/          # VoteRecord, ValidatorEpoch, errors
//! ├── ports/           # ValidatorEpochSource
//! ├── adapters/        # InMemoryEpochSource
//! └── application/     # ConsensusVoteEngine
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemoryEpochSource;
pub use application::ConsensusVoteEngine;
pub use config::VoteConfig;
pub use domain::{message_hash, ValidatorEpoch, VoteError, VoteRecord};
pub use ports::ValidatorEpochSource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
