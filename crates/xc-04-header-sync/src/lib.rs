//! # XC-04 Header Sync Light Client
//!
//! Tracks the canonical chain of a proof-of-authority source chain from a
//! trusted genesis checkpoint.
//!
//! **Subsystem ID:** XC-04
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Verification Pipeline
//!
//! Each header passes, in order:
//!
//! 1. Header-only checks: future drift, extra-data layout, mix digest, uncle
//!    hash, difficulty in `{1, 2}`
//! 2. Parent linkage: number, timestamp, gas bounds
//! 3. Seal recovery against the coinbase
//! 4. Validator epoch resolution (two live generations)
//! 5. Recent-signer window and turn difficulty
//! 6. Cumulative weight, then heaviest-chain fork choice
//!
//! ## Module Structure
//!
//! ```text
//! xc-04-header-sync/
//! ├── domain/          # PoaHeader, StoredHeader, errors
//! ├── algorithms/      # validation, epochs, fork_choice
//! ├── application/     # HeaderSyncLightClient
//! └── config.rs        # HeaderSyncConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;

// Re-exports
pub use algorithms::{ChainView, EpochPair, GenesisSnapshot};
pub use application::HeaderSyncLightClient;
pub use config::HeaderSyncConfig;
pub use domain::{
    BatchOutcome, GenesisRecord, HeaderSyncError, LightClientState, PoaHeader, StoredHeader,
    SyncReport, DIFF_IN_TURN, DIFF_NO_TURN, EXTRA_SEAL, EXTRA_VANITY,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
