//! # XC-05 Proof Verifier
//!
//! Turns a foreign-chain claim into an admitted `CrossChainInstruction`.
//!
//! **Subsystem ID:** XC-05
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Verifier Families
//!
//! | Verifier | Trust root | Inclusion |
//! |----------|------------|-----------|
//! | `EvmProofVerifier` | Canonical PoA header (XC-04) | keccak/RLP account + storage trie |
//! | `AltMptVerifier` | Committee-signed state root | type-byte alt trie, two levels |
//! | `SignatureProofVerifier` | Committee-signed root | sha256 Merkle path |
//! | `RelayAttestedVerifier` | Validator quorum (XC-03) | none |
//!
//! Every verifier decodes the payload, requires it to be addressed to the
//! local chain, and marks `(source_chain_id, cross_chain_id)` in the replay
//! ledger (XC-02) before returning the instruction.
//!
//! ## Module Structure
//!
//! ```text
//! xc-05-proof-verifier/
//! ├── domain/          # Claims, committee types, ProofError
//! ├── algorithms/      # keccak trie, alt trie, Merkle paths, witness check
//! ├── application/     # Verifiers and CommitteeStore
//! └── config.rs        # ProofConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use application::{
    AltMptVerifier, CommitteeStore, EvmProofVerifier, RelayAttestedVerifier,
    SignatureProofVerifier,
};
pub use config::ProofConfig;
pub use domain::{
    AccountProof, AltProofClaim, CommitteeKey, CommitteeMessage, EvmAccount, EvmProofClaim,
    MessageBody, PathNode, Position, ProofError, SignatureClaim, StorageProof, WitnessEntry,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
