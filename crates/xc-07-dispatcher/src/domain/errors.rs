//! # Dispatch Errors
//!
//! Wraps every subsystem error so the host sees one type per call while
//! keeping the subsystem's classification.

use shared_types::{ChainId, Classify, ErrorKind};
use thiserror::Error;
use xc_01_bridge_storage::StorageError;
use xc_02_replay_ledger::ReplayError;
use xc_03_consensus_vote::VoteError;
use xc_04_header_sync::HeaderSyncError;
use xc_05_proof_verifier::ProofError;
use xc_06_btc_custody::CustodyError;

use super::VerifierKind;

/// Dispatcher error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Governance has not registered the chain.
    #[error("Side chain {0} is not registered")]
    UnknownSideChain(ChainId),

    /// The chain's router tag maps to no verifier.
    #[error("No verifier routed for chain {chain_id} (router {router})")]
    UnroutedChain {
        /// Source chain.
        chain_id: ChainId,
        /// Its router tag.
        router: u64,
    },

    /// The claim's shape does not fit the chain's verifier.
    #[error("Chain {chain_id} is verified by {expected}, claim is {actual}")]
    ClaimMismatch {
        /// Source chain.
        chain_id: ChainId,
        /// Family routed for the chain.
        expected: VerifierKind,
        /// Family of the supplied claim.
        actual: VerifierKind,
    },

    /// Bridge configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Replay ledger error.
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// Vote engine error.
    #[error(transparent)]
    Vote(#[from] VoteError),

    /// Light client error.
    #[error(transparent)]
    HeaderSync(#[from] HeaderSyncError),

    /// Verifier error.
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// Custody error.
    #[error(transparent)]
    Custody(#[from] CustodyError),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Classify for DispatchError {
    fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownSideChain(_)
            | DispatchError::UnroutedChain { .. }
            | DispatchError::ClaimMismatch { .. }
            | DispatchError::Config(_) => ErrorKind::MalformedInput,
            DispatchError::Replay(e) => e.kind(),
            DispatchError::Vote(e) => e.kind(),
            DispatchError::HeaderSync(e) => e.kind(),
            DispatchError::Proof(e) => e.kind(),
            DispatchError::Custody(e) => e.kind(),
            DispatchError::Storage(e) => e.kind(),
        }
    }
}
