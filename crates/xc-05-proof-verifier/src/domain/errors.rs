//! # Proof Verifier Errors

use shared_types::{ChainId, Classify, ErrorKind, PayloadError};
use thiserror::Error;
use xc_01_bridge_storage::StorageError;
use xc_02_replay_ledger::ReplayError;
use xc_03_consensus_vote::VoteError;
use xc_04_header_sync::HeaderSyncError;

/// Errors raised while verifying a foreign-chain claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Trusted root is all zeroes.
    #[error("Trusted state root is empty")]
    EmptyRoot,

    /// Proof walks more nodes than allowed.
    #[error("Proof too deep: {depth} nodes (max {max})")]
    ProofTooDeep {
        /// Nodes visited.
        depth: usize,
        /// Configured limit.
        max: usize,
    },

    /// A trie node could not be decoded.
    #[error("Malformed trie node at depth {depth}: {reason}")]
    MalformedNode {
        /// Position in the walk.
        depth: usize,
        /// What was wrong.
        reason: String,
    },

    /// Walk needs a node the proof does not supply.
    #[error("Proof ends at depth {depth} before reaching the key")]
    MissingNode {
        /// Position in the walk.
        depth: usize,
    },

    /// Proof supplies nodes the walk never used.
    #[error("Proof carries {count} unused nodes")]
    UnusedNodes {
        /// Surplus node count.
        count: usize,
    },

    /// Node does not hash to the reference pointing at it.
    #[error("Node hash mismatch at depth {depth}")]
    NodeHashMismatch {
        /// Position in the walk.
        depth: usize,
    },

    /// The trie proves the key absent.
    #[error("Key {key} is not in the trie")]
    KeyNotInTrie {
        /// Hex key.
        key: String,
    },

    /// A proven value does not have the expected encoding.
    #[error("Malformed proven value: {0}")]
    MalformedValue(String),

    /// Claimed contract is not the chain's cross-chain manager.
    #[error("Contract mismatch: expected {expected}, got {actual}")]
    AddressMismatch {
        /// Registered contract (hex).
        expected: String,
        /// Claimed contract (hex).
        actual: String,
    },

    /// Recomputed account record differs from the trie leaf.
    #[error("Account record does not match the proven leaf")]
    AccountMismatch,

    /// Exactly one storage entry must be proven.
    #[error("Expected one storage proof, got {0}")]
    InvalidStorageProofCount(usize),

    /// Storage leaf differs from the claimed slot value.
    #[error("Storage value does not match the proven leaf")]
    StorageMismatch,

    /// Proven value is not the payload digest.
    #[error("Proven value {actual} does not commit to payload {expected}")]
    ValueMismatch {
        /// Payload digest (hex).
        expected: String,
        /// Proven value (hex).
        actual: String,
    },

    /// No canonical header stored at the claimed height.
    #[error("No canonical header for chain {chain_id} at {height}")]
    HeaderNotFound {
        /// Source chain.
        chain_id: ChainId,
        /// Claimed height.
        height: u64,
    },

    /// Claimed height is not yet buried deep enough.
    #[error("Height {height} has {confirmations} confirmations, need {required}")]
    InsufficientConfirmations {
        /// Claimed height.
        height: u64,
        /// Canonical headers above it.
        confirmations: u64,
        /// Side-chain requirement.
        required: u64,
    },

    /// Payload addressed to another chain.
    #[error("Payload addressed to chain {actual}, local chain is {expected}")]
    WrongDestination {
        /// Local chain ID.
        expected: ChainId,
        /// Payload destination.
        actual: ChainId,
    },

    /// Payload exceeds the configured size.
    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size.
        len: usize,
        /// Configured limit.
        max: usize,
    },

    /// Committee message bytes did not decode.
    #[error("Committee message decode failed: {0}")]
    MessageDecode(String),

    /// No committee registered for the chain.
    #[error("No committee for chain {0}")]
    CommitteeNotSet(ChainId),

    /// Genesis committee already registered.
    #[error("Committee for chain {0} already set")]
    CommitteeAlreadySet(ChainId),

    /// Committee definition is unusable.
    #[error("Invalid committee: {0}")]
    InvalidCommittee(String),

    /// Rotation message does not advance the committee height.
    #[error("Rotation at height {height} does not follow committee height {current}")]
    StaleRotation {
        /// Message height.
        height: u64,
        /// Height of the current committee.
        current: u64,
    },

    /// A witness entry is unusable.
    #[error("Witness {index} invalid: {reason}")]
    InvalidWitness {
        /// Position in the witness list.
        index: usize,
        /// What was wrong.
        reason: String,
    },

    /// Committee message was signed for another chain.
    #[error("Committee message signed for chain {actual}, expected {expected}")]
    MessageChainMismatch {
        /// Chain the message was submitted under.
        expected: ChainId,
        /// Chain named in the signed body.
        actual: ChainId,
    },

    /// Too few distinct committee signatures.
    #[error("Committee signatures: {valid} valid, threshold {threshold}")]
    InsufficientSignatures {
        /// Distinct valid signers.
        valid: usize,
        /// Required count.
        threshold: usize,
    },

    /// Merkle path does not reach the declared root.
    #[error("Transaction inclusion proof does not reach the state root")]
    InclusionFailed,

    /// Payload decode or binding failed.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Replay ledger rejected admission.
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// Vote engine rejected the submission.
    #[error(transparent)]
    Vote(#[from] VoteError),

    /// Light client failure.
    #[error(transparent)]
    HeaderSync(#[from] HeaderSyncError),

    /// Store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Classify for ProofError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProofError::NodeHashMismatch { .. }
            | ProofError::KeyNotInTrie { .. }
            | ProofError::AddressMismatch { .. }
            | ProofError::AccountMismatch
            | ProofError::StorageMismatch
            | ProofError::ValueMismatch { .. }
            | ProofError::InvalidWitness { .. }
            | ProofError::InsufficientSignatures { .. }
            | ProofError::MessageChainMismatch { .. }
            | ProofError::InclusionFailed => ErrorKind::UntrustedClaim,
            ProofError::HeaderNotFound { .. } | ProofError::InsufficientConfirmations { .. } => {
                ErrorKind::NotYetFinal
            }
            ProofError::Payload(e) => e.kind(),
            ProofError::Replay(e) => e.kind(),
            ProofError::Vote(e) => e.kind(),
            ProofError::HeaderSync(e) => e.kind(),
            ProofError::Storage(e) => e.kind(),
            _ => ErrorKind::MalformedInput,
        }
    }
}
