//! # Domain Errors
//!
//! Error types for PoA header sync.

use shared_types::{ChainId, Classify, ErrorKind};
use thiserror::Error;
use xc_01_bridge_storage::StorageError;

/// Header sync error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderSyncError {
    /// Genesis already stored for the chain.
    #[error("Genesis already set for chain {0}")]
    GenesisAlreadySet(ChainId),

    /// No genesis stored for the chain.
    #[error("Light client for chain {0} is not initialized")]
    NotInitialized(ChainId),

    /// Genesis header is not a usable epoch boundary.
    #[error("Invalid genesis header {number}: {reason}")]
    InvalidGenesis {
        /// Header height
        number: u64,
        /// What was wrong
        reason: String,
    },

    /// Batch longer than the configured limit.
    #[error("Header batch of {len} exceeds limit {max}")]
    BatchTooLarge {
        /// Submitted length
        len: usize,
        /// Configured limit
        max: usize,
    },

    /// Header timestamp is beyond the allowed drift.
    #[error("Future block {number}: time {time} > now {now} + drift {drift}")]
    FutureBlock {
        /// Header height
        number: u64,
        /// Header time
        time: u64,
        /// Host time
        now: u64,
        /// Allowed drift
        drift: u64,
    },

    /// Extra-data does not follow the vanity/validators/seal layout.
    #[error("Malformed extra-data at {number}: {reason}")]
    MalformedExtra {
        /// Header height
        number: u64,
        /// What was wrong
        reason: String,
    },

    /// Mix digest is not zero.
    #[error("Non-zero mix digest at {0}")]
    InvalidMixDigest(u64),

    /// Uncle hash is not the empty-list hash.
    #[error("Non-empty uncle hash at {0}")]
    InvalidUncleHash(u64),

    /// Difficulty is neither in-turn nor no-turn.
    #[error("Invalid difficulty {difficulty} at {number}")]
    InvalidDifficulty {
        /// Header height
        number: u64,
        /// Declared difficulty
        difficulty: u64,
    },

    /// Parent is not stored.
    #[error("Unknown parent {parent} for header {number}")]
    UnknownParent {
        /// Header height
        number: u64,
        /// Hex of the parent hash
        parent: String,
    },

    /// Height is not parent + 1.
    #[error("Header {number} does not follow parent {parent_number}")]
    InvalidNumber {
        /// Header height
        number: u64,
        /// Parent height
        parent_number: u64,
    },

    /// Time is not at least one block period after the parent.
    #[error("Header {number} time {time} too close to parent time {parent_time}")]
    InvalidTimestamp {
        /// Header height
        number: u64,
        /// Header time
        time: u64,
        /// Parent time
        parent_time: u64,
    },

    /// Gas limit outside `[min, max]`.
    #[error("Gas limit {gas_limit} out of bounds at {number}")]
    GasLimitOutOfBounds {
        /// Header height
        number: u64,
        /// Declared gas limit
        gas_limit: u64,
    },

    /// Gas used above gas limit.
    #[error("Gas used {gas_used} exceeds limit {gas_limit} at {number}")]
    GasUsedExceedsLimit {
        /// Header height
        number: u64,
        /// Declared gas used
        gas_used: u64,
        /// Declared gas limit
        gas_limit: u64,
    },

    /// Gas limit moved too far from the parent.
    #[error("Gas limit delta {delta} >= bound {bound} at {number}")]
    GasLimitDelta {
        /// Header height
        number: u64,
        /// Absolute change
        delta: u64,
        /// Exclusive bound
        bound: u64,
    },

    /// Seal signature does not recover.
    #[error("Invalid seal at {number}: {reason}")]
    InvalidSeal {
        /// Header height
        number: u64,
        /// Recovery failure
        reason: String,
    },

    /// Recovered signer differs from the declared coinbase.
    #[error("Seal signer {recovered} does not match coinbase {declared} at {number}")]
    SignerMismatch {
        /// Header height
        number: u64,
        /// Hex of the coinbase
        declared: String,
        /// Hex of the recovered signer
        recovered: String,
    },

    /// Signer is not in the authoritative validator set.
    #[error("Unauthorized signer {signer} at {number}")]
    UnauthorizedSigner {
        /// Header height
        number: u64,
        /// Hex of the signer
        signer: String,
    },

    /// Signer produced another block inside the recency window.
    #[error("Signer {signer} recently signed block {last_signed}, rejecting {number}")]
    RecentlySigned {
        /// Header height
        number: u64,
        /// Hex of the signer
        signer: String,
        /// Height of the earlier block
        last_signed: u64,
    },

    /// Difficulty does not match the signer's turn.
    #[error("Difficulty {difficulty} does not match turn at {number} (in_turn={in_turn})")]
    WrongDifficultyForTurn {
        /// Header height
        number: u64,
        /// Declared difficulty
        difficulty: u64,
        /// Whether the signer is in turn
        in_turn: bool,
    },

    /// No validator epoch could be resolved for the height.
    #[error("No validator epoch resolvable for header {0}")]
    EpochNotFound(u64),

    /// Backing store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Classify for HeaderSyncError {
    fn kind(&self) -> ErrorKind {
        use HeaderSyncError::*;
        match self {
            UnauthorizedSigner { .. } => ErrorKind::AuthorityError,
            InvalidSeal { .. }
            | SignerMismatch { .. }
            | RecentlySigned { .. }
            | WrongDifficultyForTurn { .. } => ErrorKind::UntrustedClaim,
            Storage(_) => ErrorKind::Storage,
            _ => ErrorKind::MalformedInput,
        }
    }
}
