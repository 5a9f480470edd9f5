//! # Domain Errors

use shared_types::{Classify, ErrorKind};
use thiserror::Error;
use xc_01_bridge_storage::StorageError;

/// Vote engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    /// Same digest, different content than the first submission.
    #[error("Invalid sign: message content conflicts with record {message_hash}")]
    InvalidSign {
        /// Hex of the digest
        message_hash: String,
    },

    /// Signer is not in the active validator epoch.
    #[error("Invalid authority: {signer} is not an active validator")]
    InvalidAuthority {
        /// Hex of the signer address
        signer: String,
    },

    /// Quorum is zero or larger than the validator set.
    #[error("Invalid quorum {quorum} for {validators} validators")]
    InvalidQuorum {
        /// Requested quorum
        quorum: usize,
        /// Validator count
        validators: usize,
    },

    /// Empty or oversized message.
    #[error("Invalid message length {len} (max {max})")]
    InvalidMessage {
        /// Submitted length
        len: usize,
        /// Configured limit
        max: usize,
    },

    /// No validator epoch is known for the height.
    #[error("No validator epoch for height {0}")]
    NoEpoch(u64),

    /// Backing store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Classify for VoteError {
    fn kind(&self) -> ErrorKind {
        match self {
            VoteError::InvalidSign { .. } => ErrorKind::UntrustedClaim,
            VoteError::InvalidAuthority { .. } => ErrorKind::AuthorityError,
            VoteError::InvalidQuorum { .. }
            | VoteError::InvalidMessage { .. }
            | VoteError::NoEpoch(_) => ErrorKind::MalformedInput,
            VoteError::Storage(_) => ErrorKind::Storage,
        }
    }
}
