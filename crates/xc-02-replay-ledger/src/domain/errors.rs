//! # Domain Errors

use shared_types::{ChainId, Classify, ErrorKind};
use thiserror::Error;
use xc_01_bridge_storage::StorageError;

/// Replay ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The pair was admitted before.
    #[error(
        "Cross-chain id {cross_chain_id} from chain {chain_id} already applied at height \
         {applied_at_height}"
    )]
    AlreadyApplied {
        /// Source chain
        chain_id: ChainId,
        /// Hex of the cross-chain ID
        cross_chain_id: String,
        /// Height of the original admission
        applied_at_height: u64,
    },

    /// Empty cross-chain IDs cannot be tracked.
    #[error("Empty cross-chain id")]
    EmptyCrossChainId,

    /// Backing store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Classify for ReplayError {
    fn kind(&self) -> ErrorKind {
        match self {
            ReplayError::AlreadyApplied { .. } => ErrorKind::ReplayRejected,
            ReplayError::EmptyCrossChainId => ErrorKind::MalformedInput,
            ReplayError::Storage(_) => ErrorKind::Storage,
        }
    }
}
