//! # Committee Store
//!
//! Trusted signing committee per signature-family chain. Set once by
//! governance, then replaced only by a message the current committee signed.

use shared_types::ChainId;
use tracing::{info, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore, RecordKind, StorageKey};

use crate::algorithms::count_signers;
use crate::domain::{CommitteeKey, CommitteeMessage, MessageBody, ProofError};

/// Committee records, keyed by chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitteeStore;

impl CommitteeStore {
    /// Create a store handle.
    pub fn new() -> Self {
        Self
    }

    fn key<S: KeyValueStore>(state: &BridgeState<S>, chain_id: ChainId) -> StorageKey {
        state.key(RecordKind::Committee).chain(chain_id)
    }

    /// Current committee for the chain.
    pub fn current<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
    ) -> Result<Option<CommitteeKey>, ProofError> {
        Ok(state.get(&Self::key(state, chain_id))?)
    }

    /// Install the genesis committee. Fails if one is already set.
    pub fn sync_genesis<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        committee: CommitteeKey,
    ) -> Result<(), ProofError> {
        let key = Self::key(state, chain_id);
        if state.contains(&key)? {
            return Err(ProofError::CommitteeAlreadySet(chain_id));
        }
        committee.parsed_keys()?;
        state.put(&key, &committee)?;
        info!(
            chain_id,
            height = committee.height,
            keys = committee.public_keys.len(),
            threshold = committee.threshold,
            "[xc-05] genesis committee set"
        );
        Ok(())
    }

    /// Decode `message` and check it carries enough signatures from the
    /// chain's current committee.
    pub fn verify_message<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        message: &[u8],
    ) -> Result<MessageBody, ProofError> {
        let committee = self
            .current(state, chain_id)?
            .ok_or(ProofError::CommitteeNotSet(chain_id))?;
        let message = CommitteeMessage::decode(message)?;
        Self::check_witness(chain_id, &committee, &message)?;
        Ok(message.body)
    }

    fn check_witness(
        chain_id: ChainId,
        committee: &CommitteeKey,
        message: &CommitteeMessage,
    ) -> Result<(), ProofError> {
        if message.body.chain_id != chain_id {
            warn!(
                chain_id,
                signed_for = message.body.chain_id,
                "[xc-05] committee message for another chain"
            );
            return Err(ProofError::MessageChainMismatch {
                expected: chain_id,
                actual: message.body.chain_id,
            });
        }
        let keys = committee.parsed_keys()?;
        let digest = message.body.digest()?;
        let valid = count_signers(&keys, &digest, &message.witness)?;
        let threshold = committee.threshold as usize;
        if valid < threshold {
            warn!(
                chain_id,
                valid, threshold, "[xc-05] committee message under threshold"
            );
            return Err(ProofError::InsufficientSignatures { valid, threshold });
        }
        Ok(())
    }

    /// Replace the committee with the successor named in a message signed by
    /// the current one.
    pub fn rotate<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        message: &[u8],
    ) -> Result<CommitteeKey, ProofError> {
        let current = self
            .current(state, chain_id)?
            .ok_or(ProofError::CommitteeNotSet(chain_id))?;
        let message = CommitteeMessage::decode(message)?;
        Self::check_witness(chain_id, &current, &message)?;

        let body = message.body;
        if body.height <= current.height {
            return Err(ProofError::StaleRotation {
                height: body.height,
                current: current.height,
            });
        }
        let next = body
            .next_committee
            .ok_or_else(|| ProofError::InvalidCommittee("message names no successor".to_string()))?;
        next.parsed_keys()?;
        let next = CommitteeKey {
            height: body.height,
            ..next
        };

        state.put(&Self::key(state, chain_id), &next)?;
        info!(
            chain_id,
            from = current.height,
            to = next.height,
            keys = next.public_keys.len(),
            "[xc-05] committee rotated"
        );
        Ok(next)
    }
}
