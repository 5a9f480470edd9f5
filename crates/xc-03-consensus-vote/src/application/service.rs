//! # Consensus Vote Engine Service

use shared_types::{Address, Hash, TransitionContext};
use tracing::{debug, info, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore, RecordKind, StorageKey};

use crate::config::VoteConfig;
use crate::domain::{message_hash, ValidatorEpoch, VoteError, VoteRecord};
use crate::ports::ValidatorEpochSource;

/// Quorum voting over opaque messages.
#[derive(Debug, Clone, Default)]
pub struct ConsensusVoteEngine {
    config: VoteConfig,
}

impl ConsensusVoteEngine {
    /// Create an engine.
    pub fn new(config: VoteConfig) -> Self {
        Self { config }
    }

    fn record_key<S: KeyValueStore>(state: &BridgeState<S>, hash: &Hash) -> StorageKey {
        state.key(RecordKind::Vote).sub(hash)
    }

    /// Stored record for a digest.
    pub fn record<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        hash: &Hash,
    ) -> Result<Option<VoteRecord>, VoteError> {
        Ok(state.get(&Self::record_key(state, hash))?)
    }

    /// Cast `signer`'s vote for `message`.
    ///
    /// Returns `true` only for the vote that brings the signer count up to
    /// `quorum`. Votes before and after that point, and duplicate votes,
    /// return `false`.
    pub fn vote<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        epoch: &ValidatorEpoch,
        quorum: usize,
        signer: Address,
        message: &[u8],
    ) -> Result<bool, VoteError> {
        if message.is_empty() || message.len() > self.config.max_message_len {
            return Err(VoteError::InvalidMessage {
                len: message.len(),
                max: self.config.max_message_len,
            });
        }
        if quorum == 0 || quorum > epoch.len() {
            return Err(VoteError::InvalidQuorum {
                quorum,
                validators: epoch.len(),
            });
        }
        if !epoch.contains(&signer) {
            warn!(signer = %hex::encode(signer), "[xc-03] vote from non-validator");
            return Err(VoteError::InvalidAuthority {
                signer: hex::encode(signer),
            });
        }

        let hash = message_hash(message);
        let key = Self::record_key(state, &hash);
        let mut record = match state.get::<VoteRecord>(&key)? {
            Some(existing) if existing.message != message => {
                return Err(VoteError::InvalidSign {
                    message_hash: hex::encode(hash),
                });
            }
            Some(existing) => existing,
            None => VoteRecord::new(message.to_vec()),
        };

        if record.has_signed(&signer) {
            debug!(
                signer = %hex::encode(signer),
                hash = %hex::encode(hash),
                "[xc-03] duplicate vote ignored"
            );
            return Ok(false);
        }

        let was_below = record.signer_count() < quorum;
        record.signers.insert(signer, ctx.height);
        let reached = was_below
            && record.signer_count() >= quorum
            && record.quorum_reached_height.is_none();
        if reached {
            record.quorum_reached_height = Some(ctx.height);
        }
        state.put(&key, &record)?;

        if reached {
            info!(
                hash = %hex::encode(hash),
                signers = record.signer_count(),
                quorum,
                height = ctx.height,
                "[xc-03] quorum reached"
            );
        } else {
            debug!(
                hash = %hex::encode(hash),
                signers = record.signer_count(),
                quorum,
                "[xc-03] vote recorded"
            );
        }
        Ok(reached)
    }

    /// Vote against the epoch governing the current height, with its
    /// Byzantine quorum.
    pub fn vote_with_source<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        source: &dyn ValidatorEpochSource,
        signer: Address,
        message: &[u8],
    ) -> Result<bool, VoteError> {
        let epoch = source
            .epoch_at_height(ctx.height)
            .ok_or(VoteError::NoEpoch(ctx.height))?;
        let quorum = epoch.quorum_size();
        self.vote(state, ctx, &epoch, quorum, signer, message)
    }
}
