//! # Replay Ledger Service

use shared_types::{ChainId, TransitionContext};
use tracing::{debug, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore, RecordKind, StorageKey};

use crate::domain::{ReplayError, ReplayMarker};

/// Exactly-once admission ledger.
///
/// Stateless; all markers live in `BridgeState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayLedger;

impl ReplayLedger {
    /// Create a ledger handle.
    pub fn new() -> Self {
        Self
    }

    fn marker_key<S: KeyValueStore>(
        state: &BridgeState<S>,
        chain_id: ChainId,
        cross_chain_id: &[u8],
    ) -> StorageKey {
        state
            .key(RecordKind::Applied)
            .chain(chain_id)
            .sub(cross_chain_id)
    }

    /// Whether the pair has been admitted.
    pub fn is_applied<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        cross_chain_id: &[u8],
    ) -> Result<bool, ReplayError> {
        Ok(self.marker(state, chain_id, cross_chain_id)?.is_some())
    }

    /// Stored marker for the pair, if admitted.
    pub fn marker<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        cross_chain_id: &[u8],
    ) -> Result<Option<ReplayMarker>, ReplayError> {
        let key = Self::marker_key(state, chain_id, cross_chain_id);
        Ok(state.get(&key)?)
    }

    /// Record the pair as admitted. Fails if it already is.
    pub fn mark_applied<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        chain_id: ChainId,
        cross_chain_id: &[u8],
    ) -> Result<(), ReplayError> {
        if cross_chain_id.is_empty() {
            return Err(ReplayError::EmptyCrossChainId);
        }

        let key = Self::marker_key(state, chain_id, cross_chain_id);
        if let Some(existing) = state.get::<ReplayMarker>(&key)? {
            warn!(
                chain_id,
                cross_chain_id = %hex::encode(cross_chain_id),
                "[xc-02] replay rejected"
            );
            return Err(ReplayError::AlreadyApplied {
                chain_id,
                cross_chain_id: hex::encode(cross_chain_id),
                applied_at_height: existing.applied_at_height,
            });
        }

        state.put(
            &key,
            &ReplayMarker {
                applied_at_height: ctx.height,
            },
        )?;
        debug!(
            chain_id,
            cross_chain_id = %hex::encode(cross_chain_id),
            height = ctx.height,
            "[xc-02] marked applied"
        );
        Ok(())
    }
}
