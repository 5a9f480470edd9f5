//! # Header Sync Light Client Service
//!
//! Persists trusted headers per foreign chain and keeps the canonical index
//! on the heaviest chain. Each accepted header is committed in its own batch.

use shared_types::{Address, ChainId, Hash, TransitionContext};
use tracing::{debug, info, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore, RecordKind, StorageKey, WriteBatch};
use xc_03_consensus_vote::ValidatorEpoch;

use crate::algorithms::{
    check_recent_signers, check_turn, plan_canonical_update, resolve_epochs,
    verify_against_parent, verify_extra, verify_gas_bounds, verify_header_fields, verify_seal,
    ChainView, GenesisSnapshot,
};
use crate::config::HeaderSyncConfig;
use crate::domain::{
    BatchOutcome, GenesisRecord, HeaderSyncError, LightClientState, PoaHeader, StoredHeader,
    SyncReport,
};

fn header_key<S: KeyValueStore>(
    state: &BridgeState<S>,
    chain_id: ChainId,
    hash: &Hash,
) -> StorageKey {
    state.key(RecordKind::Header).chain(chain_id).sub(hash)
}

fn canonical_key<S: KeyValueStore>(
    state: &BridgeState<S>,
    chain_id: ChainId,
    height: u64,
) -> StorageKey {
    state.key(RecordKind::Canonical).chain(chain_id).height(height)
}

fn height_key<S: KeyValueStore>(state: &BridgeState<S>, chain_id: ChainId) -> StorageKey {
    state.key(RecordKind::Height).chain(chain_id)
}

fn genesis_key<S: KeyValueStore>(state: &BridgeState<S>, chain_id: ChainId) -> StorageKey {
    state.key(RecordKind::Genesis).chain(chain_id)
}

fn epoch_key<S: KeyValueStore>(
    state: &BridgeState<S>,
    chain_id: ChainId,
    start: u64,
) -> StorageKey {
    state.key(RecordKind::Epoch).chain(chain_id).height(start)
}

/// `ChainView` over the bridge store for one chain.
struct StoreView<'a, S: KeyValueStore> {
    state: &'a BridgeState<S>,
    chain_id: ChainId,
}

impl<S: KeyValueStore> ChainView for StoreView<'_, S> {
    fn header(&self, hash: &Hash) -> Result<Option<StoredHeader>, HeaderSyncError> {
        Ok(self.state.get(&header_key(self.state, self.chain_id, hash))?)
    }

    fn canonical_hash(&self, height: u64) -> Result<Option<Hash>, HeaderSyncError> {
        Ok(self
            .state
            .get(&canonical_key(self.state, self.chain_id, height))?)
    }
}

/// PoA light client.
#[derive(Debug, Clone, Default)]
pub struct HeaderSyncLightClient {
    config: HeaderSyncConfig,
}

impl HeaderSyncLightClient {
    /// Create a light client.
    pub fn new(config: HeaderSyncConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &HeaderSyncConfig {
        &self.config
    }

    /// Seed the chain with a trusted epoch-boundary header.
    ///
    /// The validator set in the header's extra-data becomes the current epoch;
    /// `prior_validators` becomes the epoch before it (the current set is
    /// reused when empty). Fails if genesis was already stored.
    pub fn sync_genesis<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        header: PoaHeader,
        prior_validators: Vec<Address>,
    ) -> Result<(), HeaderSyncError> {
        if state.contains(&genesis_key(state, chain_id))? {
            return Err(HeaderSyncError::GenesisAlreadySet(chain_id));
        }

        let number = header.number;
        if !self.config.is_epoch_boundary(number) || number < self.config.epoch_length {
            return Err(HeaderSyncError::InvalidGenesis {
                number,
                reason: format!(
                    "must be an epoch boundary at or above {}",
                    self.config.epoch_length
                ),
            });
        }
        verify_extra(&header, true)?;
        verify_gas_bounds(&header)?;
        let validators = header
            .validators()
            .ok_or_else(|| HeaderSyncError::InvalidGenesis {
                number,
                reason: "unreadable validator set".to_string(),
            })?;
        let prior = if prior_validators.is_empty() {
            validators.clone()
        } else {
            prior_validators
        };
        let prior_start = number - self.config.epoch_length;

        let hash = header.hash();
        let stored = StoredHeader {
            hash,
            signer: header.coinbase,
            cumulative_weight: u128::from(header.difficulty),
            header,
        };

        let mut batch = WriteBatch::new();
        batch.put(&header_key(state, chain_id, &hash), &stored)?;
        batch.put(&canonical_key(state, chain_id, number), &hash)?;
        batch.put(&height_key(state, chain_id), &number)?;
        batch.put(
            &genesis_key(state, chain_id),
            &GenesisRecord {
                hash,
                number,
                prior_epoch_start: prior_start,
            },
        )?;
        batch.put(
            &epoch_key(state, chain_id, prior_start),
            &ValidatorEpoch::new(prior_start, prior),
        )?;
        batch.put(
            &epoch_key(state, chain_id, number),
            &ValidatorEpoch::new(number, validators.clone()),
        )?;
        state.commit(batch)?;

        info!(
            chain_id,
            number,
            hash = %hex::encode(hash),
            validators = validators.len(),
            "[xc-04] genesis header stored"
        );
        Ok(())
    }

    /// Verify and store headers in order.
    ///
    /// Known headers are skipped. The first rejected header stops the batch;
    /// headers accepted before it stay stored and may already be canonical.
    pub fn sync_block_headers<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        chain_id: ChainId,
        headers: &[PoaHeader],
    ) -> Result<SyncReport, HeaderSyncError> {
        self.sync_batch(state, ctx, chain_id, headers)?.into_result()
    }

    /// [`sync_block_headers`](Self::sync_block_headers), reporting the
    /// headers applied before a rejection alongside it.
    pub fn sync_batch<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        chain_id: ChainId,
        headers: &[PoaHeader],
    ) -> Result<BatchOutcome, HeaderSyncError> {
        if headers.len() > self.config.max_batch_size {
            return Err(HeaderSyncError::BatchTooLarge {
                len: headers.len(),
                max: self.config.max_batch_size,
            });
        }
        let genesis = self.genesis_snapshot(state, chain_id)?;

        let mut report = SyncReport::default();
        let mut rejected = None;
        for header in headers {
            let hash = header.hash();
            if state.contains(&header_key(state, chain_id, &hash))? {
                debug!(chain_id, number = header.number, "[xc-04] header already stored");
                report.skipped += 1;
                continue;
            }

            let stored = match self.verify_header(state, ctx, chain_id, &genesis, header) {
                Ok(stored) => stored,
                Err(e) => {
                    warn!(chain_id, number = header.number, error = %e, "[xc-04] header rejected");
                    rejected = Some(e);
                    break;
                }
            };
            if self.store_header(state, chain_id, stored)? {
                report.reorgs += 1;
            }
            report.accepted += 1;
        }

        report.canonical_height = self
            .current_height(state, chain_id)?
            .ok_or(HeaderSyncError::NotInitialized(chain_id))?;
        Ok(BatchOutcome { report, rejected })
    }

    fn verify_header<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        ctx: &TransitionContext,
        chain_id: ChainId,
        genesis: &GenesisSnapshot,
        header: &PoaHeader,
    ) -> Result<StoredHeader, HeaderSyncError> {
        let view = StoreView { state, chain_id };

        // 1. Header-only checks
        verify_header_fields(header, &self.config, ctx.timestamp)?;

        // 2. Parent
        let parent = view
            .header(&header.parent_hash)?
            .ok_or_else(|| HeaderSyncError::UnknownParent {
                number: header.number,
                parent: hex::encode(header.parent_hash),
            })?;
        verify_against_parent(header, &parent.header, &self.config)?;

        // 3. Seal
        let signer = verify_seal(header, chain_id)?;

        // 4-5. Epochs, recency and turn
        let pair = resolve_epochs(&view, &parent, genesis, &self.config)?;
        let epoch = pair.authoritative(header.number);
        if !epoch.contains(&signer) {
            return Err(HeaderSyncError::UnauthorizedSigner {
                number: header.number,
                signer: hex::encode(signer),
            });
        }
        check_recent_signers(&view, &parent, &signer, (epoch.len() / 2) as u64)?;
        check_turn(epoch, header.number, &signer, header.difficulty)?;

        // 6. Weight
        Ok(StoredHeader {
            hash: header.hash(),
            header: header.clone(),
            signer,
            cumulative_weight: parent.cumulative_weight + u128::from(header.difficulty),
        })
    }

    fn store_header<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        stored: StoredHeader,
    ) -> Result<bool, HeaderSyncError> {
        let tip = self.canonical_tip(state, chain_id)?;

        let mut batch = WriteBatch::new();
        batch.put(&header_key(state, chain_id, &stored.hash), &stored)?;

        // 7. Fork choice
        let update = {
            let view = StoreView {
                state: &*state,
                chain_id,
            };
            plan_canonical_update(&view, &stored, &tip)?
        };
        if let Some(update) = &update {
            for height in &update.clear {
                batch.delete(&canonical_key(state, chain_id, *height));
            }
            for (height, hash) in &update.assign {
                batch.put(&canonical_key(state, chain_id, *height), hash)?;
            }
            batch.put(&height_key(state, chain_id), &update.new_height)?;
        }
        state.commit(batch)?;

        // Any canonical move that does not extend the old tip.
        let reorg = update.is_some() && stored.parent_hash() != tip.hash;
        match update {
            Some(update) if reorg => {
                info!(
                    chain_id,
                    new_tip = stored.number(),
                    old_tip = tip.number(),
                    relabeled = update.assign.len(),
                    cleared = update.clear.len(),
                    "[xc-04] canonical reorg"
                );
            }
            Some(_) => {
                info!(
                    chain_id,
                    number = stored.number(),
                    hash = %hex::encode(stored.hash),
                    "[xc-04] canonical header accepted"
                );
            }
            None => {
                debug!(
                    chain_id,
                    number = stored.number(),
                    weight = stored.cumulative_weight,
                    "[xc-04] side-chain header stored"
                );
            }
        }
        Ok(reorg)
    }

    fn genesis_snapshot<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
    ) -> Result<GenesisSnapshot, HeaderSyncError> {
        let record = self
            .genesis(state, chain_id)?
            .ok_or(HeaderSyncError::NotInitialized(chain_id))?;
        let current = self
            .epoch_snapshot(state, chain_id, record.number)?
            .ok_or(HeaderSyncError::EpochNotFound(record.number))?;
        let prior = self
            .epoch_snapshot(state, chain_id, record.prior_epoch_start)?
            .ok_or(HeaderSyncError::EpochNotFound(record.prior_epoch_start))?;
        Ok(GenesisSnapshot {
            hash: record.hash,
            current,
            prior,
        })
    }

    fn canonical_tip<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
    ) -> Result<StoredHeader, HeaderSyncError> {
        let height = self
            .current_height(state, chain_id)?
            .ok_or(HeaderSyncError::NotInitialized(chain_id))?;
        self.canonical_header(state, chain_id, height)?
            .ok_or(HeaderSyncError::NotInitialized(chain_id))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Genesis marker.
    pub fn genesis<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
    ) -> Result<Option<GenesisRecord>, HeaderSyncError> {
        Ok(state.get(&genesis_key(state, chain_id))?)
    }

    /// Lifecycle state of the chain's light client.
    pub fn status<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
    ) -> Result<LightClientState, HeaderSyncError> {
        let Some(genesis) = self.genesis(state, chain_id)? else {
            return Ok(LightClientState::Uninitialized);
        };
        match self.current_height(state, chain_id)? {
            Some(height) if height > genesis.number => Ok(LightClientState::Synced),
            _ => Ok(LightClientState::GenesisSet),
        }
    }

    /// Stored header by hash, canonical or not.
    pub fn header<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        hash: &Hash,
    ) -> Result<Option<StoredHeader>, HeaderSyncError> {
        StoreView { state, chain_id }.header(hash)
    }

    /// Canonical header at a height.
    pub fn canonical_header<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        height: u64,
    ) -> Result<Option<StoredHeader>, HeaderSyncError> {
        let view = StoreView { state, chain_id };
        match view.canonical_hash(height)? {
            Some(hash) => view.header(&hash),
            None => Ok(None),
        }
    }

    /// Canonical tip height.
    pub fn current_height<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
    ) -> Result<Option<u64>, HeaderSyncError> {
        Ok(state.get(&height_key(state, chain_id))?)
    }

    /// Whether `hash` is on the canonical chain.
    pub fn is_canonical<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        hash: &Hash,
    ) -> Result<bool, HeaderSyncError> {
        let view = StoreView { state, chain_id };
        let Some(stored) = view.header(hash)? else {
            return Ok(false);
        };
        Ok(view.canonical_hash(stored.number())? == Some(*hash))
    }

    /// Genesis epoch snapshot by start height.
    pub fn epoch_snapshot<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        start_height: u64,
    ) -> Result<Option<ValidatorEpoch>, HeaderSyncError> {
        Ok(state.get(&epoch_key(state, chain_id, start_height))?)
    }
}
