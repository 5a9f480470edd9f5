//! # Cross-Chain Dispatcher
//!
//! The single entry surface the host's dispatch framework calls into.
//! Deposit claims are routed by the source chain's router tag; light-client,
//! committee and custody calls are forwarded to their subsystem.

use bridge_telemetry::{
    CANONICAL_REORGS, CUSTODY_FINALIZED, HEADERS_ACCEPTED, INSTRUCTIONS_ADMITTED,
    REPLAYS_REJECTED, VOTES_RECORDED,
};
use shared_types::{
    Address, ChainId, Classify, CrossChainInstruction, ErrorKind, Hash, TransitionContext,
};
use tracing::{debug, info, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore};
use xc_02_replay_ledger::ReplayLedger;
use xc_03_consensus_vote::ValidatorEpochSource;
use xc_04_header_sync::{BatchOutcome, HeaderSyncLightClient, PoaHeader, SyncReport};
use xc_05_proof_verifier::{CommitteeKey, CommitteeStore};
use xc_06_btc_custody::{
    BtcCustodyMultisig, CustodianAddress, CustodyUtxo, Payout, SignatureOutcome, SpendDraft,
};

use super::registry::VerifierRegistry;
use crate::config::BridgeConfig;
use crate::domain::{DepositClaim, DispatchError, VerifierKind};
use crate::ports::SideChainRegistry;

/// Composes every bridge subsystem behind one configuration.
#[derive(Debug, Clone)]
pub struct CrossChainDispatcher {
    config: BridgeConfig,
    light_client: HeaderSyncLightClient,
    verifiers: VerifierRegistry,
    committees: CommitteeStore,
    custody: BtcCustodyMultisig,
}

impl CrossChainDispatcher {
    /// Validate `config` and build every subsystem from it.
    pub fn new(config: BridgeConfig) -> Result<Self, DispatchError> {
        config.validate().map_err(DispatchError::Config)?;
        let light_client = HeaderSyncLightClient::new(config.header_sync.clone());
        let verifiers = VerifierRegistry::from_config(&config, &light_client);
        info!(
            local_chain_id = config.local_chain_id,
            routes = verifiers.len(),
            "[xc-07] dispatcher initialized"
        );
        Ok(Self {
            custody: BtcCustodyMultisig::new(config.custody.clone()),
            committees: CommitteeStore::new(),
            light_client,
            verifiers,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Wrap `store` with this bridge's module address.
    pub fn open_state<S: KeyValueStore>(&self, store: S) -> BridgeState<S> {
        BridgeState::new(store, self.config.module_address.as_bytes().to_vec())
    }

    /// PoA light client, for header queries.
    pub fn light_client(&self) -> &HeaderSyncLightClient {
        &self.light_client
    }

    /// Custody service, for UTXO and draft queries.
    pub fn custody(&self) -> &BtcCustodyMultisig {
        &self.custody
    }

    /// Routed verifiers.
    pub fn verifiers(&self) -> &VerifierRegistry {
        &self.verifiers
    }

    // =========================================================================
    // Deposits
    // =========================================================================

    /// Route `claim` from `source_chain_id` to its verifier.
    ///
    /// `Ok(None)` means the submission counted but the claim is not final
    /// yet (relay vote below quorum, or arriving after it).
    pub fn make_deposit_proposal<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        side_chains: &dyn SideChainRegistry,
        epochs: &dyn ValidatorEpochSource,
        source_chain_id: ChainId,
        claim: &DepositClaim,
    ) -> Result<Option<CrossChainInstruction>, DispatchError> {
        let source = side_chains
            .side_chain(source_chain_id)
            .ok_or(DispatchError::UnknownSideChain(source_chain_id))?;
        let verifier = self.verifiers.resolve(&source)?;
        let label = verifier.kind().as_str();

        debug!(
            chain_id = source_chain_id,
            verifier = label,
            height = ctx.height,
            "[xc-07] routing deposit claim"
        );
        let result = verifier.make_deposit_proposal(state, ctx, &source, epochs, claim);

        match &result {
            Ok(Some(instruction)) => {
                INSTRUCTIONS_ADMITTED.with_label_values(&[label]).inc();
                if verifier.kind() == VerifierKind::Relay {
                    VOTES_RECORDED.inc();
                }
                info!(
                    chain_id = source_chain_id,
                    verifier = label,
                    cross_chain_id = %instruction.cross_chain_id_hex(),
                    "[xc-07] deposit admitted"
                );
            }
            Ok(None) => {
                VOTES_RECORDED.inc();
                debug!(chain_id = source_chain_id, verifier = label, "[xc-07] deposit pending");
            }
            Err(e) if e.kind() == ErrorKind::ReplayRejected => {
                REPLAYS_REJECTED.with_label_values(&[label]).inc();
                warn!(
                    chain_id = source_chain_id,
                    verifier = label,
                    error = %e,
                    "[xc-07] replayed deposit rejected"
                );
            }
            Err(e) => {
                warn!(
                    chain_id = source_chain_id,
                    verifier = label,
                    kind = %e.kind(),
                    error = %e,
                    "[xc-07] deposit rejected"
                );
            }
        }
        result
    }

    /// Whether `cross_chain_id` from `source_chain_id` was already admitted.
    pub fn is_applied<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        source_chain_id: ChainId,
        cross_chain_id: &[u8],
    ) -> Result<bool, DispatchError> {
        Ok(ReplayLedger::new().is_applied(state, source_chain_id, cross_chain_id)?)
    }

    // =========================================================================
    // Light client
    // =========================================================================

    /// Seed a PoA chain with its trusted genesis header.
    pub fn sync_genesis<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        header: PoaHeader,
        prior_validators: Vec<Address>,
    ) -> Result<(), DispatchError> {
        Ok(self
            .light_client
            .sync_genesis(state, chain_id, header, prior_validators)?)
    }

    /// Verify and store a batch of PoA headers.
    ///
    /// Headers applied before a rejection stay stored and are counted.
    pub fn sync_block_headers<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        chain_id: ChainId,
        headers: &[PoaHeader],
    ) -> Result<SyncReport, DispatchError> {
        Ok(self
            .sync_header_batch(state, ctx, chain_id, headers)?
            .into_result()?)
    }

    /// [`sync_block_headers`](Self::sync_block_headers), returning the
    /// progress made before a rejection together with it.
    pub fn sync_header_batch<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        chain_id: ChainId,
        headers: &[PoaHeader],
    ) -> Result<BatchOutcome, DispatchError> {
        let outcome = self
            .light_client
            .sync_batch(state, ctx, chain_id, headers)?;
        HEADERS_ACCEPTED.inc_by(outcome.report.accepted as u64);
        CANONICAL_REORGS.inc_by(outcome.report.reorgs as u64);
        Ok(outcome)
    }

    // =========================================================================
    // Committees
    // =========================================================================

    /// Install a signature-family chain's genesis committee.
    pub fn sync_committee_genesis<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        committee: CommitteeKey,
    ) -> Result<(), DispatchError> {
        Ok(self.committees.sync_genesis(state, chain_id, committee)?)
    }

    /// Replace a chain's committee with the successor named in a message
    /// signed by the current one.
    pub fn rotate_committee<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        message: &[u8],
    ) -> Result<CommitteeKey, DispatchError> {
        Ok(self.committees.rotate(state, chain_id, message)?)
    }

    // =========================================================================
    // Custody
    // =========================================================================

    /// Register a multisig redeem script; returns its custody key.
    pub fn register_redeem<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        redeem_script: &[u8],
    ) -> Result<String, DispatchError> {
        Ok(self.custody.register_redeem(state, chain_id, redeem_script)?)
    }

    /// Add a deposited custody output.
    pub fn record_deposit<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
        utxo: CustodyUtxo,
    ) -> Result<(), DispatchError> {
        Ok(self.custody.record_deposit(state, chain_id, redeem_key, utxo)?)
    }

    /// Draft a custody spend, reserving its inputs.
    pub fn create_draft<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
        payouts: &[Payout],
        fee: u64,
    ) -> Result<SpendDraft, DispatchError> {
        Ok(self
            .custody
            .create_draft(state, chain_id, redeem_key, payouts, fee)?)
    }

    /// Record one custodian's signatures for a draft.
    pub fn add_signature<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        signer: CustodianAddress,
        txid: &Hash,
        signatures: Vec<Vec<u8>>,
    ) -> Result<SignatureOutcome, DispatchError> {
        let outcome = self
            .custody
            .add_signature(state, chain_id, signer, txid, signatures)?;
        if matches!(outcome, SignatureOutcome::Finalized { .. }) {
            CUSTODY_FINALIZED.inc();
        }
        Ok(outcome)
    }
}
