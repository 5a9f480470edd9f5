//! # Signature Proof Verifier
//!
//! The source chain's committee signs a root over its transactions; the
//! claim carries the payload and its Merkle path up to that root.

use shared_crypto::sha256;
use shared_types::{ChainId, CrossChainInstruction, SideChain, TransitionContext};
use tracing::{debug, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore};

use super::admission::{admit, bind_payload};
use super::committee::CommitteeStore;
use crate::algorithms::verify_inclusion;
use crate::config::ProofConfig;
use crate::domain::{CommitteeKey, ProofError, SignatureClaim};

/// Verifier for committee-signed chains.
#[derive(Debug, Clone)]
pub struct SignatureProofVerifier {
    config: ProofConfig,
    local_chain_id: ChainId,
    committees: CommitteeStore,
}

impl SignatureProofVerifier {
    /// Create a verifier.
    pub fn new(config: ProofConfig, local_chain_id: ChainId) -> Self {
        Self {
            config,
            local_chain_id,
            committees: CommitteeStore::new(),
        }
    }

    /// Install the chain's genesis committee.
    pub fn sync_committee_genesis<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        committee: CommitteeKey,
    ) -> Result<(), ProofError> {
        self.committees.sync_genesis(state, chain_id, committee)
    }

    /// Apply a committee rotation message.
    pub fn rotate_committee<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        message: &[u8],
    ) -> Result<CommitteeKey, ProofError> {
        self.committees.rotate(state, chain_id, message)
    }

    /// Current committee of the chain.
    pub fn committee<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
    ) -> Result<Option<CommitteeKey>, ProofError> {
        self.committees.current(state, chain_id)
    }

    /// Check `claim` without touching the replay ledger.
    pub fn verify_claim<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        source: &SideChain,
        claim: &SignatureClaim,
    ) -> Result<CrossChainInstruction, ProofError> {
        if claim.path.len() > self.config.max_merkle_path {
            return Err(ProofError::ProofTooDeep {
                depth: claim.path.len(),
                max: self.config.max_merkle_path,
            });
        }
        if claim.payload.len() > self.config.max_payload_len {
            return Err(ProofError::PayloadTooLarge {
                len: claim.payload.len(),
                max: self.config.max_payload_len,
            });
        }

        let body = self
            .committees
            .verify_message(state, source.chain_id, &claim.message)?;
        if body.state_root == [0u8; 32] {
            return Err(ProofError::EmptyRoot);
        }
        if !verify_inclusion(&sha256(&claim.payload), &claim.path, &body.state_root) {
            warn!(
                chain_id = source.chain_id,
                height = body.height,
                root = %hex::encode(body.state_root),
                "[xc-05] payload not included under signed root"
            );
            return Err(ProofError::InclusionFailed);
        }

        debug!(
            chain_id = source.chain_id,
            height = body.height,
            path = claim.path.len(),
            "[xc-05] signature proof verified"
        );
        bind_payload(
            &claim.payload,
            source.chain_id,
            self.local_chain_id,
            self.config.max_payload_len,
        )
    }

    /// Verify `claim` and admit the instruction it carries.
    pub fn make_deposit_proposal<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        source: &SideChain,
        claim: &SignatureClaim,
    ) -> Result<Option<CrossChainInstruction>, ProofError> {
        let instruction = self.verify_claim(state, source, claim)?;
        admit(state, ctx, instruction, "signature").map(Some)
    }
}
