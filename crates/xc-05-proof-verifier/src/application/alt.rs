//! # Alt-MPT Proof Verifier
//!
//! For chains whose state trie uses the type-byte node encoding. The trusted
//! state root comes from a committee-signed message, then two trie levels
//! lead from it to `sha256(payload)`:
//!
//! ```text
//! body.state_root ──account_proof[contract]──► storage_root
//!                 ──storage_proof[storage_key]──► sha256(payload)
//! ```

use shared_crypto::sha256;
use shared_types::{ChainId, CrossChainInstruction, SideChain, TransitionContext};
use tracing::debug;
use xc_01_bridge_storage::{BridgeState, KeyValueStore};

use super::admission::{admit, bind_payload};
use super::committee::CommitteeStore;
use crate::algorithms::alt_trie::{normalize_value, storage_root_from_leaf, verify_proof};
use crate::config::ProofConfig;
use crate::domain::{AltProofClaim, ProofError};

/// Verifier for alt-trie chains.
#[derive(Debug, Clone)]
pub struct AltMptVerifier {
    config: ProofConfig,
    local_chain_id: ChainId,
    committees: CommitteeStore,
}

impl AltMptVerifier {
    /// Create a verifier.
    pub fn new(config: ProofConfig, local_chain_id: ChainId) -> Self {
        Self {
            config,
            local_chain_id,
            committees: CommitteeStore::new(),
        }
    }

    /// Check `claim` without touching the replay ledger.
    pub fn verify_claim<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        source: &SideChain,
        claim: &AltProofClaim,
    ) -> Result<CrossChainInstruction, ProofError> {
        if claim.payload.len() > self.config.max_payload_len {
            return Err(ProofError::PayloadTooLarge {
                len: claim.payload.len(),
                max: self.config.max_payload_len,
            });
        }
        if claim.contract != source.ccm_contract {
            return Err(ProofError::AddressMismatch {
                expected: hex::encode(&source.ccm_contract),
                actual: hex::encode(&claim.contract),
            });
        }

        let body = self
            .committees
            .verify_message(state, source.chain_id, &claim.message)?;
        if body.state_root == [0u8; 32] {
            return Err(ProofError::EmptyRoot);
        }

        let depth = self.config.max_proof_depth;
        let account_leaf = verify_proof(
            &body.state_root,
            &claim.contract,
            &claim.account_proof,
            depth,
        )?;
        let storage_root = storage_root_from_leaf(&account_leaf)?;
        let storage_leaf = verify_proof(
            &storage_root,
            &claim.storage_key,
            &claim.storage_proof,
            depth,
        )?;

        let expected = sha256(&claim.payload);
        let actual = normalize_value(&storage_leaf)?;
        if actual != expected {
            return Err(ProofError::ValueMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }

        debug!(
            chain_id = source.chain_id,
            height = body.height,
            "[xc-05] alt-trie proof verified"
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
        claim: &AltProofClaim,
    ) -> Result<Option<CrossChainInstruction>, ProofError> {
        let instruction = self.verify_claim(state, source, claim)?;
        admit(state, ctx, instruction, "alt_mpt").map(Some)
    }
}
