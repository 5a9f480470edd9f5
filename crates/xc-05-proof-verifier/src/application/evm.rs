//! # EVM Proof Verifier
//!
//! Proves that the source chain's cross-chain manager stored
//! `keccak256(payload)` in one of its slots, under the state root of a
//! canonical header the light client synced.
//!
//! ```text
//! header.root ──account_proof[keccak(addr)]──► account.storage_root
//!             ──storage_proof[keccak(slot)]──► keccak(payload)
//! ```

use primitive_types::U256;
use shared_crypto::keccak256;
use shared_types::{ChainId, CrossChainInstruction, Hash, SideChain, TransitionContext};
use tracing::{debug, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore};
use xc_04_header_sync::HeaderSyncLightClient;

use super::admission::{admit, bind_payload};
use crate::algorithms::keccak_trie;
use crate::config::ProofConfig;
use crate::domain::{EvmProofClaim, ProofError};

/// Verifier for chains tracked by the PoA light client.
#[derive(Debug, Clone)]
pub struct EvmProofVerifier {
    config: ProofConfig,
    local_chain_id: ChainId,
    light_client: HeaderSyncLightClient,
}

impl EvmProofVerifier {
    /// Create a verifier reading headers through `light_client`.
    pub fn new(
        config: ProofConfig,
        local_chain_id: ChainId,
        light_client: HeaderSyncLightClient,
    ) -> Self {
        Self {
            config,
            local_chain_id,
            light_client,
        }
    }

    /// Check `claim` without touching the replay ledger.
    pub fn verify_claim<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        source: &SideChain,
        claim: &EvmProofClaim,
    ) -> Result<CrossChainInstruction, ProofError> {
        if claim.payload.len() > self.config.max_payload_len {
            return Err(ProofError::PayloadTooLarge {
                len: claim.payload.len(),
                max: self.config.max_payload_len,
            });
        }
        let proof = &claim.proof;
        if proof.address.as_slice() != source.ccm_contract.as_slice() {
            return Err(ProofError::AddressMismatch {
                expected: hex::encode(&source.ccm_contract),
                actual: hex::encode(proof.address),
            });
        }

        let state_root = self.anchor(state, source, claim.height)?;

        let depth = self.config.max_proof_depth;
        let leaf = keccak_trie::verify_proof(
            &state_root,
            &keccak256(&proof.address),
            &proof.account_proof,
            depth,
        )?;
        if leaf != rlp::encode(&proof.account()).to_vec() {
            warn!(
                chain_id = source.chain_id,
                height = claim.height,
                "[xc-05] account leaf differs from claimed fields"
            );
            return Err(ProofError::AccountMismatch);
        }

        let [slot] = proof.storage_proofs.as_slice() else {
            return Err(ProofError::InvalidStorageProofCount(
                proof.storage_proofs.len(),
            ));
        };
        let leaf = keccak_trie::verify_proof(
            &proof.storage_hash,
            &keccak256(&slot.key),
            &slot.proof,
            depth,
        )?;
        if leaf != rlp::encode(&slot.value).to_vec() {
            return Err(ProofError::StorageMismatch);
        }

        let expected = keccak256(&claim.payload);
        let actual = word(&slot.value);
        if actual != expected {
            return Err(ProofError::ValueMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }

        debug!(
            chain_id = source.chain_id,
            height = claim.height,
            "[xc-05] evm storage proof verified"
        );
        bind_payload(
            &claim.payload,
            source.chain_id,
            self.local_chain_id,
            self.config.max_payload_len,
        )
    }

    /// State root of the canonical header at `height`, once buried by
    /// `blocks_to_wait` confirmations.
    fn anchor<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        source: &SideChain,
        height: u64,
    ) -> Result<Hash, ProofError> {
        let not_found = ProofError::HeaderNotFound {
            chain_id: source.chain_id,
            height,
        };
        let header = self
            .light_client
            .canonical_header(state, source.chain_id, height)?
            .ok_or(not_found)?;
        let tip = self
            .light_client
            .current_height(state, source.chain_id)?
            .unwrap_or(height);
        let confirmations = tip.saturating_sub(height);
        if confirmations < source.blocks_to_wait {
            return Err(ProofError::InsufficientConfirmations {
                height,
                confirmations,
                required: source.blocks_to_wait,
            });
        }
        if header.header.root == [0u8; 32] {
            return Err(ProofError::EmptyRoot);
        }
        Ok(header.header.root)
    }

    /// Verify `claim` and admit the instruction it carries.
    pub fn make_deposit_proposal<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        source: &SideChain,
        claim: &EvmProofClaim,
    ) -> Result<Option<CrossChainInstruction>, ProofError> {
        let instruction = self.verify_claim(state, source, claim)?;
        admit(state, ctx, instruction, "evm").map(Some)
    }
}

fn word(value: &U256) -> Hash {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}
