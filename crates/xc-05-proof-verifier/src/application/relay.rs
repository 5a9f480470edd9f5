//! # Relay-Attested Verifier
//!
//! For source chains with no verifiable proof. Each validator of the
//! governing epoch submits the payload it observed; the vote that reaches
//! quorum admits the instruction. Earlier and later votes return `None`.

use shared_types::{Address, ChainId, CrossChainInstruction, SideChain, TransitionContext};
use tracing::debug;
use xc_01_bridge_storage::{BridgeState, KeyValueStore};
use xc_03_consensus_vote::{ConsensusVoteEngine, ValidatorEpochSource, VoteConfig};

use super::admission::{admit, bind_payload};
use crate::config::ProofConfig;
use crate::domain::ProofError;

/// Vote-backed verifier.
#[derive(Debug, Clone)]
pub struct RelayAttestedVerifier {
    config: ProofConfig,
    local_chain_id: ChainId,
    engine: ConsensusVoteEngine,
}

impl RelayAttestedVerifier {
    /// Create a verifier voting through its own engine.
    pub fn new(config: ProofConfig, vote_config: VoteConfig, local_chain_id: ChainId) -> Self {
        Self {
            config,
            local_chain_id,
            engine: ConsensusVoteEngine::new(vote_config),
        }
    }

    /// Bytes voted on: the source chain ID (big-endian) followed by the payload.
    pub fn vote_message(source_chain_id: ChainId, payload: &[u8]) -> Vec<u8> {
        let mut message = Vec::with_capacity(8 + payload.len());
        message.extend_from_slice(&source_chain_id.to_be_bytes());
        message.extend_from_slice(payload);
        message
    }

    /// Record `signer`'s attestation of `payload`.
    ///
    /// The payload is decoded and bound before any vote is stored, so a
    /// misaddressed payload never collects votes.
    pub fn make_deposit_proposal<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        source: &SideChain,
        epochs: &dyn ValidatorEpochSource,
        signer: Address,
        payload: &[u8],
    ) -> Result<Option<CrossChainInstruction>, ProofError> {
        let instruction = bind_payload(
            payload,
            source.chain_id,
            self.local_chain_id,
            self.config.max_payload_len,
        )?;

        let message = Self::vote_message(source.chain_id, payload);
        if !self
            .engine
            .vote_with_source(state, ctx, epochs, signer, &message)?
        {
            debug!(
                chain_id = source.chain_id,
                signer = %hex::encode(signer),
                "[xc-05] relay vote pending"
            );
            return Ok(None);
        }
        admit(state, ctx, instruction, "relay").map(Some)
    }
}
