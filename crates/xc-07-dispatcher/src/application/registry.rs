//! # Verifier Registry
//!
//! One verifier per family, chosen by the side chain's router tag.

use std::collections::BTreeMap;

use shared_types::{CrossChainInstruction, SideChain, TransitionContext};
use xc_01_bridge_storage::{BridgeState, KeyValueStore};
use xc_03_consensus_vote::ValidatorEpochSource;
use xc_04_header_sync::HeaderSyncLightClient;
use xc_05_proof_verifier::{
    AltMptVerifier, EvmProofVerifier, ProofError, RelayAttestedVerifier, SignatureProofVerifier,
};

use crate::config::BridgeConfig;
use crate::domain::{DepositClaim, DispatchError, VerifierKind};

/// Closed set of verifier families.
#[derive(Debug, Clone)]
pub enum ProofVerifier {
    /// Header-anchored account/storage proofs.
    Evm(EvmProofVerifier),
    /// Committee-anchored alternate-encoding trie proofs.
    AltMpt(AltMptVerifier),
    /// Committee-anchored inclusion paths.
    Signature(SignatureProofVerifier),
    /// Quorum-voted payloads.
    Relay(RelayAttestedVerifier),
}

impl ProofVerifier {
    /// Build the verifier of `kind` from bridge configuration.
    pub fn build(
        kind: VerifierKind,
        config: &BridgeConfig,
        light_client: &HeaderSyncLightClient,
    ) -> Self {
        let proof = config.proof.clone();
        let local = config.local_chain_id;
        match kind {
            VerifierKind::Evm => {
                ProofVerifier::Evm(EvmProofVerifier::new(proof, local, light_client.clone()))
            }
            VerifierKind::AltMpt => ProofVerifier::AltMpt(AltMptVerifier::new(proof, local)),
            VerifierKind::Signature => {
                ProofVerifier::Signature(SignatureProofVerifier::new(proof, local))
            }
            VerifierKind::Relay => ProofVerifier::Relay(RelayAttestedVerifier::new(
                proof,
                config.vote.clone(),
                local,
            )),
        }
    }

    /// Family of this verifier.
    pub fn kind(&self) -> VerifierKind {
        match self {
            ProofVerifier::Evm(_) => VerifierKind::Evm,
            ProofVerifier::AltMpt(_) => VerifierKind::AltMpt,
            ProofVerifier::Signature(_) => VerifierKind::Signature,
            ProofVerifier::Relay(_) => VerifierKind::Relay,
        }
    }

    /// Check `claim` and admit its instruction.
    ///
    /// `Ok(None)` means the claim was recorded but is not yet final.
    pub fn make_deposit_proposal<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        ctx: &TransitionContext,
        source: &SideChain,
        epochs: &dyn ValidatorEpochSource,
        claim: &DepositClaim,
    ) -> Result<Option<CrossChainInstruction>, DispatchError> {
        let result: Result<_, ProofError> = match (self, claim) {
            (ProofVerifier::Evm(v), DepositClaim::Evm(c)) => {
                v.make_deposit_proposal(state, ctx, source, c)
            }
            (ProofVerifier::AltMpt(v), DepositClaim::AltMpt(c)) => {
                v.make_deposit_proposal(state, ctx, source, c)
            }
            (ProofVerifier::Signature(v), DepositClaim::Signature(c)) => {
                v.make_deposit_proposal(state, ctx, source, c)
            }
            (ProofVerifier::Relay(v), DepositClaim::Relay { signer, payload }) => {
                v.make_deposit_proposal(state, ctx, source, epochs, *signer, payload)
            }
            _ => {
                return Err(DispatchError::ClaimMismatch {
                    chain_id: source.chain_id,
                    expected: self.kind(),
                    actual: claim.kind(),
                })
            }
        };
        Ok(result?)
    }
}

/// Router tag to verifier.
#[derive(Debug, Clone, Default)]
pub struct VerifierRegistry {
    routes: BTreeMap<u64, ProofVerifier>,
}

impl VerifierRegistry {
    /// One verifier per configured route.
    pub fn from_config(config: &BridgeConfig, light_client: &HeaderSyncLightClient) -> Self {
        let routes = config
            .routes
            .iter()
            .map(|route| {
                (
                    route.router,
                    ProofVerifier::build(route.verifier, config, light_client),
                )
            })
            .collect();
        Self { routes }
    }

    /// Verifier handling claims from `source`.
    pub fn resolve(&self, source: &SideChain) -> Result<&ProofVerifier, DispatchError> {
        self.routes
            .get(&source.router)
            .ok_or(DispatchError::UnroutedChain {
                chain_id: source.chain_id,
                router: source.router,
            })
    }

    /// Number of routed tags.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no tag is routed.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
