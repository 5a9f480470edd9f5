//! # Dispatch Types

use serde::{Deserialize, Serialize};
use shared_types::Address;
use xc_05_proof_verifier::{AltProofClaim, EvmProofClaim, SignatureClaim};

/// Router tag of vote-backed chains (Bitcoin family).
pub const ROUTER_RELAY: u64 = 1;
/// Router tag of header-synced EVM chains.
pub const ROUTER_EVM: u64 = 2;
/// Router tag of committee-signed chains.
pub const ROUTER_SIGNATURE: u64 = 3;
/// Router tag of chains proven through the alternate trie encoding.
pub const ROUTER_ALT_MPT: u64 = 4;

/// Verifier family a router tag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifierKind {
    /// Account and storage proof under a synced header.
    Evm,
    /// Alternate-encoding trie proof under a committee-signed root.
    AltMpt,
    /// Committee-signed root plus transaction inclusion path.
    Signature,
    /// Validator quorum vote on the raw payload.
    Relay,
}

impl VerifierKind {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifierKind::Evm => "evm",
            VerifierKind::AltMpt => "alt_mpt",
            VerifierKind::Signature => "signature",
            VerifierKind::Relay => "relay",
        }
    }
}

impl std::fmt::Display for VerifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding of a side-chain router tag to a verifier family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// `SideChain::router` value.
    pub router: u64,
    /// Family handling claims from chains with that tag.
    pub verifier: VerifierKind,
}

/// A pre-decoded deposit claim as handed over by the dispatch framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositClaim {
    /// EVM account/storage proof.
    Evm(EvmProofClaim),
    /// Alternate-encoding trie proof.
    AltMpt(AltProofClaim),
    /// Committee signature proof.
    Signature(SignatureClaim),
    /// One validator's attestation of a raw payload.
    Relay {
        /// Submitting validator.
        signer: Address,
        /// RLP event payload.
        payload: Vec<u8>,
    },
}

impl DepositClaim {
    /// Family able to check this claim.
    pub fn kind(&self) -> VerifierKind {
        match self {
            DepositClaim::Evm(_) => VerifierKind::Evm,
            DepositClaim::AltMpt(_) => VerifierKind::AltMpt,
            DepositClaim::Signature(_) => VerifierKind::Signature,
            DepositClaim::Relay { .. } => VerifierKind::Relay,
        }
    }
}
