//! # Application Layer
//!
//! One verifier per source-chain family. Proof-backed verifiers expose
//! `verify_claim`, a pure check against the trust root. All of them expose
//! `make_deposit_proposal`, which also marks the cross-chain ID applied.

mod admission;
pub mod alt;
pub mod committee;
pub mod evm;
pub mod relay;
pub mod signature;

pub use alt::AltMptVerifier;
pub use committee::CommitteeStore;
pub use evm::EvmProofVerifier;
pub use relay::RelayAttestedVerifier;
pub use signature::SignatureProofVerifier;
