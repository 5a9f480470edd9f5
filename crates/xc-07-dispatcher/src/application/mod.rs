//! # Application Layer
//!
//! `CrossChainDispatcher` composes the subsystems; `VerifierRegistry` maps
//! router tags onto the closed `ProofVerifier` set.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::CrossChainDispatcher;
pub use registry::{ProofVerifier, VerifierRegistry};
