//! # XC-07 Cross-Chain Dispatcher
//!
//! Routes inbound claims to the verifier their source chain is registered
//! for, and fronts the light-client, committee and custody entry points.
//!
//! **Subsystem ID:** XC-07
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Routing
//!
//! | Router | Verifier | Trust root |
//! |--------|----------|------------|
//! | 1 | `Relay` | validator quorum |
//! | 2 | `Evm` | canonical PoA header |
//! | 3 | `Signature` | committee-signed root |
//! | 4 | `AltMpt` | committee-signed root |
//!
//! The table is configurable through `BridgeConfig::routes`.
//!
//! ## Module Structure
//!
//! ```text
//! xc-07-dispatcher/
//! ├── domain/          # VerifierKind, Route, DepositClaim, DispatchError
//! ├── ports/           # SideChainRegistry (driven port)
//! ├── adapters/        # InMemorySideChainRegistry
//! ├── application/     # CrossChainDispatcher, VerifierRegistry, ProofVerifier
//! └── config.rs        # BridgeConfig (TOML)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemorySideChainRegistry;
pub use application::{CrossChainDispatcher, ProofVerifier, VerifierRegistry};
pub use config::{default_routes, BridgeConfig};
pub use domain::{
    DepositClaim, DispatchError, Route, VerifierKind, ROUTER_ALT_MPT, ROUTER_EVM, ROUTER_RELAY,
    ROUTER_SIGNATURE,
};
pub use ports::SideChainRegistry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
