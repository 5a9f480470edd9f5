//! # Outbound Ports (Driven Ports)
//!
//! Governance registers side chains; the dispatcher only reads them.

use shared_types::{ChainId, SideChain};

/// Source of side-chain registrations.
pub trait SideChainRegistry: Send + Sync {
    /// Registration of `chain_id`, if governance has made one.
    fn side_chain(&self, chain_id: ChainId) -> Option<SideChain>;
}
