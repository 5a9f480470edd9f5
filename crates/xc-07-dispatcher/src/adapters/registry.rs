//! In-memory side-chain registry.

use std::collections::BTreeMap;

use shared_types::{ChainId, SideChain};

use crate::ports::SideChainRegistry;

/// Side chains keyed by chain ID.
#[derive(Debug, Default, Clone)]
pub struct InMemorySideChainRegistry {
    chains: BTreeMap<ChainId, SideChain>,
}

impl InMemorySideChainRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a registration.
    pub fn register(&mut self, chain: SideChain) {
        self.chains.insert(chain.chain_id, chain);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_chain(mut self, chain: SideChain) -> Self {
        self.register(chain);
        self
    }
}

impl SideChainRegistry for InMemorySideChainRegistry {
    fn side_chain(&self, chain_id: ChainId) -> Option<SideChain> {
        self.chains.get(&chain_id).cloned()
    }
}
