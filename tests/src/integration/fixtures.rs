//! Shared bridge fixture: one dispatcher, four registered side chains and
//! a relayer epoch.

use shared_crypto::Secp256k1KeyPair;
use shared_types::{
    Address, ChainId, CrossChainInstruction, EventPayload, SideChain, TransitionContext,
};
use xc_01_bridge_storage::{BridgeState, InMemoryKVStore};
use xc_03_consensus_vote::{InMemoryEpochSource, ValidatorEpoch};
use xc_05_proof_verifier::CommitteeKey;
use xc_07_dispatcher::{
    BridgeConfig, CrossChainDispatcher, DepositClaim, DispatchError, InMemorySideChainRegistry,
    ROUTER_ALT_MPT, ROUTER_EVM, ROUTER_RELAY, ROUTER_SIGNATURE,
};

pub const LOCAL: ChainId = 7;
pub const RELAY_CHAIN: ChainId = 1;
pub const ALT_CHAIN: ChainId = 3;
pub const SIG_CHAIN: ChainId = 4;
pub const EVM_CHAIN: ChainId = 56;

pub const CCM: Address = [0xCC; 20];
pub const ALT_CONTRACT: Address = [0xAB; 20];

pub fn relayers() -> Vec<Address> {
    (1..=4u8).map(|i| [i; 20]).collect()
}

pub fn committee_keys(tag: u8, n: u8) -> Vec<Secp256k1KeyPair> {
    (1..=n)
        .map(|i| Secp256k1KeyPair::from_bytes([tag + i; 32]).unwrap())
        .collect()
}

pub fn committee(height: u64, threshold: u32, keys: &[Secp256k1KeyPair]) -> CommitteeKey {
    CommitteeKey::new(
        height,
        threshold,
        keys.iter().map(|k| k.public_key().as_bytes().to_vec()).collect(),
    )
}

/// Payload addressed to the local chain.
pub fn payload(cross_chain_id: &[u8]) -> Vec<u8> {
    payload_to(cross_chain_id, LOCAL)
}

pub fn payload_to(cross_chain_id: &[u8], to_chain_id: ChainId) -> Vec<u8> {
    EventPayload {
        tx_hash: vec![0x11; 32],
        cross_chain_id: cross_chain_id.to_vec(),
        from_contract: CCM.to_vec(),
        to_chain_id,
        to_contract: vec![0x33; 20],
        method: b"unlock".to_vec(),
        args: vec![0x01, 0x02],
    }
    .encode()
}

pub struct Bridge {
    pub dispatcher: CrossChainDispatcher,
    pub side_chains: InMemorySideChainRegistry,
    pub epochs: InMemoryEpochSource,
    pub state: BridgeState<InMemoryKVStore>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::for_testing())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let dispatcher = CrossChainDispatcher::new(config).unwrap();
        let side_chains = InMemorySideChainRegistry::new()
            .with_chain(side_chain(RELAY_CHAIN, "btc", ROUTER_RELAY, vec![], 6))
            .with_chain(side_chain(EVM_CHAIN, "bsc", ROUTER_EVM, CCM.to_vec(), 2))
            .with_chain(side_chain(SIG_CHAIN, "neo", ROUTER_SIGNATURE, vec![], 1))
            .with_chain(side_chain(
                ALT_CHAIN,
                "ont",
                ROUTER_ALT_MPT,
                ALT_CONTRACT.to_vec(),
                1,
            ));
        let state = dispatcher.open_state(InMemoryKVStore::new());
        Self {
            dispatcher,
            side_chains,
            epochs: InMemoryEpochSource::with_epoch(ValidatorEpoch::new(0, relayers())),
            state,
        }
    }

    pub fn propose(
        &mut self,
        chain_id: ChainId,
        claim: &DepositClaim,
    ) -> Result<Option<CrossChainInstruction>, DispatchError> {
        self.propose_at(100, chain_id, claim)
    }

    pub fn propose_at(
        &mut self,
        height: u64,
        chain_id: ChainId,
        claim: &DepositClaim,
    ) -> Result<Option<CrossChainInstruction>, DispatchError> {
        self.dispatcher.make_deposit_proposal(
            &mut self.state,
            &TransitionContext::new(height, 50_000),
            &self.side_chains,
            &self.epochs,
            chain_id,
            claim,
        )
    }

    pub fn is_applied(&self, chain_id: ChainId, cross_chain_id: &[u8]) -> bool {
        self.dispatcher
            .is_applied(&self.state, chain_id, cross_chain_id)
            .unwrap()
    }
}

fn side_chain(
    chain_id: ChainId,
    name: &str,
    router: u64,
    ccm_contract: Vec<u8>,
    blocks_to_wait: u64,
) -> SideChain {
    SideChain {
        chain_id,
        name: name.to_string(),
        router,
        ccm_contract,
        blocks_to_wait,
    }
}
