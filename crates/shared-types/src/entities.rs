//! # Core Bridge Entities
//!
//! ## Clusters
//!
//! - **Identity**: `Hash`, `Address`, `ChainId`
//! - **Host context**: `TransitionContext`
//! - **Admission**: `EventPayload` (foreign-chain body), `CrossChainInstruction`

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};

use crate::errors::PayloadError;

/// A 32-byte hash (keccak256 or sha256 depending on the source chain).
pub type Hash = [u8; 32];

/// A 20-byte account address.
pub type Address = [u8; 20];

/// Numeric identifier the bridge assigns to a registered chain.
pub type ChainId = u64;

/// Host-provided view of the state transition being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionContext {
    /// Height of the local block being built.
    pub height: u64,
    /// Unix timestamp (seconds) of the local block being built.
    pub timestamp: u64,
}

impl TransitionContext {
    /// Create a context.
    pub fn new(height: u64, timestamp: u64) -> Self {
        Self { height, timestamp }
    }
}

/// The event body a foreign chain commits to.
///
/// Wire form is an RLP list of seven items:
/// `[tx_hash, cross_chain_id, from_contract, to_chain_id, to_contract, method, args]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventPayload {
    /// Hash of the foreign transaction that emitted the event.
    pub tx_hash: Vec<u8>,
    /// Dedup token assigned by the source chain.
    pub cross_chain_id: Vec<u8>,
    /// Emitting contract on the source chain.
    pub from_contract: Vec<u8>,
    /// Chain the instruction is addressed to.
    pub to_chain_id: ChainId,
    /// Target contract on the destination chain.
    pub to_contract: Vec<u8>,
    /// Method to invoke on the target contract.
    pub method: Vec<u8>,
    /// Opaque call arguments.
    pub args: Vec<u8>,
}

impl EventPayload {
    /// RLP encoding, the byte string whose hash the source chain commits.
    pub fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }

    /// Decode an RLP-encoded payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        rlp::decode(bytes).map_err(|e| PayloadError::Decode(e.to_string()))
    }

    /// Bind the payload to the chain it was proven on.
    pub fn into_instruction(
        self,
        source_chain_id: ChainId,
    ) -> Result<CrossChainInstruction, PayloadError> {
        if self.cross_chain_id.is_empty() {
            return Err(PayloadError::EmptyCrossChainId);
        }
        let method = String::from_utf8(self.method).map_err(|_| PayloadError::InvalidMethod)?;
        if method.is_empty() {
            return Err(PayloadError::InvalidMethod);
        }

        Ok(CrossChainInstruction {
            tx_hash: self.tx_hash,
            cross_chain_id: self.cross_chain_id,
            source_chain_id,
            source_contract: self.from_contract,
            dest_chain_id: self.to_chain_id,
            dest_contract: self.to_contract,
            method,
            args: self.args,
        })
    }
}

impl Encodable for EventPayload {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(7);
        s.append(&self.tx_hash);
        s.append(&self.cross_chain_id);
        s.append(&self.from_contract);
        s.append(&self.to_chain_id);
        s.append(&self.to_contract);
        s.append(&self.method);
        s.append(&self.args);
    }
}

impl Decodable for EventPayload {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 7 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            tx_hash: rlp.val_at(0)?,
            cross_chain_id: rlp.val_at(1)?,
            from_contract: rlp.val_at(2)?,
            to_chain_id: rlp.val_at(3)?,
            to_contract: rlp.val_at(4)?,
            method: rlp.val_at(5)?,
            args: rlp.val_at(6)?,
        })
    }
}

/// Governance registration of a foreign chain. Read-only to the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideChain {
    /// Bridge-assigned chain ID.
    pub chain_id: ChainId,
    /// Display name.
    pub name: String,
    /// Router tag selecting how claims from this chain are verified.
    pub router: u64,
    /// Cross-chain manager contract whose state or events are proven.
    pub ccm_contract: Vec<u8>,
    /// Canonical headers that must bury a proven height.
    pub blocks_to_wait: u64,
}

/// A claim admitted by the bridge, ready for the asset module.
///
/// Produced once per admitted event and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainInstruction {
    /// Hash of the originating foreign transaction.
    pub tx_hash: Vec<u8>,
    /// Dedup token; the replay ledger is keyed on it.
    pub cross_chain_id: Vec<u8>,
    /// Chain the event was proven on.
    pub source_chain_id: ChainId,
    /// Emitting contract on the source chain.
    pub source_contract: Vec<u8>,
    /// Destination chain (the local chain once admitted).
    pub dest_chain_id: ChainId,
    /// Target contract on the local chain.
    pub dest_contract: Vec<u8>,
    /// Method name.
    pub method: String,
    /// Opaque call arguments.
    pub args: Vec<u8>,
}

impl CrossChainInstruction {
    /// Hex form of the dedup token, for logs.
    pub fn cross_chain_id_hex(&self) -> String {
        hex::encode(&self.cross_chain_id)
    }
}
