//! # Proof Claims and Trust Roots
//!
//! ## Clusters
//!
//! - **EVM**: `EvmAccount`, `AccountProof`, `StorageProof`, `EvmProofClaim`
//! - **Committee**: `CommitteeKey`, `MessageBody`, `WitnessEntry`, `CommitteeMessage`
//! - **Committee-anchored claims**: `SignatureClaim`, `AltProofClaim`
//! - **Inclusion paths**: `PathNode`, `Position`

use primitive_types::U256;
use rlp::{Encodable, RlpStream};
use serde::{Deserialize, Serialize};
use shared_crypto::{sha256, Secp256k1PublicKey};
use shared_types::{Address, ChainId, Hash};

use super::errors::ProofError;

// =============================================================================
// EVM ACCOUNT PROOFS
// =============================================================================

/// Account record stored in an EVM world-state trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmAccount {
    /// Account nonce.
    pub nonce: u64,
    /// Balance in wei.
    pub balance: U256,
    /// Root of the account's storage trie.
    pub storage_root: Hash,
    /// Keccak of the account's code.
    pub code_hash: Hash,
}

impl Encodable for EvmAccount {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        s.append(&self.nonce);
        s.append(&self.balance);
        s.append(&self.storage_root.as_slice());
        s.append(&self.code_hash.as_slice());
    }
}

/// Proof of one storage slot, in `eth_getProof` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProof {
    /// Slot key (unhashed).
    pub key: Hash,
    /// Slot value.
    pub value: U256,
    /// Trie nodes from the storage root down.
    pub proof: Vec<Vec<u8>>,
}

/// Account and storage proof, in `eth_getProof` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProof {
    /// Proven account.
    pub address: Address,
    /// Claimed nonce.
    pub nonce: u64,
    /// Claimed balance.
    pub balance: U256,
    /// Claimed storage root.
    pub storage_hash: Hash,
    /// Claimed code hash.
    pub code_hash: Hash,
    /// Trie nodes from the state root down.
    pub account_proof: Vec<Vec<u8>>,
    /// Storage entries; exactly one is accepted.
    pub storage_proofs: Vec<StorageProof>,
}

impl AccountProof {
    /// Account record the claimed fields encode to.
    pub fn account(&self) -> EvmAccount {
        EvmAccount {
            nonce: self.nonce,
            balance: self.balance,
            storage_root: self.storage_hash,
            code_hash: self.code_hash,
        }
    }
}

/// Claim that an EVM chain stored a payload digest at a height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmProofClaim {
    /// Foreign height whose state root anchors the proof.
    pub height: u64,
    /// RLP-encoded event payload.
    pub payload: Vec<u8>,
    /// Account and storage proof.
    pub proof: AccountProof,
}

// =============================================================================
// COMMITTEE
// =============================================================================

/// Signing committee of a signature-family chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeKey {
    /// Foreign height this committee took over at.
    pub height: u64,
    /// Distinct signatures required.
    pub threshold: u32,
    /// Ordered 33-byte compressed secp256k1 keys.
    pub public_keys: Vec<Vec<u8>>,
}

impl CommitteeKey {
    /// Create a committee.
    pub fn new(height: u64, threshold: u32, public_keys: Vec<Vec<u8>>) -> Self {
        Self {
            height,
            threshold,
            public_keys,
        }
    }

    /// Parse the keys, checking the committee is usable.
    pub fn parsed_keys(&self) -> Result<Vec<Secp256k1PublicKey>, ProofError> {
        if self.public_keys.is_empty() {
            return Err(ProofError::InvalidCommittee("no keys".to_string()));
        }
        if self.threshold == 0 || self.threshold as usize > self.public_keys.len() {
            return Err(ProofError::InvalidCommittee(format!(
                "threshold {} outside 1..={}",
                self.threshold,
                self.public_keys.len()
            )));
        }

        let mut keys = Vec::with_capacity(self.public_keys.len());
        for (i, raw) in self.public_keys.iter().enumerate() {
            let key = Secp256k1PublicKey::from_slice(raw)
                .map_err(|e| ProofError::InvalidCommittee(format!("key {i}: {e}")))?;
            if keys.contains(&key) {
                return Err(ProofError::InvalidCommittee(format!("key {i} repeated")));
            }
            keys.push(key);
        }
        Ok(keys)
    }
}

/// Body the committee signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Message format version.
    pub version: u8,
    /// Chain the committee signs for.
    pub chain_id: ChainId,
    /// Foreign height the root belongs to.
    pub height: u64,
    /// Root committing to the chain's transactions or state.
    pub state_root: Hash,
    /// Successor committee, for rotation messages.
    pub next_committee: Option<CommitteeKey>,
}

impl MessageBody {
    /// Digest the committee signs: `sha256(bincode(body))`.
    pub fn digest(&self) -> Result<Hash, ProofError> {
        let bytes =
            bincode::serialize(self).map_err(|e| ProofError::MessageDecode(e.to_string()))?;
        Ok(sha256(&bytes))
    }
}

/// One committee signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessEntry {
    /// Index into `CommitteeKey::public_keys`.
    pub key_index: u32,
    /// 64-byte `r ‖ s` signature over the body digest.
    pub signature: Vec<u8>,
}

/// Committee-signed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMessage {
    /// Signed body.
    pub body: MessageBody,
    /// Signatures.
    pub witness: Vec<WitnessEntry>,
}

impl CommitteeMessage {
    /// Wire encoding.
    pub fn encode(&self) -> Result<Vec<u8>, ProofError> {
        bincode::serialize(self).map_err(|e| ProofError::MessageDecode(e.to_string()))
    }

    /// Decode from wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProofError> {
        bincode::deserialize(bytes).map_err(|e| ProofError::MessageDecode(e.to_string()))
    }
}

// =============================================================================
// COMMITTEE-ANCHORED CLAIMS
// =============================================================================

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    /// `sha256(sibling ‖ current)`
    Left,
    /// `sha256(current ‖ sibling)`
    Right,
}

/// Sibling on a binary Merkle path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    /// Sibling hash.
    pub hash: Hash,
    /// Sibling side.
    pub position: Position,
}

impl PathNode {
    /// Sibling on the left.
    pub fn left(hash: Hash) -> Self {
        Self {
            hash,
            position: Position::Left,
        }
    }

    /// Sibling on the right.
    pub fn right(hash: Hash) -> Self {
        Self {
            hash,
            position: Position::Right,
        }
    }
}

/// Committee-signed root plus transaction inclusion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureClaim {
    /// Encoded `CommitteeMessage`.
    pub message: Vec<u8>,
    /// RLP-encoded event payload.
    pub payload: Vec<u8>,
    /// Path from `sha256(payload)` to the message's root.
    pub path: Vec<PathNode>,
}

/// Committee-signed state root plus two-level alt-trie proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltProofClaim {
    /// Encoded `CommitteeMessage`.
    pub message: Vec<u8>,
    /// RLP-encoded event payload.
    pub payload: Vec<u8>,
    /// Contract whose storage is proven.
    pub contract: Vec<u8>,
    /// Account-level nodes from the state root.
    pub account_proof: Vec<Vec<u8>>,
    /// Storage key within the contract.
    pub storage_key: Vec<u8>,
    /// Storage-level nodes from the contract's storage root.
    pub storage_proof: Vec<Vec<u8>>,
}
