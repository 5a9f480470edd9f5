//! # PoA Block Header
//!
//! Ethereum-shaped header produced by a Proof-of-Authority validator.
//!
//! Extra-data layout:
//!
//! ```text
//! | vanity (32) | validators (N x 20, epoch boundary only) | seal (65) |
//! ```

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::keccak256;
use shared_types::{Address, ChainId, Hash};

/// Fixed vanity prefix of extra-data.
pub const EXTRA_VANITY: usize = 32;

/// Fixed seal suffix of extra-data (`r || s || v`).
pub const EXTRA_SEAL: usize = 65;

/// Size of one validator address in extra-data.
pub const VALIDATOR_BYTES: usize = 20;

/// Difficulty of a block produced by the in-turn validator.
pub const DIFF_IN_TURN: u64 = 2;

/// Difficulty of a block produced out of turn.
pub const DIFF_NO_TURN: u64 = 1;

const HEADER_FIELDS: usize = 15;

/// A foreign PoA header.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoaHeader {
    /// Parent header hash.
    pub parent_hash: Hash,
    /// Uncle list hash (must be the empty-list hash).
    pub uncle_hash: Hash,
    /// Declared producer.
    pub coinbase: Address,
    /// State root.
    pub root: Hash,
    /// Transactions root.
    pub tx_hash: Hash,
    /// Receipts root.
    pub receipt_hash: Hash,
    /// Logs bloom.
    #[serde_as(as = "Bytes")]
    pub bloom: [u8; 256],
    /// In-turn or no-turn constant.
    pub difficulty: u64,
    /// Height.
    pub number: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Gas used.
    pub gas_used: u64,
    /// Unix timestamp (seconds).
    pub time: u64,
    /// Vanity, optional validator list and seal.
    pub extra: Vec<u8>,
    /// Mix digest (must be zero).
    pub mix_digest: Hash,
    /// Nonce.
    pub nonce: [u8; 8],
}

impl Default for PoaHeader {
    fn default() -> Self {
        Self {
            parent_hash: [0u8; 32],
            uncle_hash: shared_crypto::EMPTY_UNCLE_HASH,
            coinbase: [0u8; 20],
            root: [0u8; 32],
            tx_hash: [0u8; 32],
            receipt_hash: [0u8; 32],
            bloom: [0u8; 256],
            difficulty: DIFF_IN_TURN,
            number: 0,
            gas_limit: 30_000_000,
            gas_used: 0,
            time: 0,
            extra: vec![0u8; EXTRA_VANITY + EXTRA_SEAL],
            mix_digest: [0u8; 32],
            nonce: [0u8; 8],
        }
    }
}

fn append_bytes(s: &mut RlpStream, bytes: &[u8]) {
    s.append(&bytes);
}

fn fixed<const N: usize>(rlp: &Rlp, index: usize) -> Result<[u8; N], DecoderError> {
    let bytes: Vec<u8> = rlp.val_at(index)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| DecoderError::Custom("fixed-size header field has wrong length"))
}

impl PoaHeader {
    fn append_fields(&self, s: &mut RlpStream, extra: &[u8]) {
        append_bytes(s, &self.parent_hash);
        append_bytes(s, &self.uncle_hash);
        append_bytes(s, &self.coinbase);
        append_bytes(s, &self.root);
        append_bytes(s, &self.tx_hash);
        append_bytes(s, &self.receipt_hash);
        append_bytes(s, &self.bloom);
        s.append(&self.difficulty);
        s.append(&self.number);
        s.append(&self.gas_limit);
        s.append(&self.gas_used);
        s.append(&self.time);
        append_bytes(s, extra);
        append_bytes(s, &self.mix_digest);
        append_bytes(s, &self.nonce);
    }

    /// Header hash: `keccak256(rlp(header))`.
    pub fn hash(&self) -> Hash {
        keccak256(&rlp::encode(self))
    }

    /// Digest the producer signs: the header with the seal stripped, prefixed
    /// by the chain ID.
    pub fn seal_hash(&self, chain_id: ChainId) -> Hash {
        let unsealed = &self.extra[..self.extra.len().saturating_sub(EXTRA_SEAL)];
        let mut s = RlpStream::new_list(HEADER_FIELDS + 1);
        s.append(&chain_id);
        self.append_fields(&mut s, unsealed);
        keccak256(&s.out())
    }

    /// The 65-byte seal, if extra-data is long enough to hold one.
    pub fn seal(&self) -> Option<[u8; 65]> {
        if self.extra.len() < EXTRA_VANITY + EXTRA_SEAL {
            return None;
        }
        let start = self.extra.len() - EXTRA_SEAL;
        self.extra[start..].try_into().ok()
    }

    /// Raw bytes between vanity and seal.
    pub fn validator_bytes(&self) -> &[u8] {
        if self.extra.len() < EXTRA_VANITY + EXTRA_SEAL {
            return &[];
        }
        &self.extra[EXTRA_VANITY..self.extra.len() - EXTRA_SEAL]
    }

    /// Validators listed in extra-data, or `None` when the section is not a
    /// whole number of addresses.
    pub fn validators(&self) -> Option<Vec<Address>> {
        let raw = self.validator_bytes();
        if raw.len() % VALIDATOR_BYTES != 0 {
            return None;
        }
        raw.chunks_exact(VALIDATOR_BYTES)
            .map(|chunk| chunk.try_into().ok())
            .collect()
    }

    /// Build extra-data from its three sections.
    pub fn build_extra(vanity: [u8; 32], validators: &[Address], seal: [u8; 65]) -> Vec<u8> {
        let mut extra = Vec::with_capacity(EXTRA_VANITY + validators.len() * 20 + EXTRA_SEAL);
        extra.extend_from_slice(&vanity);
        for v in validators {
            extra.extend_from_slice(v);
        }
        extra.extend_from_slice(&seal);
        extra
    }

    /// Overwrite the trailing seal.
    pub fn set_seal(&mut self, seal: [u8; 65]) {
        let len = self.extra.len();
        if len >= EXTRA_SEAL {
            self.extra[len - EXTRA_SEAL..].copy_from_slice(&seal);
        }
    }

    /// Decode from RLP bytes.
    pub fn from_rlp(bytes: &[u8]) -> Result<Self, DecoderError> {
        rlp::decode(bytes)
    }

    /// Encode to RLP bytes.
    pub fn to_rlp(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

impl Encodable for PoaHeader {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(HEADER_FIELDS);
        self.append_fields(s, &self.extra);
    }
}

impl Decodable for PoaHeader {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != HEADER_FIELDS {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            parent_hash: fixed(rlp, 0)?,
            uncle_hash: fixed(rlp, 1)?,
            coinbase: fixed(rlp, 2)?,
            root: fixed(rlp, 3)?,
            tx_hash: fixed(rlp, 4)?,
            receipt_hash: fixed(rlp, 5)?,
            bloom: fixed(rlp, 6)?,
            difficulty: rlp.val_at(7)?,
            number: rlp.val_at(8)?,
            gas_limit: rlp.val_at(9)?,
            gas_used: rlp.val_at(10)?,
            time: rlp.val_at(11)?,
            extra: rlp.val_at(12)?,
            mix_digest: fixed(rlp, 13)?,
            nonce: fixed(rlp, 14)?,
        })
    }
}
