//! # Hashing
//!
//! One-shot digests used across the bridge.

use sha2::{Digest, Sha256};
use sha3::Keccak256;
use shared_types::Hash;

/// keccak256(rlp([])), the uncle hash every PoA header must carry.
pub const EMPTY_UNCLE_HASH: Hash = [
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a, 0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4,
    0x1a, 0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13, 0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4,
    0x93, 0x47,
];

/// Keccak-256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 hash.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 applied twice.
pub fn double_sha256(data: &[u8]) -> Hash {
    sha256(&sha256(data))
}
