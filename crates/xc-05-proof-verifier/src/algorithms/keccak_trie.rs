//! # Keccak Merkle-Patricia Proofs
//!
//! Iterative walk over RLP trie nodes, as served by `eth_getProof`.
//!
//! ## Node Shapes
//!
//! | Items | Node |
//! |-------|------|
//! | 17 | Branch: 16 child references + value |
//! | 2 | Extension or leaf, told apart by the hex-prefix flag |
//!
//! A child reference is either a 32-byte keccak hash (next node comes from
//! the proof) or an embedded node under 32 bytes.

use rlp::{DecoderError, Rlp};
use shared_crypto::keccak256;
use shared_types::Hash;

use super::nibbles::{decode_hex_prefix, to_nibbles};
use crate::domain::ProofError;

enum NodeRef {
    Hashed(Hash),
    Inline(Vec<u8>),
}

fn child_ref(item: &Rlp<'_>) -> Result<Option<NodeRef>, DecoderError> {
    if item.is_list() {
        return Ok(Some(NodeRef::Inline(item.as_raw().to_vec())));
    }
    let data = item.data()?;
    if data.is_empty() {
        return Ok(None);
    }
    let hash: Hash = data
        .try_into()
        .map_err(|_| DecoderError::Custom("child reference is not 32 bytes"))?;
    Ok(Some(NodeRef::Hashed(hash)))
}

/// Prove `key` under `root` and return the leaf value bytes.
///
/// `key` is the trie path before nibble expansion (already hashed for secure
/// tries). Every supplied node must be used.
pub fn verify_proof(
    root: &Hash,
    key: &[u8],
    proof: &[Vec<u8>],
    max_depth: usize,
) -> Result<Vec<u8>, ProofError> {
    if proof.len() > max_depth {
        return Err(ProofError::ProofTooDeep {
            depth: proof.len(),
            max: max_depth,
        });
    }

    let path = to_nibbles(key);
    let absent = || ProofError::KeyNotInTrie {
        key: hex::encode(key),
    };
    let mut offset = 0;
    let mut used = 0;
    let mut next = NodeRef::Hashed(*root);

    for depth in 0..max_depth {
        let malformed = |reason: String| ProofError::MalformedNode { depth, reason };
        let decode = |e: DecoderError| ProofError::MalformedNode {
            depth,
            reason: e.to_string(),
        };

        let node = match next {
            NodeRef::Hashed(hash) => {
                let node = proof.get(used).ok_or(ProofError::MissingNode { depth })?;
                used += 1;
                if keccak256(node) != hash {
                    return Err(ProofError::NodeHashMismatch { depth });
                }
                node.clone()
            }
            NodeRef::Inline(node) => node,
        };

        let rlp = Rlp::new(&node);
        match rlp.item_count().map_err(decode)? {
            17 => {
                if offset == path.len() {
                    let value = rlp.at(16).and_then(|v| v.data().map(<[u8]>::to_vec));
                    let value = value.map_err(decode)?;
                    if value.is_empty() {
                        return Err(absent());
                    }
                    return finish(value, proof.len() - used);
                }
                let child = rlp.at(path[offset] as usize).map_err(decode)?;
                offset += 1;
                next = child_ref(&child).map_err(decode)?.ok_or_else(absent)?;
            }
            2 => {
                let encoded_path = rlp.at(0).and_then(|p| p.data().map(<[u8]>::to_vec));
                let (segment, is_leaf) = decode_hex_prefix(&encoded_path.map_err(decode)?)
                    .ok_or_else(|| malformed("bad hex-prefix path".to_string()))?;
                if !path[offset..].starts_with(&segment) {
                    return Err(absent());
                }
                offset += segment.len();

                let item = rlp.at(1).map_err(decode)?;
                if is_leaf {
                    if offset != path.len() {
                        return Err(absent());
                    }
                    let value = item.data().map_err(decode)?.to_vec();
                    return finish(value, proof.len() - used);
                }
                next = child_ref(&item)
                    .map_err(decode)?
                    .ok_or_else(|| malformed("extension without child".to_string()))?;
            }
            n => return Err(malformed(format!("{n}-item node"))),
        }
    }

    Err(ProofError::ProofTooDeep {
        depth: max_depth + 1,
        max: max_depth,
    })
}

fn finish(value: Vec<u8>, unused: usize) -> Result<Vec<u8>, ProofError> {
    if unused > 0 {
        return Err(ProofError::UnusedNodes { count: unused });
    }
    Ok(value)
}
