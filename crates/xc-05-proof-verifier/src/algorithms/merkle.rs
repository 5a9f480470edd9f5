//! # Transaction Inclusion Paths
//!
//! Binary sha256 Merkle paths from a leaf to a committee-signed root.

use shared_crypto::sha256;
use shared_types::Hash;

use crate::domain::{PathNode, Position};

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    sha256(&buf)
}

/// Fold `path` over `leaf` and compare with `root`.
///
/// An empty path proves only `leaf == root`.
pub fn verify_inclusion(leaf: &Hash, path: &[PathNode], root: &Hash) -> bool {
    let mut current = *leaf;
    for node in path {
        current = match node.position {
            Position::Left => hash_pair(&node.hash, &current),
            Position::Right => hash_pair(&current, &node.hash),
        };
    }
    current == *root
}

/// Root over `leaves`, duplicating the last node of odd levels.
pub fn compute_root(leaves: &[Hash]) -> Hash {
    let Some(first) = leaves.first() else {
        return [0u8; 32];
    };
    let mut level: Vec<Hash> = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level.first().copied().unwrap_or(*first)
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
        .collect()
}

/// Path for `leaves[index]`, or `None` if out of range.
pub fn build_path(leaves: &[Hash], index: usize) -> Option<Vec<PathNode>> {
    if index >= leaves.len() {
        return None;
    }

    let mut path = Vec::new();
    let mut level: Vec<Hash> = leaves.to_vec();
    let mut index = index;
    while level.len() > 1 {
        let node = if index % 2 == 0 {
            PathNode::right(*level.get(index + 1).unwrap_or(&level[index]))
        } else {
            PathNode::left(level[index - 1])
        };
        path.push(node);
        level = next_level(&level);
        index /= 2;
    }
    Some(path)
}
