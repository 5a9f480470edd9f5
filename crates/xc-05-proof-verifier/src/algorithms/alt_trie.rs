//! # Alternate Trie Proofs
//!
//! Merkle-Patricia trie with a type-byte node encoding and double-sha256
//! node hashes. Keys are walked as raw nibbles, unhashed.
//!
//! ## Wire Format
//!
//! ```text
//! branch    = 0x00 ‖ ref × 17          (index 16 holds a value terminating here)
//! extension = 0x01 ‖ varbytes(nibbles) ‖ ref
//! leaf      = 0x02 ‖ varbytes(value)
//! ref       = 0x03 ‖ hash32 | 0x04
//! ```

use shared_crypto::double_sha256;
use shared_types::Hash;

use super::nibbles::to_nibbles;
use crate::domain::ProofError;

/// Branch node tag.
pub const BRANCH_NODE: u8 = 0x00;
/// Extension node tag.
pub const EXTENSION_NODE: u8 = 0x01;
/// Leaf node tag.
pub const LEAF_NODE: u8 = 0x02;
/// Hash reference tag.
pub const HASH_REF: u8 = 0x03;
/// Empty reference tag.
pub const EMPTY_REF: u8 = 0x04;
/// Children per branch, including the terminal slot.
pub const BRANCH_CHILDREN: usize = 17;

// =============================================================================
// VAR-BYTES
// =============================================================================

/// Append a variable-length integer.
pub fn write_var_int(out: &mut Vec<u8>, value: u64) {
    if value < 0xFD {
        out.push(value as u8);
    } else if value <= 0xFFFF {
        out.push(0xFD);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xFFFF_FFFF {
        out.push(0xFE);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(0xFF);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Append a length-prefixed byte string.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_var_int(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Cursor over an encoded buffer.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Start reading at the front of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Whether every byte has been consumed.
    pub fn is_done(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], String> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| format!("need {n} bytes at offset {}", self.pos))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    /// Read a variable-length integer.
    pub fn read_var_int(&mut self) -> Result<u64, String> {
        let value = match self.read_u8()? {
            0xFD => u64::from(u16::from_le_bytes([self.read_u8()?, self.read_u8()?])),
            0xFE => {
                let bytes: [u8; 4] = self
                    .take(4)?
                    .try_into()
                    .map_err(|_| "short u32".to_string())?;
                u64::from(u32::from_le_bytes(bytes))
            }
            0xFF => {
                let bytes: [u8; 8] = self
                    .take(8)?
                    .try_into()
                    .map_err(|_| "short u64".to_string())?;
                u64::from_le_bytes(bytes)
            }
            small => u64::from(small),
        };
        Ok(value)
    }

    /// Read a length-prefixed byte string.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], String> {
        let len = self.read_var_int()?;
        let len = usize::try_from(len).map_err(|_| format!("length {len} overflows"))?;
        self.take(len)
    }

    fn read_ref(&mut self) -> Result<Option<Hash>, String> {
        match self.read_u8()? {
            HASH_REF => {
                let hash: Hash = self
                    .take(32)?
                    .try_into()
                    .map_err(|_| "short hash".to_string())?;
                Ok(Some(hash))
            }
            EMPTY_REF => Ok(None),
            tag => Err(format!("unknown reference tag {tag:#04x}")),
        }
    }
}

// =============================================================================
// NODES
// =============================================================================

/// Decoded trie node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AltNode {
    /// 17 child references.
    Branch(Vec<Option<Hash>>),
    /// Shared nibble run followed by one child.
    Extension {
        /// Nibbles (each below 16).
        key: Vec<u8>,
        /// Child reference.
        child: Option<Hash>,
    },
    /// Stored value.
    Leaf(Vec<u8>),
}

fn write_ref(out: &mut Vec<u8>, child: &Option<Hash>) {
    match child {
        Some(hash) => {
            out.push(HASH_REF);
            out.extend_from_slice(hash);
        }
        None => out.push(EMPTY_REF),
    }
}

impl AltNode {
    /// Serialize the node.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            AltNode::Branch(children) => {
                out.push(BRANCH_NODE);
                for child in children {
                    write_ref(&mut out, child);
                }
            }
            AltNode::Extension { key, child } => {
                out.push(EXTENSION_NODE);
                write_var_bytes(&mut out, key);
                write_ref(&mut out, child);
            }
            AltNode::Leaf(value) => {
                out.push(LEAF_NODE);
                write_var_bytes(&mut out, value);
            }
        }
        out
    }

    /// Parse a serialized node, rejecting trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let mut reader = Reader::new(bytes);
        let node = match reader.read_u8()? {
            BRANCH_NODE => {
                let children = (0..BRANCH_CHILDREN)
                    .map(|_| reader.read_ref())
                    .collect::<Result<Vec<_>, _>>()?;
                AltNode::Branch(children)
            }
            EXTENSION_NODE => {
                let key = reader.read_var_bytes()?.to_vec();
                if key.is_empty() || key.iter().any(|n| *n > 0x0F) {
                    return Err("extension key is not a nibble run".to_string());
                }
                let child = reader.read_ref()?;
                AltNode::Extension { key, child }
            }
            LEAF_NODE => AltNode::Leaf(reader.read_var_bytes()?.to_vec()),
            tag => return Err(format!("unknown node tag {tag:#04x}")),
        };
        if !reader.is_done() {
            return Err("trailing bytes".to_string());
        }
        Ok(node)
    }

    /// Node hash: `sha256(sha256(encoded))`.
    pub fn hash(encoded: &[u8]) -> Hash {
        double_sha256(encoded)
    }
}

// =============================================================================
// PROOF WALK
// =============================================================================

/// Prove `key` under `root` and return the leaf value bytes.
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
    let mut expected = *root;

    for (depth, bytes) in proof.iter().enumerate() {
        if AltNode::hash(bytes) != expected {
            return Err(ProofError::NodeHashMismatch { depth });
        }
        let node =
            AltNode::decode(bytes).map_err(|reason| ProofError::MalformedNode { depth, reason })?;

        let next = match node {
            AltNode::Branch(children) => {
                let slot = if offset == path.len() {
                    BRANCH_CHILDREN - 1
                } else {
                    offset += 1;
                    path[offset - 1] as usize
                };
                children[slot]
            }
            AltNode::Extension { key: segment, child } => {
                if !path[offset..].starts_with(&segment) {
                    return Err(absent());
                }
                offset += segment.len();
                child
            }
            AltNode::Leaf(value) => {
                if offset != path.len() {
                    return Err(absent());
                }
                let unused = proof.len() - depth - 1;
                if unused > 0 {
                    return Err(ProofError::UnusedNodes { count: unused });
                }
                return Ok(value);
            }
        };
        expected = next.ok_or_else(absent)?;
    }

    Err(ProofError::MissingNode { depth: proof.len() })
}

// =============================================================================
// VALUE NORMALIZATION
// =============================================================================

/// Strip a var-bytes prefix and left-pad the content to 32 bytes.
pub fn normalize_value(value: &[u8]) -> Result<Hash, ProofError> {
    let mut reader = Reader::new(value);
    let inner = reader.read_var_bytes().map_err(ProofError::MalformedValue)?;
    if !reader.is_done() {
        return Err(ProofError::MalformedValue("trailing bytes".to_string()));
    }
    if inner.len() > 32 {
        return Err(ProofError::MalformedValue(format!(
            "{} bytes exceed a word",
            inner.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - inner.len()..].copy_from_slice(inner);
    Ok(out)
}

/// Storage root held in an account-level leaf: raw 32 bytes or var-bytes.
pub fn storage_root_from_leaf(value: &[u8]) -> Result<Hash, ProofError> {
    if let Ok(root) = <Hash>::try_from(value) {
        return Ok(root);
    }
    let mut reader = Reader::new(value);
    let inner = reader.read_var_bytes().map_err(ProofError::MalformedValue)?;
    if !reader.is_done() {
        return Err(ProofError::MalformedValue("trailing bytes".to_string()));
    }
    <Hash>::try_from(inner)
        .map_err(|_| ProofError::MalformedValue(format!("storage root of {} bytes", inner.len())))
}
