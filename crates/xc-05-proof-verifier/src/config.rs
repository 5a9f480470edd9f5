//! # Proof Verifier Configuration

use serde::{Deserialize, Serialize};

/// Deepest trie walk accepted (a 32-byte key has 64 nibbles).
pub const DEFAULT_MAX_PROOF_DEPTH: usize = 64;

/// Proof verifier configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofConfig {
    /// Maximum trie nodes walked per proof level.
    pub max_proof_depth: usize,
    /// Maximum Merkle path length for transaction inclusion.
    pub max_merkle_path: usize,
    /// Largest event payload accepted, in bytes.
    pub max_payload_len: usize,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            max_proof_depth: DEFAULT_MAX_PROOF_DEPTH,
            max_merkle_path: 32,
            max_payload_len: 64 * 1024,
        }
    }
}

impl ProofConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            max_proof_depth: DEFAULT_MAX_PROOF_DEPTH,
            max_merkle_path: 16,
            max_payload_len: 4096,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_proof_depth == 0 {
            return Err("max_proof_depth must be > 0".to_string());
        }
        if self.max_merkle_path == 0 {
            return Err("max_merkle_path must be > 0".to_string());
        }
        if self.max_payload_len == 0 {
            return Err("max_payload_len must be > 0".to_string());
        }
        Ok(())
    }
}
