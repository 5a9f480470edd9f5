//! # Domain Entities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_crypto::sha256;
use shared_types::{Address, Hash};

/// Digest a message is voted under.
pub fn message_hash(message: &[u8]) -> Hash {
    sha256(message)
}

/// Validator set snapshot, addressed by the height it takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorEpoch {
    /// First height governed by this set.
    pub start_height: u64,
    /// Ordered validator addresses.
    pub validators: Vec<Address>,
}

impl ValidatorEpoch {
    /// Create an epoch snapshot.
    pub fn new(start_height: u64, validators: Vec<Address>) -> Self {
        Self {
            start_height,
            validators,
        }
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Membership check.
    pub fn contains(&self, address: &Address) -> bool {
        self.validators.contains(address)
    }

    /// Position of `address` in the ordered set.
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.validators.iter().position(|v| v == address)
    }

    /// Byzantine quorum: `n - floor((n - 1) / 3)`.
    ///
    /// Tolerates `floor((n - 1) / 3)` faulty validators.
    pub fn quorum_size(&self) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        n - (n - 1) / 3
    }
}

/// Persisted vote state for one message digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// `sha256(message)`.
    pub message_hash: Hash,
    /// Message content fixed by the first submitter.
    pub message: Vec<u8>,
    /// Each signer with the height it voted at.
    pub signers: BTreeMap<Address, u64>,
    /// Set once, when the signer count first reached quorum.
    pub quorum_reached_height: Option<u64>,
}

impl VoteRecord {
    /// New record holding the canonical message and no votes.
    pub fn new(message: Vec<u8>) -> Self {
        Self {
            message_hash: message_hash(&message),
            message,
            signers: BTreeMap::new(),
            quorum_reached_height: None,
        }
    }

    /// Number of distinct signers.
    pub fn signer_count(&self) -> usize {
        self.signers.len()
    }

    /// Whether `signer` already voted.
    pub fn has_signed(&self, signer: &Address) -> bool {
        self.signers.contains_key(signer)
    }

    /// Whether quorum was ever reached.
    pub fn is_final(&self) -> bool {
        self.quorum_reached_height.is_some()
    }
}
