//! # Committee Witness Check

use std::collections::BTreeSet;

use shared_crypto::Secp256k1PublicKey;
use shared_types::Hash;

use crate::domain::{ProofError, WitnessEntry};

/// Verify every witness entry over `digest` and return the distinct signer
/// count. Any bad entry rejects the whole witness.
pub fn count_signers(
    keys: &[Secp256k1PublicKey],
    digest: &Hash,
    witness: &[WitnessEntry],
) -> Result<usize, ProofError> {
    let mut seen = BTreeSet::new();
    for (index, entry) in witness.iter().enumerate() {
        let invalid = |reason: &str| ProofError::InvalidWitness {
            index,
            reason: reason.to_string(),
        };

        let key = keys
            .get(entry.key_index as usize)
            .ok_or_else(|| invalid("key index out of range"))?;
        if !seen.insert(entry.key_index) {
            return Err(invalid("key signed twice"));
        }
        let signature: [u8; 64] = entry
            .signature
            .as_slice()
            .try_into()
            .map_err(|_| invalid("signature is not 64 bytes"))?;
        key.verify_prehash(digest, &signature)
            .map_err(|e| invalid(&e.to_string()))?;
    }
    Ok(seen.len())
}
