//! # Algorithms
//!
//! Pure proof engines. Nothing here touches storage.

pub mod alt_trie;
pub mod committee;
pub mod keccak_trie;
pub mod merkle;
pub mod nibbles;

pub use committee::count_signers;
pub use merkle::{build_path, compute_root, verify_inclusion};
