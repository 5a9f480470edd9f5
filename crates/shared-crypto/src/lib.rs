//! # Shared Crypto
//!
//! Primitives the bridge verifiers agree on.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Keccak-256, SHA-256, double SHA-256 | Trie nodes, headers, vote digests |
//! | `ecdsa` | secp256k1 | Seal recovery, committee signatures |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic signing, low-S enforced on recovery (EIP-2)
//! - All verification functions operate on 32-byte prehashes; callers choose the digest

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{address_from_pubkey, recover_signer, Secp256k1KeyPair, Secp256k1PublicKey};
pub use errors::CryptoError;
pub use hashing::{double_sha256, keccak256, sha256, EMPTY_UNCLE_HASH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
