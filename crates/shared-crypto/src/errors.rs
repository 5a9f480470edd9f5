//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Signature bytes are not a valid (r, s) pair
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Recovery id (v) is not 0, 1, 27 or 28
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// S is in the upper half of the curve order
    #[error("Signature S value is not normalized (EIP-2)")]
    HighS,

    /// Public key recovery failed
    #[error("Public key recovery failed")]
    RecoveryFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
