//! # ECDSA Signatures (secp256k1)
//!
//! Signer recovery for PoA seals and prehash verification for committee
//! witnesses.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2) required on recovery
//! - Addresses are the last 20 bytes of keccak256 over the uncompressed key

use k256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    RecoveryId, Signature, SigningKey, VerifyingKey,
};
use shared_types::{Address, Hash};

use crate::hashing::keccak256;
use crate::CryptoError;

/// Recover the address that produced a 65-byte `r || s || v` signature.
///
/// `v` may be given raw (0/1) or Ethereum-offset (27/28).
pub fn recover_signer(prehash: &Hash, signature: &[u8; 65]) -> Result<Address, CryptoError> {
    let v = signature[64];
    let recovery_byte = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        other => return Err(CryptoError::InvalidRecoveryId(other)),
    };
    let recovery_id =
        RecoveryId::from_byte(recovery_byte).ok_or(CryptoError::InvalidRecoveryId(v))?;

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|_| CryptoError::InvalidSignatureFormat)?;
    if sig.normalize_s().is_some() {
        return Err(CryptoError::HighS);
    }

    let recovered = VerifyingKey::recover_from_prehash(prehash, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered))
}

/// Derive the 20-byte account address of a public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    // Skip the 0x04 prefix
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey([u8; 33]);

impl Secp256k1PublicKey {
    /// Create from compressed bytes (33 bytes, starting with 0x02 or 0x03).
    pub fn from_bytes(bytes: [u8; 33]) -> Result<Self, CryptoError> {
        VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice that must hold exactly one compressed key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; 33] = bytes.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_bytes(array)
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Verify a 64-byte `r || s` signature over a 32-byte prehash.
    pub fn verify_prehash(&self, prehash: &Hash, signature: &[u8; 64]) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;
        let sig =
            Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;

        verifying_key
            .verify_prehash(prehash, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    /// Account address of this key.
    pub fn to_address(&self) -> Result<Address, CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(address_from_pubkey(&verifying_key))
    }
}

/// secp256k1 ECDSA keypair.
///
/// Used by relayer tooling and tests to produce seals and witnesses.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> Secp256k1PublicKey {
        let encoded = self.signing_key.verifying_key().to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(encoded.as_bytes());
        Secp256k1PublicKey(bytes)
    }

    /// Account address of this keypair.
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Sign a prehash, returning `r || s`.
    pub fn sign_prehash(&self, prehash: &Hash) -> Result<[u8; 64], CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(prehash)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(sig.to_bytes().into())
    }

    /// Sign a prehash, returning `r || s || v` with `v` in {0, 1}.
    pub fn sign_recoverable(&self, prehash: &Hash) -> Result<[u8; 65], CryptoError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(prehash)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("address", &hex::encode(self.address()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::sha256;

    fn keypair(seed: u8) -> Secp256k1KeyPair {
        Secp256k1KeyPair::from_bytes([seed; 32]).unwrap()
    }

    #[test]
    fn test_recover_matches_address() {
        let kp = keypair(0x11);
        let digest = keccak256(b"seal");
        let sig = kp.sign_recoverable(&digest).unwrap();

        assert_eq!(recover_signer(&digest, &sig).unwrap(), kp.address());
    }

    #[test]
    fn test_recover_accepts_offset_v() {
        let kp = keypair(0x12);
        let digest = keccak256(b"seal");
        let mut sig = kp.sign_recoverable(&digest).unwrap();
        sig[64] += 27;

        assert_eq!(recover_signer(&digest, &sig).unwrap(), kp.address());
    }

    #[test]
    fn test_recover_rejects_bad_v() {
        let kp = keypair(0x13);
        let digest = keccak256(b"seal");
        let mut sig = kp.sign_recoverable(&digest).unwrap();
        sig[64] = 5;

        assert_eq!(
            recover_signer(&digest, &sig),
            Err(CryptoError::InvalidRecoveryId(5))
        );
    }

    #[test]
    fn test_recover_other_digest_gives_other_address() {
        let kp = keypair(0x14);
        let sig = kp.sign_recoverable(&keccak256(b"a")).unwrap();

        match recover_signer(&keccak256(b"b"), &sig) {
            Ok(addr) => assert_ne!(addr, kp.address()),
            Err(_) => {}
        }
    }

    #[test]
    fn test_verify_prehash() {
        let kp = keypair(0x21);
        let digest = sha256(b"committee body");
        let sig = kp.sign_prehash(&digest).unwrap();

        assert!(kp.public_key().verify_prehash(&digest, &sig).is_ok());
        assert_eq!(
            kp.public_key().verify_prehash(&sha256(b"other"), &sig),
            Err(CryptoError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn test_public_key_address_agrees() {
        let kp = keypair(0x31);
        assert_eq!(kp.public_key().to_address().unwrap(), kp.address());
    }

    #[test]
    fn test_public_key_from_slice_rejects_length() {
        assert_eq!(
            Secp256k1PublicKey::from_slice(&[2u8; 32]),
            Err(CryptoError::InvalidPublicKey)
        );
    }

    #[test]
    fn test_debug_shows_address_only() {
        let kp = keypair(0x42);
        let shown = format!("{kp:?}");
        assert!(shown.contains(&hex::encode(kp.address())));
        assert!(!shown.contains(&hex::encode([0x42u8; 32])));
    }

    #[test]
    fn test_deterministic_signatures() {
        let kp = keypair(0xAB);
        let digest = sha256(b"deterministic");
        assert_eq!(
            kp.sign_prehash(&digest).unwrap(),
            kp.sign_prehash(&digest).unwrap()
        );
    }
}
