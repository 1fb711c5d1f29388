//! # ECDSA over secp256k1
//!
//! Key material types and the default [`Secp256k1`] provider backed by the
//! `k256` crate.
//!
//! ## Key Types
//!
//! - `PrivateKey` - validated 32-byte secret scalar encoding
//! - `RecoverableSignature` - `(r, s, recovery_id)` as returned by the signer
//! - `Secp256k1` - [`KeyProvider`] and [`SignProvider`] implementation
//!
//! ## Example
//!
//! ```rust
//! use chainkit_crypto::{KeyProvider, PrivateKey, Secp256k1, SignProvider};
//!
//! let key = PrivateKey::from_hex(
//!     "0x0000000000000000000000000000000000000000000000000000000000000001",
//! ).unwrap();
//! let provider = Secp256k1::new();
//!
//! let compressed = provider.compressed_public_key(&key).unwrap();
//! assert_eq!(compressed[0], 0x02);
//!
//! let signature = provider.sign_prehash(&[7u8; 32], &key).unwrap();
//! assert!(signature.recovery_id <= 1);
//! ```

use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use tracing::trace;

use crate::provider::{KeyProvider, SignProvider};
use crate::{CryptoError, Result};

/// Length of a secp256k1 private key in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// A 32-byte secp256k1 private key.
///
/// Construction only checks the encoding (hex and length). Whether the value
/// is a usable scalar (non-zero and below the curve order) is decided by the
/// provider that consumes it.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; PRIVATE_KEY_SIZE]);

impl PrivateKey {
    /// Generate a random private key using a cryptographically secure RNG.
    pub fn random() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        Self(signing_key.to_bytes().into())
    }

    /// Create a private key from raw bytes.
    pub const fn from_bytes(bytes: [u8; PRIVATE_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a private key from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidLength`] unless the slice is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Create a private key from a hex string.
    ///
    /// # Arguments
    ///
    /// * `hex` - Hex-encoded private key (with or without 0x prefix)
    ///
    /// # Errors
    ///
    /// [`CryptoError::MalformedHex`] for odd length or non-hex characters,
    /// [`CryptoError::InvalidLength`] if the decoded key is not 32 bytes.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits)?;
        Self::from_slice(&bytes)
    }

    /// Get the raw bytes of the private key.
    ///
    /// # Security
    ///
    /// Be careful with the returned bytes - they are the secret key!
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.0
    }

    /// Borrow the raw bytes of the private key.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.0
    }

    /// Get the hex-encoded private key (lowercase, no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// ECDSA signature with recovery ID.
///
/// Contains:
/// - `r` - 32 bytes, big-endian
/// - `s` - 32 bytes, big-endian, low-S normalized
/// - `recovery_id` - 0 or 1
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature {
    /// The r component of the signature (32 bytes)
    pub r: [u8; 32],
    /// The s component of the signature (32 bytes)
    pub s: [u8; 32],
    /// Parity of the ephemeral point's Y coordinate (0 or 1)
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// Create a signature from r, s and recovery id.
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Self {
        Self { r, s, recovery_id }
    }

    /// Recover the uncompressed (65-byte) public key that produced this
    /// signature over `hash`.
    pub fn recover_uncompressed(&self, hash: &[u8; 32]) -> Result<[u8; 65]> {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        let signature = K256Signature::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

        let recovery_id = RecoveryId::from_byte(self.recovery_id)
            .ok_or_else(|| CryptoError::RecoveryFailed("invalid recovery id".to_string()))?;

        let verifying_key = VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
            .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;

        Ok(encode_uncompressed(&verifying_key))
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoverableSignature")
            .field("r", &hex::encode(self.r))
            .field("s", &hex::encode(self.s))
            .field("recovery_id", &self.recovery_id)
            .finish()
    }
}

/// Default secp256k1 provider backed by `k256`.
///
/// Signing uses RFC 6979 deterministic nonces, so the same hash and key
/// always produce the same signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1;

impl Secp256k1 {
    /// Create the provider.
    pub const fn new() -> Self {
        Self
    }

    fn signing_key(private_key: &PrivateKey) -> Result<SigningKey> {
        SigningKey::from_slice(private_key.as_bytes())
            .map_err(|_| CryptoError::InvalidPrivateKey("scalar is zero or exceeds the curve order".into()))
    }
}

impl KeyProvider for Secp256k1 {
    fn compressed_public_key(&self, private_key: &PrivateKey) -> Result<[u8; 33]> {
        let signing_key = Self::signing_key(private_key)?;
        let point = signing_key.verifying_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }

    fn uncompressed_public_key(&self, private_key: &PrivateKey) -> Result<[u8; 65]> {
        let signing_key = Self::signing_key(private_key)?;
        Ok(encode_uncompressed(signing_key.verifying_key()))
    }
}

impl SignProvider for Secp256k1 {
    fn sign_prehash(&self, hash: &[u8; 32], private_key: &PrivateKey) -> Result<RecoverableSignature> {
        let signing_key = Self::signing_key(private_key)?;
        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        trace!(recovery_id = recovery_id.to_byte(), "signed prehash");
        Ok(RecoverableSignature::new(r, s, recovery_id.to_byte()))
    }
}

fn encode_uncompressed(verifying_key: &VerifyingKey) -> [u8; 65] {
    let point = verifying_key.to_encoded_point(false);
    let mut out = [0u8; 65];
    out.copy_from_slice(point.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATOR_KEY: &str =
        "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_private_key_from_hex_with_prefix() {
        let a = PrivateKey::from_hex(GENERATOR_KEY).unwrap();
        let b = PrivateKey::from_hex(&format!("0x{GENERATOR_KEY}")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), GENERATOR_KEY);
    }

    #[test]
    fn test_private_key_rejects_malformed_hex() {
        assert!(matches!(
            PrivateKey::from_hex("0xzz"),
            Err(CryptoError::MalformedHex(_))
        ));
        assert!(matches!(
            PrivateKey::from_hex("abc"),
            Err(CryptoError::MalformedHex(_))
        ));
    }

    #[test]
    fn test_private_key_rejects_wrong_length() {
        assert!(matches!(
            PrivateKey::from_hex("0x0102"),
            Err(CryptoError::InvalidLength { expected: 32, actual: 2 })
        ));
    }

    #[test]
    fn test_private_key_debug_is_redacted() {
        let key = PrivateKey::from_hex(GENERATOR_KEY).unwrap();
        assert!(!format!("{key:?}").contains("01"));
    }

    #[test]
    fn test_zero_scalar_is_rejected_by_provider() {
        let key = PrivateKey::from_bytes([0u8; 32]);
        assert!(matches!(
            Secp256k1::new().compressed_public_key(&key),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_random_keys_differ() {
        assert_ne!(PrivateKey::random(), PrivateKey::random());
    }

    #[test]
    fn test_sign_and_recover() {
        let provider = Secp256k1::new();
        let key = PrivateKey::random();
        let hash = crate::keccak256(b"chainkit");

        let signature = provider.sign_prehash(&hash, &key).unwrap();
        let recovered = signature.recover_uncompressed(&hash).unwrap();
        assert_eq!(recovered, provider.uncompressed_public_key(&key).unwrap());
    }
}
