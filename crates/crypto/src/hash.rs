//! # Digest Helpers
//!
//! Thin wrappers over the external SHA-256 and Keccak-256 implementations,
//! plus the composite digests that address derivation builds on.
//!
//! ## Functions
//!
//! - `sha256` - SHA-256 of a byte slice
//! - `double_sha256` - `SHA256(SHA256(x))`, the Base58Check checksum source
//! - `keccak256` - Ethereum's Keccak-256 (not NIST SHA3-256)
//! - `hash160` - `RIPEMD160(SHA256(x))`, Bitcoin's public-key hash
//!
//! All of these are pure: identical input always yields identical output.

use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::ripemd160::ripemd160;

/// Compute the SHA-256 hash of the input data.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute `SHA256(SHA256(data))`.
///
/// The first four bytes of this digest form the Base58Check checksum.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the Keccak256 hash of the input data.
///
/// This is the pre-standardisation Keccak padding used by Ethereum for
/// address derivation, EIP-55 checksums and transaction hashes.
///
/// # Example
///
/// ```rust
/// use chainkit_crypto::keccak256;
///
/// let hash = keccak256(b"hello");
/// assert_eq!(hash.len(), 32);
/// ```
#[inline]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute HASH160: `RIPEMD160(SHA256(data))`.
///
/// Used for Bitcoin P2PKH/P2WPKH payloads and Cosmos account addresses.
#[inline]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_hello() {
        assert_eq!(
            hex::encode(keccak256(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_sha256_abc() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_double_sha256_is_nested() {
        assert_eq!(double_sha256(b"abc"), sha256(&sha256(b"abc")));
    }

    #[test]
    fn test_hash160_generator_pubkey() {
        // Compressed public key of the secp256k1 generator point.
        let pubkey =
            hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
                .unwrap();
        assert_eq!(
            hex::encode(hash160(&pubkey)),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }
}
