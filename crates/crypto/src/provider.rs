//! Elliptic-curve provider traits.
//!
//! The derivation and signing pipelines never do curve arithmetic
//! themselves. They consume public keys and recoverable signatures from a
//! provider behind these traits, which keeps the EC backend swappable and
//! lets tests substitute a fixed provider.
//!
//! # Thread Safety
//!
//! Implementations must be thread-safe (`Send + Sync`).

use crate::ecdsa::{PrivateKey, RecoverableSignature};
use crate::Result;

/// Derives secp256k1 public keys from private keys.
pub trait KeyProvider: Send + Sync {
    /// SEC1 compressed public key: `0x02`/`0x03` prefix followed by X.
    fn compressed_public_key(&self, private_key: &PrivateKey) -> Result<[u8; 33]>;

    /// SEC1 uncompressed public key: `0x04` prefix followed by X and Y.
    fn uncompressed_public_key(&self, private_key: &PrivateKey) -> Result<[u8; 65]>;

    /// Returns the requested encoding as an owned byte vector.
    fn public_key(&self, private_key: &PrivateKey, compressed: bool) -> Result<Vec<u8>> {
        if compressed {
            self.compressed_public_key(private_key).map(|k| k.to_vec())
        } else {
            self.uncompressed_public_key(private_key).map(|k| k.to_vec())
        }
    }
}

/// Produces recoverable ECDSA signatures over pre-hashed messages.
pub trait SignProvider: Send + Sync {
    /// Sign a 32-byte digest.
    ///
    /// Signing must be deterministic for a fixed `(hash, private_key)` pair.
    fn sign_prehash(&self, hash: &[u8; 32], private_key: &PrivateKey) -> Result<RecoverableSignature>;
}

impl<T: KeyProvider + ?Sized> KeyProvider for &T {
    fn compressed_public_key(&self, private_key: &PrivateKey) -> Result<[u8; 33]> {
        (**self).compressed_public_key(private_key)
    }

    fn uncompressed_public_key(&self, private_key: &PrivateKey) -> Result<[u8; 65]> {
        (**self).uncompressed_public_key(private_key)
    }
}

impl<T: SignProvider + ?Sized> SignProvider for &T {
    fn sign_prehash(&self, hash: &[u8; 32], private_key: &PrivateKey) -> Result<RecoverableSignature> {
        (**self).sign_prehash(hash, private_key)
    }
}
