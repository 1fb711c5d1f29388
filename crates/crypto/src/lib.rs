//! # chainkit Crypto
//!
//! Hash primitives and the elliptic-curve boundary for chainkit.
//!
//! This crate provides:
//! - **RIPEMD-160** - implemented here, no external dependency
//! - **SHA-256 / Keccak-256** - thin wrappers over `sha2` / `sha3`
//! - **HASH160** - `RIPEMD160(SHA256(x))`
//! - **secp256k1 provider** - public-key derivation and recoverable signing
//!   behind the [`KeyProvider`] / [`SignProvider`] traits
//!
//! ## Example
//!
//! ```rust
//! use chainkit_crypto::{hash160, keccak256, ripemd160};
//!
//! assert_eq!(
//!     hex::encode(ripemd160(b"")),
//!     "9c1185a5c5e9fc54612808977ee8f548b2258d31"
//! );
//! let _ = keccak256(b"hello world");
//! let _ = hash160(b"hello world");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod ecdsa;
pub mod hash;
pub mod provider;
pub mod ripemd160;

// Re-export commonly used items
pub use ecdsa::{PrivateKey, RecoverableSignature, Secp256k1};
pub use hash::{double_sha256, hash160, keccak256, sha256};
pub use provider::{KeyProvider, SignProvider};
pub use ripemd160::{ripemd160, Ripemd160};

/// Error types for cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// Hex input had odd length or non-hex characters
    #[error("malformed hex: {0}")]
    MalformedHex(String),

    /// Invalid input length
    #[error("invalid input length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// The provider rejected the private key scalar
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid signature bytes
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The provider failed to produce a signature
    #[error("signing failed: {0}")]
    Signing(String),

    /// Failed to recover public key from signature
    #[error("failed to recover public key: {0}")]
    RecoveryFailed(String),
}

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        CryptoError::MalformedHex(e.to_string())
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
