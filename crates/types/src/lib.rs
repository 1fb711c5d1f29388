//! # chainkit Types
//!
//! Wire encodings and transaction types shared by the chainkit pipelines.
//!
//! This crate provides:
//! - [`parse`] - hex and numeric-quantity parsing for user supplied fields
//! - [`base58`] - Base58 and Base58Check
//! - [`bech32`] - Bech32 / Bech32m and SegWit address encoding
//! - [`rlp`] - Recursive Length Prefix encoding and strict decoding
//! - [`EthAddress`] - 20-byte Ethereum address with EIP-55 checksums
//! - [`LegacyTransaction`] - pre-EIP-2718 transactions signed with EIP-155
//!
//! ## Example
//!
//! ```rust
//! use chainkit_types::{base58, bech32, rlp, EthAddress};
//!
//! let addr = EthAddress::from_hex("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
//! assert_eq!(addr.to_checksum_string(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
//!
//! assert_eq!(base58::check_encode(0x00, &[0u8; 20]), "1111111111111111111114oLvT2");
//! assert_eq!(bech32::encode("a", &[], bech32::Variant::Bech32).unwrap(), "a12uel5l");
//! assert_eq!(hex::encode(rlp::encode_bytes(b"dog")), "83646f67");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod address;
pub mod base58;
pub mod bech32;
pub mod parse;
pub mod rlp;
pub mod transaction;

// Re-export main types at crate root
pub use address::EthAddress;
pub use rlp::{Encodable, RlpItem};
pub use transaction::{LegacyTransaction, Signature, SignedLegacyTransaction, TxFields};

pub use alloy_primitives::U256;

/// Result type alias for chainkit type operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing or encoding chainkit types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Hex input had odd length or non-hex characters
    #[error("malformed hex: {0}")]
    MalformedHex(String),

    /// Invalid length for a fixed-size type
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A numeric field was neither decimal nor `0x` hex, or overflowed 256 bits
    #[error("malformed quantity for {field}: {value:?}")]
    MalformedQuantity {
        /// Name of the offending field
        field: &'static str,
        /// The rejected input
        value: String,
    },

    /// Bit regrouping saw an out-of-range value or non-zero padding
    #[error("invalid bit group: {0}")]
    InvalidBitGroup(String),

    /// Bech32 human-readable part is empty, too long, non-printable or mixed case
    #[error("invalid human-readable part: {0}")]
    InvalidHrp(String),

    /// Character outside the encoding's alphabet
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    /// Bech32 string mixes upper and lower case
    #[error("mixed-case bech32 string")]
    MixedCase,

    /// Encoded string length outside the format's limits
    #[error("invalid encoded length: {0}")]
    InvalidEncodedLength(usize),

    /// Checksum did not verify
    #[error("invalid {0} checksum")]
    InvalidChecksum(&'static str),

    /// SegWit witness version above 16, or wrong checksum variant for it
    #[error("invalid witness version: {0}")]
    InvalidWitnessVersion(u8),

    /// SegWit witness program length outside the allowed range
    #[error("invalid witness program length {length} for version {version}")]
    InvalidProgramLength {
        /// Witness version
        version: u8,
        /// Program length in bytes
        length: usize,
    },

    /// The address belongs to a different network
    #[error("unexpected human-readable part: expected {expected}, got {actual}")]
    HrpMismatch {
        /// Expected HRP
        expected: String,
        /// HRP found in the address
        actual: String,
    },

    /// RLP decoding error
    #[error("RLP decode error: {0}")]
    Rlp(#[from] crate::rlp::RlpError),

    /// Invalid transaction
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Cryptographic error
    #[error("crypto error: {0}")]
    Crypto(#[from] chainkit_crypto::CryptoError),
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::MalformedHex(e.to_string())
    }
}
