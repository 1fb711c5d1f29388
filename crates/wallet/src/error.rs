//! Wallet error types

use chainkit_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur while running a derivation or signing pipeline
///
/// A failed step never leaves stale downstream values behind: the pipeline
/// falls back to the last stage that is still valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Hex input had odd length or non-hex characters
    #[error("malformed hex: {0}")]
    MalformedHex(String),

    /// Input had the wrong number of bytes
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Bech32 regrouping saw an out-of-range value or non-zero padding
    #[error("invalid bit group: {0}")]
    InvalidBitGroup(String),

    /// A step was invoked before its predecessor produced output
    #[error("precondition not met: {step} requires {requires}")]
    PreconditionNotMet {
        /// The step that was invoked
        step: &'static str,
        /// The stage it needs
        requires: &'static str,
    },

    /// The external key or signing provider rejected the input
    #[error("provider failure: {0}")]
    ProviderFailure(String),

    /// A numeric transaction field is neither decimal nor hex
    #[error("malformed quantity for {field}: {value:?}")]
    MalformedQuantity {
        /// Field name
        field: &'static str,
        /// Rejected input
        value: String,
    },

    /// Signing was requested without a private key
    #[error("missing private key")]
    MissingPrivateKey,

    /// Any other encoding failure (HRP, witness program, RLP)
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::MalformedHex(msg) => WalletError::MalformedHex(msg),
            CryptoError::InvalidLength { expected, actual } => {
                WalletError::InvalidLength { expected, actual }
            }
            other => WalletError::ProviderFailure(other.to_string()),
        }
    }
}

impl From<chainkit_types::Error> for WalletError {
    fn from(e: chainkit_types::Error) -> Self {
        use chainkit_types::Error;
        match e {
            Error::MalformedHex(msg) => WalletError::MalformedHex(msg),
            Error::InvalidLength { expected, actual } => WalletError::InvalidLength { expected, actual },
            Error::InvalidBitGroup(msg) => WalletError::InvalidBitGroup(msg),
            Error::MalformedQuantity { field, value } => WalletError::MalformedQuantity { field, value },
            Error::Crypto(e) => e.into(),
            other => WalletError::Encoding(other.to_string()),
        }
    }
}

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;
