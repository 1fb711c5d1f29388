//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write configuration file
    #[error("Failed to write config file at {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Invalid chain ID (must be non-zero)
    #[error("Invalid chain ID: ethereum.chain_id must be non-zero")]
    InvalidChainId,

    /// Bech32 human-readable part rejected
    #[error("Invalid {section}.bech32_hrp {hrp:?}: {reason}")]
    InvalidHrp {
        section: &'static str,
        hrp: String,
        reason: String,
    },

    /// P2PKH and P2SH share a version byte
    #[error("Invalid bitcoin version bytes: p2pkh_version and p2sh_version are both {0:#04x}")]
    DuplicateVersionByte(u8),

    /// Unknown network preset name
    #[error("Unknown bitcoin network {0:?}. Valid values: mainnet, testnet, regtest")]
    UnknownNetwork(String),

    /// Invalid log level
    #[error("Invalid log level: {0}. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Invalid log format
    #[error("Invalid log format: {0}. Valid values: text, json")]
    InvalidLogFormat(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
