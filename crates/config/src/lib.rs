//! # chainkit Configuration
//!
//! Network identifiers and logging settings for chainkit, read from a single
//! `chainkit.toml` file. Every section is optional; missing values fall back
//! to Ethereum mainnet, Bitcoin mainnet and the Cosmos Hub.
//!
//! ## Usage
//!
//! ```rust
//! use chainkit_config::Config;
//!
//! let config = Config::from_str(r#"
//!     [bitcoin]
//!     network = "testnet"
//!
//!     [cosmos]
//!     bech32_hrp = "osmo"
//! "#).unwrap();
//!
//! assert_eq!(config.bitcoin.resolve().unwrap().bech32_hrp, "tb");
//! assert_eq!(config.ethereum.chain_id, 1);
//! ```
//!
//! ## Configuration Sections
//!
//! - `[logging]` - Log level and format (text, json)
//! - `[ethereum]` - EIP-155 chain id used when signing
//! - `[bitcoin]` - Base58Check version bytes and SegWit HRP
//! - `[cosmos]` - Account address HRP

mod config;
mod error;

pub use config::*;
pub use error::*;
