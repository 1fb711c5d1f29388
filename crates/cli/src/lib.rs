//! # chainkit CLI
//!
//! Command-line front end for the chainkit derivation and signing pipelines.
//!
//! ## Available Commands
//!
//! - `derive` - Derive Ethereum, Bitcoin or Cosmos addresses from a private key
//! - `tx` - Encode, sign and decode legacy (EIP-155) Ethereum transactions
//! - `hash` - RIPEMD-160, SHA-256, Keccak-256 and HASH160 digests
//! - `keys` - Generate a fresh key and show its addresses
//! - `version` - Display version information
//!
//! ## Example Usage
//!
//! ```bash
//! # Addresses on every chain for one key
//! chainkit derive all --key 0x0000000000000000000000000000000000000000000000000000000000000001
//!
//! # Sign a transfer on chain 1
//! chainkit tx sign --nonce 9 --gas-price 20000000000 \
//!     --to 0x3535353535353535353535353535353535353535 \
//!     --value 1000000000000000000 --key 0x4646...46
//!
//! # Digest of hex input
//! chainkit --output json hash hash160 --hex 0279be66...
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod commands;
pub mod utils;

// Re-export the main CLI types for convenience
pub use commands::{run_cli, Cli, Commands};
pub use utils::{CliError, CliResult, OutputFormat};

/// Version information for the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI application name
pub const APP_NAME: &str = "chainkit";
