//! # chainkit Wallet
//!
//! Address derivation and transaction signing pipelines.
//!
//! Every pipeline is an explicit state machine: each step needs the output
//! of the step before it and fails with
//! [`WalletError::PreconditionNotMet`] otherwise. A failed step falls back to
//! the last stage that is still valid. The elliptic-curve work is delegated
//! to a [`KeyProvider`] / [`SignProvider`]; the pipelines themselves only
//! hash and encode.
//!
//! - [`ethereum`] - Keccak-256 address with EIP-55 checksum
//! - [`bitcoin`] - P2PKH, P2SH-P2WPKH and P2WPKH
//! - [`cosmos`] - Bech32 account address
//! - [`legacy_tx`] - EIP-155 legacy transaction signing
//!
//! ## Example
//!
//! ```rust
//! use chainkit_crypto::{PrivateKey, Secp256k1};
//! use chainkit_wallet::{derive_all, Networks};
//!
//! let key = PrivateKey::from_hex(&format!("{:064x}", 1)).unwrap();
//! let all = derive_all(&Secp256k1::new(), &key, &Networks::default()).unwrap();
//!
//! assert_eq!(all.ethereum.checksum_address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
//! assert_eq!(all.bitcoin.addresses.p2pkh, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
//! ```
//!
//! [`KeyProvider`]: chainkit_crypto::KeyProvider
//! [`SignProvider`]: chainkit_crypto::SignProvider

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod bitcoin;
pub mod cosmos;
pub mod error;
pub mod ethereum;
pub mod keys;
pub mod legacy_tx;
pub mod multichain;

pub use bitcoin::{BitcoinAddresses, BitcoinDerivation, BitcoinNetwork, BitcoinPipeline, BitcoinStage};
pub use cosmos::{CosmosDerivation, CosmosPipeline, CosmosStage};
pub use error::{Result, WalletError};
pub use ethereum::{EthereumDerivation, EthereumPipeline, EthereumStage};
pub use keys::{parse_private_key, PublicKeys};
pub use legacy_tx::{LegacyTxPipeline, TxStage};
pub use multichain::{derive_all, MultichainDerivation, Networks};
