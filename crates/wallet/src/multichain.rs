//! One key, every chain.
//!
//! The same private key yields byte-identical public keys for all three
//! pipelines, and Bitcoin and Cosmos share the same `HASH160`; only the final
//! encoding differs.

use chainkit_crypto::{KeyProvider, PrivateKey};
use tracing::info;

use crate::bitcoin::{self, BitcoinDerivation, BitcoinNetwork};
use crate::cosmos::{self, CosmosDerivation};
use crate::ethereum::{self, EthereumDerivation};
use crate::Result;

/// Network parameters for [`derive_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Networks {
    /// Bitcoin version bytes and HRP
    pub bitcoin: BitcoinNetwork,
    /// Cosmos account prefix
    pub cosmos_hrp: String,
}

impl Default for Networks {
    fn default() -> Self {
        Self {
            bitcoin: BitcoinNetwork::mainnet(),
            cosmos_hrp: cosmos::DEFAULT_HRP.into(),
        }
    }
}

/// Results of all three pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultichainDerivation {
    /// Ethereum pipeline output
    pub ethereum: EthereumDerivation,
    /// Bitcoin pipeline output
    pub bitcoin: BitcoinDerivation,
    /// Cosmos pipeline output
    pub cosmos: CosmosDerivation,
}

/// Run the Ethereum, Bitcoin and Cosmos pipelines for one key.
pub fn derive_all<P: KeyProvider>(
    provider: &P,
    private_key: &PrivateKey,
    networks: &Networks,
) -> Result<MultichainDerivation> {
    let derivation = MultichainDerivation {
        ethereum: ethereum::derive(provider, private_key)?,
        bitcoin: bitcoin::derive(provider, &networks.bitcoin, private_key)?,
        cosmos: cosmos::derive(provider, &networks.cosmos_hrp, private_key)?,
    };
    info!(
        ethereum = %derivation.ethereum.checksum_address,
        bitcoin = %derivation.bitcoin.addresses.p2pkh,
        cosmos = %derivation.cosmos.address,
        "derived multichain addresses"
    );
    Ok(derivation)
}
