//! # Bitcoin Address Pipeline
//!
//! 1. provider → compressed and uncompressed public keys
//! 2. `HASH160(compressed)`
//! 3. three encodings of that hash:
//!    - P2PKH: `Base58Check(p2pkh_version, HASH160)`
//!    - P2SH-P2WPKH: `Base58Check(p2sh_version, HASH160(0x00 0x14 ‖ HASH160))`
//!    - P2WPKH: SegWit v0 under the network HRP

use chainkit_crypto::{hash160, KeyProvider, PrivateKey};
use chainkit_types::{base58, bech32};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::keys::PublicKeys;
use crate::{Result, WalletError};

/// Version bytes and HRP that select a Bitcoin network.
///
/// Any syntactically valid HRP is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinNetwork {
    /// Base58Check version byte for P2PKH
    pub p2pkh_version: u8,
    /// Base58Check version byte for P2SH
    pub p2sh_version: u8,
    /// Bech32 human-readable part for SegWit
    pub hrp: String,
}

impl BitcoinNetwork {
    /// Bitcoin mainnet: `1…`, `3…`, `bc1…`.
    pub fn mainnet() -> Self {
        Self {
            p2pkh_version: 0x00,
            p2sh_version: 0x05,
            hrp: "bc".into(),
        }
    }

    /// Bitcoin testnet: `m…`/`n…`, `2…`, `tb1…`.
    pub fn testnet() -> Self {
        Self {
            p2pkh_version: 0x6f,
            p2sh_version: 0xc4,
            hrp: "tb".into(),
        }
    }

    /// Regtest shares testnet's version bytes with its own HRP.
    pub fn regtest() -> Self {
        Self {
            hrp: "bcrt".into(),
            ..Self::testnet()
        }
    }
}

impl Default for BitcoinNetwork {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Step 1: both public key encodings.
pub fn public_keys<P: KeyProvider>(provider: &P, private_key: &PrivateKey) -> Result<PublicKeys> {
    PublicKeys::derive(provider, private_key)
}

/// Step 2: `HASH160` of the compressed key.
pub fn hash_public_key(keys: &PublicKeys) -> [u8; 20] {
    hash160(&keys.compressed)
}

/// `OP_0 PUSH20 <hash160>`, the P2WPKH witness program as a script.
pub fn redeem_script(hash: &[u8; 20]) -> [u8; 22] {
    let mut script = [0u8; 22];
    script[0] = 0x00;
    script[1] = 0x14;
    script[2..].copy_from_slice(hash);
    script
}

/// Legacy pay-to-public-key-hash address.
pub fn p2pkh(network: &BitcoinNetwork, hash: &[u8; 20]) -> String {
    base58::check_encode(network.p2pkh_version, hash)
}

/// P2WPKH nested in P2SH.
pub fn p2sh_p2wpkh(network: &BitcoinNetwork, hash: &[u8; 20]) -> String {
    base58::check_encode(network.p2sh_version, &hash160(&redeem_script(hash)))
}

/// Native SegWit v0 address.
pub fn p2wpkh(network: &BitcoinNetwork, hash: &[u8; 20]) -> Result<String> {
    Ok(bech32::segwit_encode(&network.hrp, 0, hash)?)
}

/// The three address encodings of one key hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinAddresses {
    /// `Base58Check(p2pkh_version, HASH160)`
    pub p2pkh: String,
    /// `Base58Check(p2sh_version, HASH160(redeem script))`
    pub p2sh_p2wpkh: String,
    /// `segwit(hrp, 0, HASH160)`
    pub p2wpkh: String,
}

/// Step 3: encode all three addresses.
pub fn encode_addresses(network: &BitcoinNetwork, hash: &[u8; 20]) -> Result<BitcoinAddresses> {
    Ok(BitcoinAddresses {
        p2pkh: p2pkh(network, hash),
        p2sh_p2wpkh: p2sh_p2wpkh(network, hash),
        p2wpkh: p2wpkh(network, hash)?,
    })
}

/// Completed derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinDerivation {
    /// Public keys
    pub keys: PublicKeys,
    /// `HASH160` of the compressed key
    pub hash160: [u8; 20],
    /// Address encodings
    pub addresses: BitcoinAddresses,
}

/// Pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BitcoinStage {
    /// Nothing derived yet
    #[default]
    Empty,
    /// Public keys obtained
    PublicKeys(PublicKeys),
    /// Key hashed
    Hashed {
        /// Public keys
        keys: PublicKeys,
        /// `HASH160` of the compressed key
        hash160: [u8; 20],
    },
    /// Addresses encoded; the pipeline is complete
    Encoded(BitcoinDerivation),
}

impl BitcoinStage {
    /// Short stage name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::PublicKeys(_) => "public-keys",
            Self::Hashed { .. } => "hashed",
            Self::Encoded(_) => "encoded",
        }
    }

    /// The public keys, from any stage that has them.
    pub fn keys(&self) -> Option<PublicKeys> {
        match self {
            Self::Empty => None,
            Self::PublicKeys(keys) | Self::Hashed { keys, .. } => Some(*keys),
            Self::Encoded(d) => Some(d.keys),
        }
    }

    /// The key hash, from any stage that has it.
    pub fn hash160(&self) -> Option<[u8; 20]> {
        match self {
            Self::Hashed { hash160, .. } => Some(*hash160),
            Self::Encoded(d) => Some(d.hash160),
            _ => None,
        }
    }
}

impl fmt::Display for BitcoinStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stateful Bitcoin derivation for one network.
#[derive(Debug)]
pub struct BitcoinPipeline<P> {
    provider: P,
    network: BitcoinNetwork,
    stage: BitcoinStage,
}

impl<P: KeyProvider> BitcoinPipeline<P> {
    /// Create an empty pipeline.
    pub fn new(provider: P, network: BitcoinNetwork) -> Self {
        Self {
            provider,
            network,
            stage: BitcoinStage::Empty,
        }
    }

    /// Network parameters.
    pub fn network(&self) -> &BitcoinNetwork {
        &self.network
    }

    /// Switch networks. Public keys and the hash survive; addresses do not.
    pub fn set_network(&mut self, network: BitcoinNetwork) {
        self.network = network;
        if let BitcoinStage::Encoded(d) = &self.stage {
            let fallback = BitcoinStage::Hashed {
                keys: d.keys,
                hash160: d.hash160,
            };
            self.advance(fallback);
        }
    }

    /// Current stage.
    pub fn stage(&self) -> &BitcoinStage {
        &self.stage
    }

    /// Drop all derived values.
    pub fn reset(&mut self) {
        self.stage = BitcoinStage::Empty;
    }

    fn advance(&mut self, next: BitcoinStage) {
        debug!(chain = "bitcoin", from = %self.stage, to = %next, "pipeline transition");
        self.stage = next;
    }

    /// Step 1. On provider failure the pipeline is emptied.
    pub fn derive_public_keys(&mut self, private_key: &PrivateKey) -> Result<PublicKeys> {
        match public_keys(&self.provider, private_key) {
            Ok(keys) => {
                self.advance(BitcoinStage::PublicKeys(keys));
                Ok(keys)
            }
            Err(e) => {
                warn!(chain = "bitcoin", error = %e, "public key derivation failed");
                self.reset();
                Err(e)
            }
        }
    }

    /// Step 2.
    pub fn hash_public_key(&mut self) -> Result<[u8; 20]> {
        let keys = self.stage.keys().ok_or(WalletError::PreconditionNotMet {
            step: "hash160",
            requires: "public-keys",
        })?;
        let hash160 = hash_public_key(&keys);
        self.advance(BitcoinStage::Hashed { keys, hash160 });
        Ok(hash160)
    }

    /// Step 3. On failure the pipeline falls back to the hashed stage.
    pub fn encode(&mut self) -> Result<BitcoinAddresses> {
        let (keys, hash160) = match (self.stage.keys(), self.stage.hash160()) {
            (Some(keys), Some(hash160)) => (keys, hash160),
            _ => {
                return Err(WalletError::PreconditionNotMet {
                    step: "encode",
                    requires: "hashed",
                })
            }
        };

        match encode_addresses(&self.network, &hash160) {
            Ok(addresses) => {
                info!(
                    chain = "bitcoin",
                    p2pkh = %addresses.p2pkh,
                    p2wpkh = %addresses.p2wpkh,
                    "derived addresses"
                );
                self.advance(BitcoinStage::Encoded(BitcoinDerivation {
                    keys,
                    hash160,
                    addresses: addresses.clone(),
                }));
                Ok(addresses)
            }
            Err(e) => {
                warn!(chain = "bitcoin", hrp = %self.network.hrp, error = %e, "address encoding failed");
                self.advance(BitcoinStage::Hashed { keys, hash160 });
                Err(e)
            }
        }
    }

    /// Run all three steps.
    pub fn run(&mut self, private_key: &PrivateKey) -> Result<BitcoinDerivation> {
        let keys = self.derive_public_keys(private_key)?;
        let hash160 = self.hash_public_key()?;
        let addresses = self.encode()?;
        Ok(BitcoinDerivation {
            keys,
            hash160,
            addresses,
        })
    }
}

/// One-shot derivation without keeping a pipeline around.
pub fn derive<P: KeyProvider>(
    provider: &P,
    network: &BitcoinNetwork,
    private_key: &PrivateKey,
) -> Result<BitcoinDerivation> {
    BitcoinPipeline::new(provider, network.clone()).run(private_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_script_layout() {
        let script = redeem_script(&[0xab; 20]);
        assert_eq!(&script[..2], &[0x00, 0x14]);
        assert_eq!(&script[2..], &[0xab; 20]);
    }

    #[test]
    fn test_zero_hash_p2pkh() {
        assert_eq!(
            p2pkh(&BitcoinNetwork::mainnet(), &[0u8; 20]),
            "1111111111111111111114oLvT2"
        );
    }

    #[test]
    fn test_testnet_prefixes() {
        let hash = [0x42u8; 20];
        let network = BitcoinNetwork::testnet();
        let addresses = encode_addresses(&network, &hash).unwrap();
        assert!(addresses.p2pkh.starts_with('m') || addresses.p2pkh.starts_with('n'));
        assert!(addresses.p2sh_p2wpkh.starts_with('2'));
        assert!(addresses.p2wpkh.starts_with("tb1q"));
        assert!(encode_addresses(&BitcoinNetwork::regtest(), &hash)
            .unwrap()
            .p2wpkh
            .starts_with("bcrt1q"));
    }

    #[test]
    fn test_bad_hrp_falls_back_to_hashed() {
        let network = BitcoinNetwork {
            hrp: "Bad Hrp".into(),
            ..BitcoinNetwork::mainnet()
        };
        let mut pipeline = BitcoinPipeline::new(chainkit_crypto::Secp256k1::new(), network);
        let key = PrivateKey::from_hex(&"46".repeat(32)).unwrap();
        pipeline.derive_public_keys(&key).unwrap();
        pipeline.hash_public_key().unwrap();

        assert!(matches!(pipeline.encode(), Err(WalletError::Encoding(_))));
        assert_eq!(pipeline.stage().name(), "hashed");
    }
}
