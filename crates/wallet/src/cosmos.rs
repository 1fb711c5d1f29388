//! # Cosmos Address Pipeline
//!
//! 1. provider → compressed and uncompressed public keys
//! 2. `HASH160(compressed)`
//! 3. `bech32(hrp, convert_bits(HASH160, 8, 5, pad))`
//!
//! Unlike SegWit there is no witness-version word in front of the payload.

use chainkit_crypto::{hash160, KeyProvider, PrivateKey};
use chainkit_types::bech32::{self, Variant};
use std::fmt;
use tracing::{debug, info, warn};

use crate::keys::PublicKeys;
use crate::{Result, WalletError};

/// Account prefix of the Cosmos Hub.
pub const DEFAULT_HRP: &str = "cosmos";

/// Step 1: both public key encodings.
pub fn public_keys<P: KeyProvider>(provider: &P, private_key: &PrivateKey) -> Result<PublicKeys> {
    PublicKeys::derive(provider, private_key)
}

/// Step 2: `HASH160` of the compressed key.
pub fn hash_public_key(keys: &PublicKeys) -> [u8; 20] {
    hash160(&keys.compressed)
}

/// Step 3: plain Bech32 of the hash under `hrp`.
pub fn encode_address(hrp: &str, hash: &[u8; 20]) -> Result<String> {
    let words = bech32::convert_bits(hash, 8, 5, true)?;
    Ok(bech32::encode(hrp, &words, Variant::Bech32)?)
}

/// Completed derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmosDerivation {
    /// Public keys
    pub keys: PublicKeys,
    /// `HASH160` of the compressed key
    pub hash160: [u8; 20],
    /// Bech32 account address
    pub address: String,
}

/// Pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CosmosStage {
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
    /// Address encoded; the pipeline is complete
    Encoded(CosmosDerivation),
}

impl CosmosStage {
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

impl fmt::Display for CosmosStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stateful Cosmos derivation.
#[derive(Debug)]
pub struct CosmosPipeline<P> {
    provider: P,
    hrp: String,
    stage: CosmosStage,
}

impl<P: KeyProvider> CosmosPipeline<P> {
    /// Create an empty pipeline for accounts under `hrp`.
    pub fn new(provider: P, hrp: impl Into<String>) -> Self {
        Self {
            provider,
            hrp: hrp.into(),
            stage: CosmosStage::Empty,
        }
    }

    /// Account prefix.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// Current stage.
    pub fn stage(&self) -> &CosmosStage {
        &self.stage
    }

    /// Drop all derived values.
    pub fn reset(&mut self) {
        self.stage = CosmosStage::Empty;
    }

    fn advance(&mut self, next: CosmosStage) {
        debug!(chain = "cosmos", from = %self.stage, to = %next, "pipeline transition");
        self.stage = next;
    }

    /// Step 1. On provider failure the pipeline is emptied.
    pub fn derive_public_keys(&mut self, private_key: &PrivateKey) -> Result<PublicKeys> {
        match public_keys(&self.provider, private_key) {
            Ok(keys) => {
                self.advance(CosmosStage::PublicKeys(keys));
                Ok(keys)
            }
            Err(e) => {
                warn!(chain = "cosmos", error = %e, "public key derivation failed");
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
        self.advance(CosmosStage::Hashed { keys, hash160 });
        Ok(hash160)
    }

    /// Step 3. On failure the pipeline falls back to the hashed stage.
    pub fn encode(&mut self) -> Result<String> {
        let (keys, hash160) = match (self.stage.keys(), self.stage.hash160()) {
            (Some(keys), Some(hash160)) => (keys, hash160),
            _ => {
                return Err(WalletError::PreconditionNotMet {
                    step: "encode",
                    requires: "hashed",
                })
            }
        };

        match encode_address(&self.hrp, &hash160) {
            Ok(address) => {
                info!(chain = "cosmos", address = %address, "derived address");
                self.advance(CosmosStage::Encoded(CosmosDerivation {
                    keys,
                    hash160,
                    address: address.clone(),
                }));
                Ok(address)
            }
            Err(e) => {
                warn!(chain = "cosmos", hrp = %self.hrp, error = %e, "address encoding failed");
                self.advance(CosmosStage::Hashed { keys, hash160 });
                Err(e)
            }
        }
    }

    /// Run all three steps.
    pub fn run(&mut self, private_key: &PrivateKey) -> Result<CosmosDerivation> {
        let keys = self.derive_public_keys(private_key)?;
        let hash160 = self.hash_public_key()?;
        let address = self.encode()?;
        Ok(CosmosDerivation {
            keys,
            hash160,
            address,
        })
    }
}

/// One-shot derivation without keeping a pipeline around.
pub fn derive<P: KeyProvider>(provider: &P, hrp: &str, private_key: &PrivateKey) -> Result<CosmosDerivation> {
    CosmosPipeline::new(provider, hrp).run(private_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_address_other_zones() {
        let hash = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let hash: [u8; 20] = hash.try_into().unwrap();
        assert_eq!(
            encode_address(DEFAULT_HRP, &hash).unwrap(),
            "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c"
        );
        assert!(encode_address("osmo", &hash).unwrap().starts_with("osmo1w508d6qe"));
    }

    #[test]
    fn test_encode_rejects_mixed_case_hrp() {
        assert!(matches!(
            encode_address("Cosmos", &[0u8; 20]),
            Err(WalletError::Encoding(_))
        ));
    }

    #[test]
    fn test_encode_before_hash_is_rejected() {
        let mut pipeline = CosmosPipeline::new(chainkit_crypto::Secp256k1::new(), DEFAULT_HRP);
        assert_eq!(
            pipeline.encode(),
            Err(WalletError::PreconditionNotMet { step: "encode", requires: "hashed" })
        );
    }
}
