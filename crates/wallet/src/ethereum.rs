//! # Ethereum Address Pipeline
//!
//! 1. provider → uncompressed public key (65 bytes, `0x04` prefix)
//! 2. `Keccak256(pubkey[1..])`
//! 3. address = last 20 bytes of the hash
//! 4. EIP-55 checksum casing
//!
//! Each step is also available as a free function so any stage can be
//! computed directly from valid upstream data.

use chainkit_crypto::{keccak256, KeyProvider, PrivateKey};
use chainkit_types::EthAddress;
use std::fmt;
use tracing::{debug, info, warn};

use crate::{Result, WalletError};

/// Step 1: the uncompressed public key.
pub fn public_key<P: KeyProvider>(provider: &P, private_key: &PrivateKey) -> Result<[u8; 65]> {
    Ok(provider.uncompressed_public_key(private_key)?)
}

/// Step 2: Keccak-256 over the 64 coordinate bytes.
pub fn hash_public_key(public_key: &[u8; 65]) -> Result<[u8; 32]> {
    if public_key[0] != 0x04 {
        return Err(WalletError::Encoding(format!(
            "uncompressed public key must start with 0x04, got {:#04x}",
            public_key[0]
        )));
    }
    Ok(keccak256(&public_key[1..]))
}

/// Step 3: the last 20 bytes of the hash.
pub fn address_from_hash(hash: &[u8; 32]) -> EthAddress {
    EthAddress::from_keccak_hash(hash)
}

/// Step 4: EIP-55 mixed-case form.
pub fn checksum_address(address: &EthAddress) -> String {
    address.to_checksum_string()
}

/// Completed derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthereumDerivation {
    /// Uncompressed public key
    pub public_key: [u8; 65],
    /// Keccak-256 of the public key coordinates
    pub hash: [u8; 32],
    /// The address bytes
    pub address: EthAddress,
    /// EIP-55 checksummed address
    pub checksum_address: String,
}

/// Pipeline stage, carrying everything derived so far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EthereumStage {
    /// Nothing derived yet
    #[default]
    Empty,
    /// Public key obtained
    PublicKey {
        /// Uncompressed public key
        public_key: [u8; 65],
    },
    /// Public key hashed
    Hashed {
        /// Uncompressed public key
        public_key: [u8; 65],
        /// Keccak-256 of the coordinates
        hash: [u8; 32],
    },
    /// Address extracted
    Address {
        /// Uncompressed public key
        public_key: [u8; 65],
        /// Keccak-256 of the coordinates
        hash: [u8; 32],
        /// Address bytes
        address: EthAddress,
    },
    /// Checksum applied; the pipeline is complete
    Checksummed(EthereumDerivation),
}

impl EthereumStage {
    /// Short stage name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::PublicKey { .. } => "public-key",
            Self::Hashed { .. } => "hashed",
            Self::Address { .. } => "address",
            Self::Checksummed(_) => "checksummed",
        }
    }

    /// The public key, from any stage that has one.
    pub fn public_key(&self) -> Option<[u8; 65]> {
        match self {
            Self::Empty => None,
            Self::PublicKey { public_key }
            | Self::Hashed { public_key, .. }
            | Self::Address { public_key, .. } => Some(*public_key),
            Self::Checksummed(d) => Some(d.public_key),
        }
    }

    /// The Keccak-256 hash, from any stage that has one.
    pub fn hash(&self) -> Option<[u8; 32]> {
        match self {
            Self::Empty | Self::PublicKey { .. } => None,
            Self::Hashed { hash, .. } | Self::Address { hash, .. } => Some(*hash),
            Self::Checksummed(d) => Some(d.hash),
        }
    }

    /// The address, from any stage that has one.
    pub fn address(&self) -> Option<EthAddress> {
        match self {
            Self::Address { address, .. } => Some(*address),
            Self::Checksummed(d) => Some(d.address),
            _ => None,
        }
    }
}

impl fmt::Display for EthereumStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stateful Ethereum derivation.
///
/// Re-running a step recomputes it from the current upstream value and
/// discards everything after it.
#[derive(Debug)]
pub struct EthereumPipeline<P> {
    provider: P,
    stage: EthereumStage,
}

impl<P: KeyProvider> EthereumPipeline<P> {
    /// Create an empty pipeline.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            stage: EthereumStage::Empty,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> &EthereumStage {
        &self.stage
    }

    /// Drop all derived values.
    pub fn reset(&mut self) {
        self.stage = EthereumStage::Empty;
    }

    fn advance(&mut self, next: EthereumStage) {
        debug!(chain = "ethereum", from = %self.stage, to = %next, "pipeline transition");
        self.stage = next;
    }

    /// Step 1. On provider failure the pipeline is emptied.
    pub fn derive_public_key(&mut self, private_key: &PrivateKey) -> Result<[u8; 65]> {
        match public_key(&self.provider, private_key) {
            Ok(public_key) => {
                self.advance(EthereumStage::PublicKey { public_key });
                Ok(public_key)
            }
            Err(e) => {
                warn!(chain = "ethereum", error = %e, "public key derivation failed");
                self.reset();
                Err(e)
            }
        }
    }

    /// Step 2.
    pub fn hash_public_key(&mut self) -> Result<[u8; 32]> {
        let public_key = self.stage.public_key().ok_or(WalletError::PreconditionNotMet {
            step: "hash",
            requires: "public-key",
        })?;
        match hash_public_key(&public_key) {
            Ok(hash) => {
                self.advance(EthereumStage::Hashed { public_key, hash });
                Ok(hash)
            }
            Err(e) => {
                self.advance(EthereumStage::PublicKey { public_key });
                Err(e)
            }
        }
    }

    /// Step 3.
    pub fn extract_address(&mut self) -> Result<EthAddress> {
        let (public_key, hash) = match (self.stage.public_key(), self.stage.hash()) {
            (Some(public_key), Some(hash)) => (public_key, hash),
            _ => {
                return Err(WalletError::PreconditionNotMet {
                    step: "address",
                    requires: "hashed",
                })
            }
        };
        let address = address_from_hash(&hash);
        self.advance(EthereumStage::Address {
            public_key,
            hash,
            address,
        });
        Ok(address)
    }

    /// Step 4.
    pub fn checksum(&mut self) -> Result<String> {
        let derivation = match (self.stage.public_key(), self.stage.hash(), self.stage.address()) {
            (Some(public_key), Some(hash), Some(address)) => EthereumDerivation {
                public_key,
                hash,
                address,
                checksum_address: checksum_address(&address),
            },
            _ => {
                return Err(WalletError::PreconditionNotMet {
                    step: "checksum",
                    requires: "address",
                })
            }
        };
        let checksummed = derivation.checksum_address.clone();
        info!(chain = "ethereum", address = %checksummed, "derived address");
        self.advance(EthereumStage::Checksummed(derivation));
        Ok(checksummed)
    }

    /// Run all four steps.
    pub fn run(&mut self, private_key: &PrivateKey) -> Result<EthereumDerivation> {
        self.derive_public_key(private_key)?;
        self.hash_public_key()?;
        self.extract_address()?;
        self.checksum()?;
        match &self.stage {
            EthereumStage::Checksummed(derivation) => Ok(derivation.clone()),
            _ => Err(WalletError::PreconditionNotMet {
                step: "run",
                requires: "checksummed",
            }),
        }
    }
}

/// One-shot derivation without keeping a pipeline around.
pub fn derive<P: KeyProvider>(provider: &P, private_key: &PrivateKey) -> Result<EthereumDerivation> {
    EthereumPipeline::new(provider).run(private_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainkit_crypto::Secp256k1;

    fn generator_key() -> PrivateKey {
        PrivateKey::from_hex(&format!("{:064x}", 1)).unwrap()
    }

    #[test]
    fn test_steps_out_of_order() {
        let mut pipeline = EthereumPipeline::new(Secp256k1::new());
        assert_eq!(
            pipeline.hash_public_key(),
            Err(WalletError::PreconditionNotMet { step: "hash", requires: "public-key" })
        );
        assert!(matches!(
            pipeline.extract_address(),
            Err(WalletError::PreconditionNotMet { .. })
        ));
        assert!(matches!(pipeline.checksum(), Err(WalletError::PreconditionNotMet { .. })));
        assert_eq!(pipeline.stage(), &EthereumStage::Empty);
    }

    #[test]
    fn test_rerunning_a_step_discards_downstream() {
        let mut pipeline = EthereumPipeline::new(Secp256k1::new());
        pipeline.run(&generator_key()).unwrap();
        assert_eq!(pipeline.stage().name(), "checksummed");

        pipeline.hash_public_key().unwrap();
        assert_eq!(pipeline.stage().name(), "hashed");
        assert_eq!(pipeline.stage().address(), None);
    }

    #[test]
    fn test_provider_failure_clears_stage() {
        let mut pipeline = EthereumPipeline::new(Secp256k1::new());
        pipeline.run(&generator_key()).unwrap();

        let err = pipeline.derive_public_key(&PrivateKey::from_bytes([0u8; 32]));
        assert!(matches!(err, Err(WalletError::ProviderFailure(_))));
        assert_eq!(pipeline.stage(), &EthereumStage::Empty);
    }

    #[test]
    fn test_hash_rejects_non_uncompressed_key() {
        let mut key = [0u8; 65];
        key[0] = 0x02;
        assert!(matches!(hash_public_key(&key), Err(WalletError::Encoding(_))));
    }
}
