//! # Legacy Transaction Pipeline
//!
//! `Fields → Unsigned → Hashed → Signed`
//!
//! - **Unsigned**: fields parsed and RLP-encoded in the EIP-155 signing
//!   layout `[nonce, gasPrice, gasLimit, to, value, data, chainId, "", ""]`
//! - **Hashed**: Keccak-256 of the unsigned RLP
//! - **Signed**: the provider's `(r, s, recovery_id)` over that hash,
//!   `v = recovery_id + 35 + 2 * chainId`, re-encoded as
//!   `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`
//!
//! Editing any field drops the pipeline back to `Fields`, so a signature is
//! never produced from stale bytes.

use chainkit_crypto::{PrivateKey, SignProvider};
use chainkit_types::{LegacyTransaction, SignedLegacyTransaction, TxFields};
use std::fmt;
use tracing::{debug, info, warn};

use crate::{Result, WalletError};

/// Pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TxStage {
    /// Only raw fields are present
    #[default]
    Fields,
    /// Fields parsed and encoded for signing
    Unsigned {
        /// Parsed transaction
        transaction: LegacyTransaction,
        /// EIP-155 signing payload
        unsigned_rlp: Vec<u8>,
    },
    /// Signing payload hashed
    Hashed {
        /// Parsed transaction
        transaction: LegacyTransaction,
        /// EIP-155 signing payload
        unsigned_rlp: Vec<u8>,
        /// Keccak-256 of `unsigned_rlp`
        hash: [u8; 32],
    },
    /// Signed; the pipeline is complete
    Signed {
        /// Keccak-256 of the unsigned payload
        hash: [u8; 32],
        /// The signed transaction
        signed: SignedLegacyTransaction,
    },
}

impl TxStage {
    /// Short stage name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fields => "fields",
            Self::Unsigned { .. } => "unsigned",
            Self::Hashed { .. } => "hashed",
            Self::Signed { .. } => "signed",
        }
    }
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Step 1: parse and encode.
pub fn encode_unsigned(fields: &TxFields) -> Result<(LegacyTransaction, Vec<u8>)> {
    let transaction = fields.parse()?;
    let unsigned_rlp = transaction.unsigned_rlp();
    Ok((transaction, unsigned_rlp))
}

/// Step 2: hash the signing payload.
pub fn hash_unsigned(unsigned_rlp: &[u8]) -> [u8; 32] {
    chainkit_crypto::keccak256(unsigned_rlp)
}

/// Step 3: sign `hash` and attach the EIP-155 signature.
pub fn sign_hash<S: SignProvider>(
    signer: &S,
    transaction: LegacyTransaction,
    hash: &[u8; 32],
    private_key: &PrivateKey,
) -> Result<SignedLegacyTransaction> {
    let signature = signer.sign_prehash(hash, private_key)?;
    Ok(transaction.into_signed(&signature)?)
}

/// Stateful legacy transaction builder.
#[derive(Debug)]
pub struct LegacyTxPipeline<S> {
    signer: S,
    fields: TxFields,
    stage: TxStage,
}

impl<S: SignProvider> LegacyTxPipeline<S> {
    /// Create a pipeline over `fields`.
    pub fn new(signer: S, fields: TxFields) -> Self {
        Self {
            signer,
            fields,
            stage: TxStage::Fields,
        }
    }

    /// Current raw fields.
    pub fn fields(&self) -> &TxFields {
        &self.fields
    }

    /// Current stage.
    pub fn stage(&self) -> &TxStage {
        &self.stage
    }

    fn advance(&mut self, next: TxStage) {
        debug!(from = %self.stage, to = %next, "transaction pipeline transition");
        self.stage = next;
    }

    /// Replace all fields. Any derived state is discarded.
    pub fn set_fields(&mut self, fields: TxFields) {
        self.fields = fields;
        self.advance(TxStage::Fields);
    }

    /// Edit fields in place. Any derived state is discarded.
    pub fn update_fields(&mut self, edit: impl FnOnce(&mut TxFields)) {
        edit(&mut self.fields);
        self.advance(TxStage::Fields);
    }

    /// `Fields → Unsigned`. A parse failure leaves the pipeline at `Fields`.
    pub fn encode(&mut self) -> Result<Vec<u8>> {
        match encode_unsigned(&self.fields) {
            Ok((transaction, unsigned_rlp)) => {
                self.advance(TxStage::Unsigned {
                    transaction,
                    unsigned_rlp: unsigned_rlp.clone(),
                });
                Ok(unsigned_rlp)
            }
            Err(e) => {
                warn!(error = %e, "rejected transaction fields");
                self.advance(TxStage::Fields);
                Err(e)
            }
        }
    }

    /// `Unsigned → Hashed`.
    pub fn hash(&mut self) -> Result<[u8; 32]> {
        let (transaction, unsigned_rlp) = match &self.stage {
            TxStage::Unsigned {
                transaction,
                unsigned_rlp,
            }
            | TxStage::Hashed {
                transaction,
                unsigned_rlp,
                ..
            } => (transaction.clone(), unsigned_rlp.clone()),
            TxStage::Signed { signed, .. } => {
                let transaction = signed.transaction.clone();
                let unsigned_rlp = transaction.unsigned_rlp();
                (transaction, unsigned_rlp)
            }
            TxStage::Fields => {
                return Err(WalletError::PreconditionNotMet {
                    step: "hash",
                    requires: "unsigned",
                })
            }
        };

        let hash = hash_unsigned(&unsigned_rlp);
        self.advance(TxStage::Hashed {
            transaction,
            unsigned_rlp,
            hash,
        });
        Ok(hash)
    }

    /// `Hashed → Signed`.
    ///
    /// A missing key is rejected before the signer is called. A signer
    /// failure leaves the pipeline at `Hashed`.
    pub fn sign(&mut self, private_key: Option<&PrivateKey>) -> Result<SignedLegacyTransaction> {
        let (transaction, hash) = match &self.stage {
            TxStage::Hashed {
                transaction, hash, ..
            } => (transaction.clone(), *hash),
            TxStage::Signed { signed, hash } => (signed.transaction.clone(), *hash),
            _ => {
                return Err(WalletError::PreconditionNotMet {
                    step: "sign",
                    requires: "hashed",
                })
            }
        };
        let private_key = private_key.ok_or(WalletError::MissingPrivateKey)?;

        match sign_hash(&self.signer, transaction.clone(), &hash, private_key) {
            Ok(signed) => {
                info!(
                    tx_hash = %hex::encode(signed.hash()),
                    chain_id = %signed.transaction.chain_id,
                    "signed legacy transaction"
                );
                self.advance(TxStage::Signed {
                    hash,
                    signed: signed.clone(),
                });
                Ok(signed)
            }
            Err(e) => {
                warn!(error = %e, "signing failed");
                let unsigned_rlp = transaction.unsigned_rlp();
                self.advance(TxStage::Hashed {
                    transaction,
                    unsigned_rlp,
                    hash,
                });
                Err(e)
            }
        }
    }

    /// Run every step.
    pub fn run(&mut self, private_key: Option<&PrivateKey>) -> Result<SignedLegacyTransaction> {
        // A missing key is rejected before any step runs.
        if private_key.is_none() {
            return Err(WalletError::MissingPrivateKey);
        }
        self.encode()?;
        self.hash()?;
        self.sign(private_key)
    }

    /// The signed transaction, once the pipeline is complete.
    pub fn signed(&self) -> Option<&SignedLegacyTransaction> {
        match &self.stage {
            TxStage::Signed { signed, .. } => Some(signed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainkit_crypto::Secp256k1;

    #[test]
    fn test_hash_before_encode() {
        let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), TxFields::default());
        assert_eq!(
            pipeline.hash(),
            Err(WalletError::PreconditionNotMet { step: "hash", requires: "unsigned" })
        );
    }

    #[test]
    fn test_sign_before_hash() {
        let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), TxFields::default());
        pipeline.encode().unwrap();
        let key = PrivateKey::from_hex(&"46".repeat(32)).unwrap();
        assert_eq!(
            pipeline.sign(Some(&key)),
            Err(WalletError::PreconditionNotMet { step: "sign", requires: "hashed" })
        );
        assert_eq!(pipeline.stage().name(), "unsigned");
    }

    #[test]
    fn test_missing_key_keeps_hash() {
        let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), TxFields::default());
        pipeline.encode().unwrap();
        pipeline.hash().unwrap();
        assert_eq!(pipeline.sign(None), Err(WalletError::MissingPrivateKey));
        assert_eq!(pipeline.stage().name(), "hashed");
    }
}
