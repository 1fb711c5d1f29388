//! Legacy (pre-EIP-2718) transactions with EIP-155 replay protection.
//!
//! This module provides:
//! - [`TxFields`] - the textual form a user supplies, one string per field
//! - [`LegacyTransaction`] - parsed, typed fields
//! - [`Signature`] - `(v, r, s)` with `v = recovery_id + 35 + 2 * chain_id`
//! - [`SignedLegacyTransaction`] - a transaction with its signature, encodable
//!   to the raw `0x…` form nodes accept

use alloy_primitives::U256;
use bytes::Bytes;
use chainkit_crypto::{keccak256, RecoverableSignature};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::parse::{decode_hex, parse_quantity, quantity_bytes, quantity_from_bytes};
use crate::rlp::{self, RlpItem};
use crate::{EthAddress, Error, Result};

/// Offset added to `2 * chain_id + recovery_id` to form an EIP-155 `v`.
pub const EIP155_V_OFFSET: u64 = 35;

/// Transaction fields as entered by a user.
///
/// Quantities are decimal or `0x` hex (an empty string is zero), `to` is 20
/// bytes of hex or empty for contract creation, and `data` is hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxFields {
    /// Sender nonce
    pub nonce: String,
    /// Price per unit of gas, in wei
    pub gas_price: String,
    /// Gas limit
    pub gas_limit: String,
    /// Recipient, empty for contract creation
    pub to: String,
    /// Value transferred, in wei
    pub value: String,
    /// Call data or init code
    pub data: String,
    /// EIP-155 chain id
    pub chain_id: String,
}

impl Default for TxFields {
    fn default() -> Self {
        Self {
            nonce: "0".into(),
            gas_price: "0".into(),
            gas_limit: "21000".into(),
            to: String::new(),
            value: "0".into(),
            data: String::new(),
            chain_id: "1".into(),
        }
    }
}

impl TxFields {
    /// Parse every field.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedQuantity`] for a numeric field that is neither
    /// decimal nor hex, [`Error::MalformedHex`] for bad `to`/`data` hex,
    /// [`Error::InvalidLength`] when `to` is neither empty nor 20 bytes, and
    /// [`Error::InvalidChecksum`] for a mixed-case `to` failing EIP-55.
    pub fn parse(&self) -> Result<LegacyTransaction> {
        let to_bytes = decode_hex(&self.to)?;
        let to = match to_bytes.len() {
            0 => None,
            20 => Some(EthAddress::from_checksummed(&self.to)?),
            actual => return Err(Error::InvalidLength { expected: 20, actual }),
        };

        Ok(LegacyTransaction {
            nonce: parse_quantity("nonce", &self.nonce)?,
            gas_price: parse_quantity("gasPrice", &self.gas_price)?,
            gas_limit: parse_quantity("gasLimit", &self.gas_limit)?,
            to,
            value: parse_quantity("value", &self.value)?,
            data: Bytes::from(decode_hex(&self.data)?),
            chain_id: parse_quantity("chainId", &self.chain_id)?,
        })
    }
}

impl From<&LegacyTransaction> for TxFields {
    fn from(tx: &LegacyTransaction) -> Self {
        Self {
            nonce: tx.nonce.to_string(),
            gas_price: tx.gas_price.to_string(),
            gas_limit: tx.gas_limit.to_string(),
            to: tx.to.map(|a| a.to_checksum_string()).unwrap_or_default(),
            value: tx.value.to_string(),
            data: format!("0x{}", hex::encode(&tx.data)),
            chain_id: tx.chain_id.to_string(),
        }
    }
}

/// A legacy transaction with typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    /// Sender nonce
    pub nonce: U256,
    /// Price per unit of gas, in wei
    pub gas_price: U256,
    /// Gas limit
    pub gas_limit: U256,
    /// Recipient, `None` for contract creation
    pub to: Option<EthAddress>,
    /// Value transferred, in wei
    pub value: U256,
    /// Call data or init code
    pub data: Bytes,
    /// EIP-155 chain id
    pub chain_id: U256,
}

impl Default for LegacyTransaction {
    fn default() -> Self {
        Self {
            nonce: U256::ZERO,
            gas_price: U256::ZERO,
            gas_limit: U256::from(21_000u64),
            to: None,
            value: U256::ZERO,
            data: Bytes::new(),
            chain_id: U256::from(1u64),
        }
    }
}

impl LegacyTransaction {
    /// Returns true if this is a contract creation transaction.
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }

    /// `[nonce, gasPrice, gasLimit, to, value, data]`
    fn base_fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::uint(self.nonce),
            RlpItem::uint(self.gas_price),
            RlpItem::uint(self.gas_limit),
            match &self.to {
                Some(addr) => RlpItem::bytes(*addr.as_fixed_bytes()),
                None => RlpItem::empty(),
            },
            RlpItem::uint(self.value),
            RlpItem::bytes(self.data.to_vec()),
        ]
    }

    /// RLP of `[nonce, gasPrice, gasLimit, to, value, data, chainId, "", ""]`.
    pub fn unsigned_rlp(&self) -> Vec<u8> {
        let mut fields = self.base_fields();
        fields.push(RlpItem::uint(self.chain_id));
        fields.push(RlpItem::empty());
        fields.push(RlpItem::empty());
        rlp::encode_list(&fields)
    }

    /// Keccak-256 of [`unsigned_rlp`](Self::unsigned_rlp), the digest that
    /// gets signed.
    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(&self.unsigned_rlp())
    }

    /// `recovery_id + 35 + 2 * chain_id`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransaction`] if the recovery id is not 0 or 1 or the
    /// result overflows 256 bits.
    pub fn eip155_v(&self, recovery_id: u8) -> Result<U256> {
        if recovery_id > 1 {
            return Err(Error::InvalidTransaction(format!(
                "recovery id {recovery_id} is not 0 or 1"
            )));
        }
        self.chain_id
            .checked_mul(U256::from(2u64))
            .and_then(|v| v.checked_add(U256::from(EIP155_V_OFFSET + recovery_id as u64)))
            .ok_or_else(|| Error::InvalidTransaction("chain id too large for EIP-155".into()))
    }

    /// Attach a signature produced over [`signing_hash`](Self::signing_hash).
    pub fn into_signed(self, signature: &RecoverableSignature) -> Result<SignedLegacyTransaction> {
        let v = self.eip155_v(signature.recovery_id)?;
        Ok(SignedLegacyTransaction {
            transaction: self,
            signature: Signature::new(v, signature.r, signature.s),
        })
    }
}

/// ECDSA signature components as carried by a legacy transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    /// `recovery_id + 35 + 2 * chain_id`
    pub v: U256,
    /// R component (32 bytes, big-endian)
    pub r: [u8; 32],
    /// S component (32 bytes, big-endian)
    pub s: [u8; 32],
}

impl Signature {
    /// Creates a new signature from components.
    pub const fn new(v: U256, r: [u8; 32], s: [u8; 32]) -> Self {
        Self { v, r, s }
    }

    fn eip155_parts(&self) -> Result<(U256, u8)> {
        let offset = U256::from(EIP155_V_OFFSET);
        if self.v < offset {
            return Err(Error::InvalidTransaction(format!(
                "v = {} is not an EIP-155 value",
                self.v
            )));
        }
        let rest = self.v - offset;
        let recovery_id = if rest.bit(0) { 1 } else { 0 };
        Ok((rest >> 1usize, recovery_id))
    }

    /// Chain id encoded in `v`.
    pub fn chain_id(&self) -> Result<U256> {
        self.eip155_parts().map(|(chain_id, _)| chain_id)
    }

    /// Recovery id (0 or 1) encoded in `v`.
    pub fn recovery_id(&self) -> Result<u8> {
        self.eip155_parts().map(|(_, recovery_id)| recovery_id)
    }

    /// Convert back to the signer's representation.
    pub fn to_recoverable(&self) -> Result<RecoverableSignature> {
        Ok(RecoverableSignature::new(self.r, self.s, self.recovery_id()?))
    }
}

/// A signed legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLegacyTransaction {
    /// The transaction data
    pub transaction: LegacyTransaction,
    /// The signature
    pub signature: Signature,
}

impl SignedLegacyTransaction {
    /// Pair a transaction with a signature, checking that `v` commits to the
    /// transaction's chain id.
    pub fn new(transaction: LegacyTransaction, signature: Signature) -> Result<Self> {
        let chain_id = signature.chain_id()?;
        if chain_id != transaction.chain_id {
            return Err(Error::InvalidTransaction(format!(
                "signature is for chain {chain_id}, transaction for chain {}",
                transaction.chain_id
            )));
        }
        Ok(Self {
            transaction,
            signature,
        })
    }

    /// RLP of `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`.
    ///
    /// `r` and `s` are integers, so leading zero bytes are dropped.
    pub fn rlp(&self) -> Vec<u8> {
        let mut fields = self.transaction.base_fields();
        fields.push(RlpItem::uint(self.signature.v));
        fields.push(RlpItem::bytes(quantity_bytes(&U256::from_be_bytes(self.signature.r))));
        fields.push(RlpItem::bytes(quantity_bytes(&U256::from_be_bytes(self.signature.s))));
        rlp::encode_list(&fields)
    }

    /// `0x`-prefixed hex of [`rlp`](Self::rlp), ready for `eth_sendRawTransaction`.
    pub fn raw(&self) -> String {
        format!("0x{}", hex::encode(self.rlp()))
    }

    /// Transaction hash: Keccak-256 of the signed RLP.
    pub fn hash(&self) -> [u8; 32] {
        keccak256(&self.rlp())
    }

    /// Recovers the sender address from the signature.
    pub fn recover_sender(&self) -> Result<EthAddress> {
        let signing_hash = self.transaction.signing_hash();
        let public_key = self
            .signature
            .to_recoverable()?
            .recover_uncompressed(&signing_hash)?;
        EthAddress::from_public_key(&public_key)
    }

    /// Decodes a raw signed legacy transaction (`0x` prefix optional).
    ///
    /// Only EIP-155 signatures are accepted; the chain id is read from `v`.
    pub fn decode_raw(raw: &str) -> Result<Self> {
        let bytes = decode_hex(raw)?;
        let item = rlp::decode(&bytes)?;
        let fields = item
            .as_list()
            .ok_or_else(|| Error::InvalidTransaction("expected an RLP list".into()))?;
        if fields.len() != 9 {
            return Err(Error::InvalidTransaction(format!(
                "expected 9 fields, got {}",
                fields.len()
            )));
        }

        let mut values = Vec::with_capacity(9);
        for field in fields {
            let value = field
                .as_bytes()
                .ok_or_else(|| Error::InvalidTransaction("nested list in transaction".into()))?;
            values.push(value);
        }

        let to = match values[3].len() {
            0 => None,
            _ => Some(EthAddress::from_slice(values[3])?),
        };
        let signature = Signature::new(
            quantity_from_bytes(values[6])?,
            quantity_from_bytes(values[7])?.to_be_bytes::<32>(),
            quantity_from_bytes(values[8])?.to_be_bytes::<32>(),
        );

        let transaction = LegacyTransaction {
            nonce: quantity_from_bytes(values[0])?,
            gas_price: quantity_from_bytes(values[1])?,
            gas_limit: quantity_from_bytes(values[2])?,
            to,
            value: quantity_from_bytes(values[4])?,
            data: Bytes::copy_from_slice(values[5]),
            chain_id: signature.chain_id()?,
        };

        trace!(nonce = %transaction.nonce, chain_id = %transaction.chain_id, "decoded raw legacy transaction");
        Self::new(transaction, signature)
    }
}

impl fmt::Display for SignedLegacyTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tx {{ hash: 0x{}, nonce: {}, to: {}, value: {} }}",
            hex::encode(self.hash()),
            self.transaction.nonce,
            self.transaction
                .to
                .map(|a| a.to_string())
                .unwrap_or_else(|| "CREATE".to_string()),
            self.transaction.value
        )
    }
}
