//! Ethereum 20-byte address type.
//!
//! This module provides [`EthAddress`]:
//!
//! - derivation from a SEC1 uncompressed public key
//! - hex encoding/decoding with `0x` prefix
//! - EIP-55 mixed-case checksum encoding and verification
//! - serde serialization as checksummed hex strings

use chainkit_crypto::keccak256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::parse::strip_hex_prefix;
use crate::rlp::{Encodable, RlpItem};
use crate::{Error, Result};

/// Size of an Ethereum address in bytes
pub const ADDRESS_SIZE: usize = 20;

/// An Ethereum 20-byte address.
///
/// Displayed as 40 hex characters with a `0x` prefix and EIP-55 casing.
///
/// # Example
///
/// ```rust
/// use chainkit_types::EthAddress;
///
/// let addr: EthAddress = "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".parse().unwrap();
/// assert_eq!(addr.to_string(), "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EthAddress([u8; ADDRESS_SIZE]);

impl EthAddress {
    /// The zero address (0x0000000000000000000000000000000000000000)
    pub const ZERO: Self = Self([0u8; ADDRESS_SIZE]);

    /// Creates a new address from a 20-byte array.
    #[inline]
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice.
    ///
    /// Returns an error if the slice length is not exactly 20 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; ADDRESS_SIZE] = slice.try_into().map_err(|_| Error::InvalidLength {
            expected: ADDRESS_SIZE,
            actual: slice.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Returns the address as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a fixed-size byte array.
    #[inline]
    pub const fn as_fixed_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Checks if this is the zero address.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// Takes the last 20 bytes of a Keccak-256 digest.
    pub fn from_keccak_hash(hash: &[u8; 32]) -> Self {
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// Derives an address from a public key.
    ///
    /// Accepts the 65-byte SEC1 uncompressed encoding (leading `0x04`, which
    /// is stripped before hashing) or the bare 64-byte `X ‖ Y`.
    pub fn from_public_key(pubkey: &[u8]) -> Result<Self> {
        let xy = match pubkey {
            [0x04, rest @ ..] if rest.len() == 64 => rest,
            _ if pubkey.len() == 64 => pubkey,
            _ => {
                return Err(Error::InvalidLength {
                    expected: 65,
                    actual: pubkey.len(),
                })
            }
        };
        Ok(Self::from_keccak_hash(&keccak256(xy)))
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Computes the EIP-55 checksum encoding of this address.
    ///
    /// The lowercase hex string (not the raw bytes) is hashed with
    /// Keccak-256; each letter is uppercased iff the matching hash nibble is
    /// 8 or more.
    pub fn to_checksum_string(&self) -> String {
        let hex_addr = self.to_hex();
        let hash = keccak256(hex_addr.as_bytes());

        let mut result = String::with_capacity(42);
        result.push_str("0x");

        for (i, c) in hex_addr.chars().enumerate() {
            let hash_byte = hash[i / 2];
            let hash_nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0F
            };

            if c.is_ascii_alphabetic() && hash_nibble >= 8 {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Creates an address from its hex representation, ignoring case.
    ///
    /// The input can optionally have a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = strip_hex_prefix(s.trim());
        if digits.len() != ADDRESS_SIZE * 2 {
            return Err(Error::InvalidLength {
                expected: ADDRESS_SIZE,
                actual: digits.len() / 2,
            });
        }
        let bytes = hex::decode(digits)?;
        Self::from_slice(&bytes)
    }

    /// Parses an address and, when it is mixed case, verifies its EIP-55
    /// checksum.
    ///
    /// All-lowercase and all-uppercase inputs carry no checksum and are
    /// accepted as-is.
    pub fn from_checksummed(s: &str) -> Result<Self> {
        let address = Self::from_hex(s)?;
        let digits = strip_hex_prefix(s.trim());
        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum_string()[2..] != *digits {
            return Err(Error::InvalidChecksum("EIP-55"));
        }
        Ok(address)
    }

    /// Whether `s` is a well-formed address whose casing, if mixed, matches
    /// EIP-55.
    pub fn is_valid_checksum(s: &str) -> bool {
        Self::from_checksummed(s).is_ok()
    }
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({})", self.to_checksum_string())
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum_string())
    }
}

impl fmt::LowerHex for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        f.write_str(&self.to_hex())
    }
}

impl FromStr for EthAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_checksummed(s)
    }
}

impl From<[u8; ADDRESS_SIZE]> for EthAddress {
    fn from(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<EthAddress> for [u8; ADDRESS_SIZE] {
    fn from(addr: EthAddress) -> Self {
        addr.0
    }
}

impl AsRef<[u8]> for EthAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<alloy_primitives::Address> for EthAddress {
    fn from(addr: alloy_primitives::Address) -> Self {
        Self(addr.into_array())
    }
}

impl From<EthAddress> for alloy_primitives::Address {
    fn from(addr: EthAddress) -> Self {
        alloy_primitives::Address::from(addr.0)
    }
}

impl Serialize for EthAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_checksummed(&s).map_err(serde::de::Error::custom)
    }
}

impl Encodable for EthAddress {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::bytes(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_hex() {
        let addr = EthAddress::from_hex("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap();
        assert!(!addr.is_zero());

        // Without 0x prefix
        let addr2 = EthAddress::from_hex("7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
        assert_eq!(addr, addr2);
    }

    #[test]
    fn test_zero_address_checksum_is_lowercase() {
        assert_eq!(
            EthAddress::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_eip55_vectors() {
        // From the EIP-55 reference list.
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let addr = EthAddress::from_hex(&expected.to_lowercase()).unwrap();
            assert_eq!(addr.to_checksum_string(), expected);
            assert!(EthAddress::is_valid_checksum(expected));
        }
    }

    #[test]
    fn test_checksum_rejects_wrong_case() {
        assert!(EthAddress::is_valid_checksum("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(EthAddress::is_valid_checksum("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"));
        assert_eq!(
            EthAddress::from_checksummed("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"),
            Err(Error::InvalidChecksum("EIP-55"))
        );
    }

    #[test]
    fn test_from_public_key_accepts_prefixed_and_bare() {
        let mut pubkey = [0x11u8; 65];
        pubkey[0] = 0x04;
        let a = EthAddress::from_public_key(&pubkey).unwrap();
        let b = EthAddress::from_public_key(&pubkey[1..]).unwrap();
        assert_eq!(a, b);
        assert!(EthAddress::from_public_key(&pubkey[..33]).is_err());
    }

    #[test]
    fn test_address_serde() {
        let addr = EthAddress::from_hex("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf\"");
        let decoded: EthAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, decoded);
    }

    #[test]
    fn test_invalid_address() {
        // Too short
        assert!(EthAddress::from_hex("0x1234").is_err());
        // Too long
        assert!(EthAddress::from_hex("0x7e5f4552091a69125d5dfcb7b8c2659029395bdfff").is_err());
        // Invalid hex
        assert!(matches!(
            EthAddress::from_hex("0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG"),
            Err(Error::MalformedHex(_))
        ));
    }

    #[test]
    fn test_rlp_encoding() {
        let addr = EthAddress::new([0x35; 20]);
        let encoded = addr.rlp_bytes();
        assert_eq!(encoded[0], 0x94);
        assert_eq!(&encoded[1..], &[0x35; 20]);
    }
}
