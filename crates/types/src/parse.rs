//! Parsing of user supplied hex strings and numeric quantities.
//!
//! Transaction fields arrive as text: byte strings as hex with an optional
//! `0x` prefix, quantities as decimal or `0x`-prefixed hex. Both are
//! rejected outright when malformed; nothing is silently truncated.

use alloy_primitives::U256;

use crate::{Error, Result};

/// Strip a leading `0x` or `0X`, if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string into bytes.
///
/// Surrounding whitespace and a `0x` prefix are ignored. The empty string
/// decodes to an empty vector.
///
/// # Errors
///
/// [`Error::MalformedHex`] on odd length or non-hex characters.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(s.trim());
    Ok(hex::decode(digits)?)
}

/// Decode a hex string that must be exactly `N` bytes long.
pub fn decode_hex_array<const N: usize>(s: &str) -> Result<[u8; N]> {
    let bytes = decode_hex(s)?;
    bytes.as_slice().try_into().map_err(|_| Error::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// Parse a numeric quantity.
///
/// Accepts decimal digits, or `0x`-prefixed hex digits. An empty string is
/// zero, matching how Ethereum tooling treats blank value fields.
///
/// # Errors
///
/// [`Error::MalformedQuantity`] for anything else, including values that do
/// not fit in 256 bits. `field` names the input in the error message.
pub fn parse_quantity(field: &'static str, s: &str) -> Result<U256> {
    let trimmed = s.trim();
    let malformed = || Error::MalformedQuantity {
        field,
        value: s.to_string(),
    };

    if trimmed.is_empty() {
        return Ok(U256::ZERO);
    }

    if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        return U256::from_str_radix(digits, 16).map_err(|_| malformed());
    }

    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    U256::from_str_radix(trimmed, 10).map_err(|_| malformed())
}

/// Minimal big-endian encoding of a quantity: no leading zero bytes, and
/// zero becomes the empty byte string.
pub fn quantity_bytes(value: &U256) -> Vec<u8> {
    let bytes = value.to_be_bytes::<32>();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

/// Inverse of [`quantity_bytes`]. Rejects leading zero bytes and inputs
/// longer than 32 bytes.
pub fn quantity_from_bytes(bytes: &[u8]) -> Result<U256> {
    if bytes.len() > 32 {
        return Err(Error::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        });
    }
    if bytes.first() == Some(&0) {
        return Err(Error::InvalidTransaction(
            "integer encoded with leading zero byte".into(),
        ));
    }
    Ok(U256::from_be_slice(bytes))
}
