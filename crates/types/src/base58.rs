//! Base58 and Base58Check encoding.
//!
//! Base58Check frames a one-byte version and a payload with the first four
//! bytes of `SHA256(SHA256(version ‖ payload))`. Leading zero bytes map to
//! leading `'1'` characters, which is how the length of zero-prefixed data
//! survives the conversion to a big-endian base-58 numeral.

use chainkit_crypto::double_sha256;

use crate::{Error, Result};

/// Bitcoin's base-58 alphabet: no `0`, `O`, `I` or `l`.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of the Base58Check checksum in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Encode bytes as a base-58 string.
pub fn encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits of the big-endian input.
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode a base-58 string.
///
/// # Errors
///
/// [`Error::InvalidCharacter`] for anything outside [`ALPHABET`].
pub fn decode(s: &str) -> Result<Vec<u8>> {
    let zeros = s.chars().take_while(|&c| c == '1').count();

    let mut bytes: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.chars().skip(zeros) {
        let value = digit_value(c).ok_or(Error::InvalidCharacter(c))?;
        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

/// Encode `version ‖ payload` with a four-byte double-SHA256 checksum.
///
/// # Example
///
/// ```rust
/// use chainkit_types::base58;
///
/// let hash160 = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
/// assert_eq!(base58::check_encode(0x00, &hash160), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
/// ```
pub fn check_encode(version: u8, payload: &[u8]) -> String {
    let mut body = Vec::with_capacity(1 + payload.len() + CHECKSUM_SIZE);
    body.push(version);
    body.extend_from_slice(payload);
    let checksum = double_sha256(&body);
    body.extend_from_slice(&checksum[..CHECKSUM_SIZE]);
    encode(&body)
}

/// Decode a Base58Check string into `(version, payload)`.
///
/// # Errors
///
/// [`Error::InvalidCharacter`], [`Error::InvalidEncodedLength`] when fewer
/// than five bytes decode, or [`Error::InvalidChecksum`].
pub fn check_decode(s: &str) -> Result<(u8, Vec<u8>)> {
    let bytes = decode(s)?;
    if bytes.len() < 1 + CHECKSUM_SIZE {
        return Err(Error::InvalidEncodedLength(bytes.len()));
    }

    let (body, checksum) = bytes.split_at(bytes.len() - CHECKSUM_SIZE);
    if double_sha256(body)[..CHECKSUM_SIZE] != *checksum {
        return Err(Error::InvalidChecksum("base58check"));
    }
    Ok((body[0], body[1..].to_vec()))
}

fn digit_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&a| a == c as u8)
        .map(|p| p as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty_and_zeros() {
        assert_eq!(encode(&[]), "");
        assert_eq!(encode(&[0]), "1");
        assert_eq!(encode(&[0, 0, 0]), "111");
        assert_eq!(decode("111").unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_encode_known_vectors() {
        assert_eq!(encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(encode(&[0x00, 0x00, 0x28, 0x7f, 0xb4, 0xcd]), "11233QC4");
        assert_eq!(decode("StV1DL6CwTryKyV").unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_rejects_invalid_characters() {
        for bad in ["0", "O", "I", "l", "ü", "abc+"] {
            assert!(matches!(decode(bad), Err(Error::InvalidCharacter(_))), "{bad}");
        }
    }

    #[test]
    fn test_check_encode_all_zero_payload() {
        assert_eq!(check_encode(0x00, &[0u8; 20]), "1111111111111111111114oLvT2");
    }

    #[test]
    fn test_check_round_trip_keeps_leading_zeros() {
        let payload = [0u8, 0, 1, 2, 3];
        let encoded = check_encode(0x00, &payload);
        assert_eq!(check_decode(&encoded).unwrap(), (0x00, payload.to_vec()));
    }

    #[test]
    fn test_check_decode_detects_corruption() {
        let encoded = check_encode(0x05, &[0xab; 20]);
        let mut chars: Vec<char> = encoded.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '2' { '3' } else { '2' };
        let corrupted: String = chars.into_iter().collect();
        assert_eq!(
            check_decode(&corrupted),
            Err(Error::InvalidChecksum("base58check"))
        );
    }

    #[test]
    fn test_check_decode_too_short() {
        assert!(matches!(check_decode("1"), Err(Error::InvalidEncodedLength(1))));
    }
}
