//! # Bech32 / Bech32m
//!
//! BIP-173 Bech32 strings and BIP-350 Bech32m, plus the SegWit address
//! layer on top of them.
//!
//! A Bech32 string is `hrp ‖ "1" ‖ data ‖ checksum`, where `data` and the
//! six-symbol checksum are 5-bit words mapped through [`CHARSET`]. The
//! checksum is a BCH code over `hrp_expand(hrp) ‖ data`; the two variants
//! differ only in the constant the polymod residue is XORed with.
//!
//! SegWit addresses carry the witness version as the first data word and
//! the witness program regrouped from 8-bit to 5-bit words. Version 0 uses
//! Bech32, versions 1 through 16 use Bech32m.
//!
//! ## Example
//!
//! ```rust
//! use chainkit_types::bech32;
//!
//! let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
//! let address = bech32::segwit_encode("bc", 0, &program).unwrap();
//! assert_eq!(address, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
//!
//! let (version, decoded) = bech32::segwit_decode("bc", &address).unwrap();
//! assert_eq!((version, decoded), (0, program));
//! ```

use crate::{Error, Result};

/// The 32-character data alphabet.
pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Maximum length of a complete Bech32 string.
pub const MAX_LENGTH: usize = 90;

/// Number of 5-bit checksum words.
pub const CHECKSUM_LENGTH: usize = 6;

/// Highest SegWit witness version.
pub const MAX_WITNESS_VERSION: u8 = 16;

const GENERATORS: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

const BECH32_CONST: u32 = 1;
const BECH32M_CONST: u32 = 0x2bc8_30a3;

/// Checksum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// BIP-173, used for witness version 0 and plain Bech32 payloads
    Bech32,
    /// BIP-350, used for witness versions 1 through 16
    Bech32m,
}

impl Variant {
    const fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => BECH32_CONST,
            Variant::Bech32m => BECH32M_CONST,
        }
    }

    fn from_residue(residue: u32) -> Option<Self> {
        match residue {
            BECH32_CONST => Some(Variant::Bech32),
            BECH32M_CONST => Some(Variant::Bech32m),
            _ => None,
        }
    }

    /// The variant a witness version must be encoded with.
    pub const fn for_witness_version(version: u8) -> Self {
        if version == 0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        }
    }
}

/// Regroup a bit string from `from`-bit words into `to`-bit words,
/// most significant bit first.
///
/// With `pad`, a trailing partial group is zero-filled. Without it, leftover
/// bits must be fewer than `from` and all zero.
///
/// # Errors
///
/// [`Error::InvalidBitGroup`] when a value does not fit in `from` bits or
/// when unpadded conversion leaves a non-zero remainder.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>> {
    debug_assert!((1..=8).contains(&from) && (1..=8).contains(&to));

    let max_value: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let value = value as u32;
        if value >> from != 0 {
            return Err(Error::InvalidBitGroup(format!(
                "value {value} does not fit in {from} bits"
            )));
        }
        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from {
        return Err(Error::InvalidBitGroup(format!(
            "{bits} leftover bits exceed a {from}-bit group"
        )));
    } else if (acc << (to - bits)) & max_value != 0 {
        return Err(Error::InvalidBitGroup("non-zero padding".into()));
    }

    Ok(out)
}

/// The BCH checksum polynomial over GF(32).
pub fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ value as u32;
        for (i, generator) in GENERATORS.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

/// High three bits of each HRP character, a zero separator, then the low
/// five bits of each character.
pub fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn create_checksum(hrp: &str, data: &[u8], variant: Variant) -> [u8; CHECKSUM_LENGTH] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LENGTH]);
    let residue = polymod(values) ^ variant.constant();

    let mut checksum = [0u8; CHECKSUM_LENGTH];
    for (i, word) in checksum.iter_mut().enumerate() {
        *word = ((residue >> (5 * (5 - i))) & 0x1f) as u8;
    }
    checksum
}

/// Validate an HRP and return its lowercase form.
fn normalize_hrp(hrp: &str) -> Result<String> {
    if hrp.is_empty() || hrp.len() > 83 {
        return Err(Error::InvalidHrp(format!("length {} outside 1..=83", hrp.len())));
    }
    if let Some(c) = hrp.chars().find(|c| !matches!(*c as u32, 33..=126)) {
        return Err(Error::InvalidHrp(format!("character {c:?} is not printable ASCII")));
    }
    let has_lower = hrp.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hrp.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(Error::InvalidHrp(format!("{hrp:?} mixes upper and lower case")));
    }
    Ok(hrp.to_ascii_lowercase())
}

/// Encode 5-bit `words` under `hrp`.
///
/// The output is always lowercase.
///
/// # Errors
///
/// [`Error::InvalidHrp`], [`Error::InvalidBitGroup`] if any word exceeds
/// 31, or [`Error::InvalidEncodedLength`] past [`MAX_LENGTH`].
pub fn encode(hrp: &str, words: &[u8], variant: Variant) -> Result<String> {
    let hrp = normalize_hrp(hrp)?;
    if let Some(word) = words.iter().find(|&&w| w > 31) {
        return Err(Error::InvalidBitGroup(format!("word {word} exceeds 5 bits")));
    }

    let length = hrp.len() + 1 + words.len() + CHECKSUM_LENGTH;
    if length > MAX_LENGTH {
        return Err(Error::InvalidEncodedLength(length));
    }

    let checksum = create_checksum(&hrp, words, variant);
    let mut out = String::with_capacity(length);
    out.push_str(&hrp);
    out.push('1');
    out.extend(
        words
            .iter()
            .chain(checksum.iter())
            .map(|&w| CHARSET[w as usize] as char),
    );
    Ok(out)
}

/// Decode a Bech32 or Bech32m string into `(hrp, words, variant)`.
///
/// The returned HRP is lowercase and `words` excludes the checksum.
pub fn decode(s: &str) -> Result<(String, Vec<u8>, Variant)> {
    if s.len() < 8 || s.len() > MAX_LENGTH {
        return Err(Error::InvalidEncodedLength(s.len()));
    }
    let has_lower = s.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = s.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(Error::MixedCase);
    }
    let s = s.to_ascii_lowercase();

    let separator = s.rfind('1').ok_or(Error::InvalidCharacter('1'))?;
    let (hrp, rest) = s.split_at(separator);
    let data_part = &rest[1..];
    let hrp = normalize_hrp(hrp)?;
    if data_part.len() < CHECKSUM_LENGTH {
        return Err(Error::InvalidEncodedLength(s.len()));
    }

    let mut words = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let value = CHARSET
            .iter()
            .position(|&x| c.is_ascii() && x == c as u8)
            .ok_or(Error::InvalidCharacter(c))?;
        words.push(value as u8);
    }

    let mut values = hrp_expand(&hrp);
    values.extend_from_slice(&words);
    let variant = Variant::from_residue(polymod(values)).ok_or(Error::InvalidChecksum("bech32"))?;

    words.truncate(words.len() - CHECKSUM_LENGTH);
    Ok((hrp, words, variant))
}

fn check_program(version: u8, length: usize) -> Result<()> {
    if !(2..=40).contains(&length) || (version == 0 && length != 20 && length != 32) {
        return Err(Error::InvalidProgramLength { version, length });
    }
    Ok(())
}

/// Encode a SegWit address.
///
/// # Errors
///
/// [`Error::InvalidWitnessVersion`] above 16,
/// [`Error::InvalidProgramLength`] outside 2..=40 bytes (20 or 32 for
/// version 0), or any [`encode`] error.
pub fn segwit_encode(hrp: &str, version: u8, program: &[u8]) -> Result<String> {
    if version > MAX_WITNESS_VERSION {
        return Err(Error::InvalidWitnessVersion(version));
    }
    check_program(version, program.len())?;

    let mut words = Vec::with_capacity(1 + (program.len() * 8).div_ceil(5));
    words.push(version);
    words.extend(convert_bits(program, 8, 5, true)?);
    encode(hrp, &words, Variant::for_witness_version(version))
}

/// Decode a SegWit address, requiring the given HRP.
///
/// Returns `(witness_version, program)`.
pub fn segwit_decode(hrp: &str, address: &str) -> Result<(u8, Vec<u8>)> {
    let expected = normalize_hrp(hrp)?;
    let (actual, words, variant) = decode(address)?;
    if actual != expected {
        return Err(Error::HrpMismatch { expected, actual });
    }

    let (&version, rest) = words
        .split_first()
        .ok_or(Error::InvalidProgramLength { version: 0, length: 0 })?;
    if version > MAX_WITNESS_VERSION || variant != Variant::for_witness_version(version) {
        return Err(Error::InvalidWitnessVersion(version));
    }

    let program = convert_bits(rest, 5, 8, false)?;
    check_program(version, program.len())?;
    Ok((version, program))
}
