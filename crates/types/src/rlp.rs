//! # Recursive Length Prefix
//!
//! Ethereum's serialization for byte strings and nested lists.
//!
//! ## Encoding Rules
//!
//! - a single byte below `0x80` is its own encoding
//! - a byte string of length < 56 is prefixed with `0x80 + len`
//! - a longer byte string is prefixed with `0xb7 + len(len)` and the
//!   big-endian length
//! - lists use the same scheme with `0xc0` / `0xf7` over the concatenated
//!   encodings of their items
//!
//! Integers are encoded as their minimal big-endian bytes, so zero is the
//! empty string (`0x80`).
//!
//! [`decode`] is strict: it accepts only the canonical encoding of an item
//! and rejects trailing bytes. Lists may nest at most [`MAX_DEPTH`] deep.

use alloy_primitives::U256;

use crate::parse::quantity_bytes;

/// An RLP item: a byte string or a list of items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RlpItem {
    /// A byte string
    Bytes(Vec<u8>),
    /// A list of items
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// The empty byte string.
    pub const fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    /// A byte string item.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        RlpItem::Bytes(bytes.into())
    }

    /// An integer, as its minimal big-endian bytes.
    pub fn uint(value: U256) -> Self {
        RlpItem::Bytes(quantity_bytes(&value))
    }

    /// A list item.
    pub fn list(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }

    /// The byte payload, if this is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpItem::Bytes(bytes) => Some(bytes),
            RlpItem::List(_) => None,
        }
    }

    /// The items, if this is a list.
    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            RlpItem::List(items) => Some(items),
            RlpItem::Bytes(_) => None,
        }
    }

    /// Encode this item.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        append(self, &mut out);
        out
    }
}

/// Types with an RLP representation.
pub trait Encodable {
    /// Convert to an [`RlpItem`].
    fn to_rlp(&self) -> RlpItem;

    /// Encode to bytes.
    fn rlp_bytes(&self) -> Vec<u8> {
        self.to_rlp().encode()
    }
}

impl Encodable for RlpItem {
    fn to_rlp(&self) -> RlpItem {
        self.clone()
    }
}

impl Encodable for [u8] {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::bytes(self)
    }
}

impl Encodable for Vec<u8> {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::bytes(self.as_slice())
    }
}

impl Encodable for str {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::bytes(self.as_bytes())
    }
}

impl Encodable for U256 {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::uint(*self)
    }
}

impl Encodable for u64 {
    fn to_rlp(&self) -> RlpItem {
        RlpItem::uint(U256::from(*self))
    }
}

/// Encode an item.
pub fn encode(item: &RlpItem) -> Vec<u8> {
    item.encode()
}

/// Encode a byte string.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 9);
    append_bytes(bytes, &mut out);
    out
}

/// Encode a list of items.
pub fn encode_list(items: &[RlpItem]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        append(item, &mut payload);
    }
    let mut out = Vec::with_capacity(payload.len() + 9);
    append_header(payload.len(), 0xc0, &mut out);
    out.extend_from_slice(&payload);
    out
}

/// Encode an integer.
pub fn encode_uint(value: U256) -> Vec<u8> {
    encode_bytes(&quantity_bytes(&value))
}

fn append(item: &RlpItem, out: &mut Vec<u8>) {
    match item {
        RlpItem::Bytes(bytes) => append_bytes(bytes, out),
        RlpItem::List(items) => out.extend_from_slice(&encode_list(items)),
    }
}

fn append_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    if let [single] = bytes {
        if *single < 0x80 {
            out.push(*single);
            return;
        }
    }
    append_header(bytes.len(), 0x80, out);
    out.extend_from_slice(bytes);
}

/// `offset` is `0x80` for strings and `0xc0` for lists.
fn append_header(len: usize, offset: u8, out: &mut Vec<u8>) {
    if len < 56 {
        out.push(offset + len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let first = len_bytes.iter().position(|&b| b != 0).unwrap_or(len_bytes.len() - 1);
        let len_bytes = &len_bytes[first..];
        out.push(offset + 55 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
}

/// Deepest list nesting [`decode`] accepts.
pub const MAX_DEPTH: usize = 1024;

/// RLP decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RlpError {
    /// Input ended before the item did
    #[error("input too short")]
    Truncated,

    /// Bytes remained after the top-level item
    #[error("{0} trailing bytes after item")]
    TrailingBytes(usize),

    /// A shorter encoding of the same item exists
    #[error("non-canonical encoding: {0}")]
    NonCanonical(&'static str),

    /// A length prefix does not fit in memory
    #[error("length overflow")]
    Overflow,

    /// Lists nest deeper than [`MAX_DEPTH`]
    #[error("lists nested deeper than {0}")]
    TooDeep(usize),
}

/// Decode exactly one item from `data`.
///
/// # Errors
///
/// [`RlpError`] on truncation, trailing bytes or non-canonical prefixes, and
/// [`RlpError::TooDeep`] past [`MAX_DEPTH`] nested lists.
pub fn decode(data: &[u8]) -> Result<RlpItem, RlpError> {
    let (item, consumed) = decode_item(data, 0)?;
    if consumed != data.len() {
        return Err(RlpError::TrailingBytes(data.len() - consumed));
    }
    Ok(item)
}

/// Decode one item from the front of `data`, returning it and the number of
/// bytes it occupied. `depth` counts the enclosing lists.
fn decode_item(data: &[u8], depth: usize) -> Result<(RlpItem, usize), RlpError> {
    let prefix = *data.first().ok_or(RlpError::Truncated)?;
    match prefix {
        0x00..=0x7f => Ok((RlpItem::Bytes(vec![prefix]), 1)),
        0x80..=0xbf => {
            let (start, len) = read_header(data, 0x80)?;
            let payload = slice(data, start, len)?;
            if len == 1 && payload[0] < 0x80 {
                return Err(RlpError::NonCanonical("single byte below 0x80 with prefix"));
            }
            Ok((RlpItem::Bytes(payload.to_vec()), start + len))
        }
        0xc0..=0xff => {
            if depth == MAX_DEPTH {
                return Err(RlpError::TooDeep(MAX_DEPTH));
            }
            let (start, len) = read_header(data, 0xc0)?;
            let mut payload = slice(data, start, len)?;
            let mut items = Vec::new();
            while !payload.is_empty() {
                let (item, used) = decode_item(payload, depth + 1)?;
                items.push(item);
                payload = &payload[used..];
            }
            Ok((RlpItem::List(items), start + len))
        }
    }
}

/// Returns `(payload_offset, payload_length)`.
fn read_header(data: &[u8], offset: u8) -> Result<(usize, usize), RlpError> {
    let short = data[0] - offset;
    if short < 56 {
        return Ok((1, short as usize));
    }

    let len_of_len = (short - 55) as usize;
    let len_bytes = slice(data, 1, len_of_len)?;
    if len_bytes[0] == 0 {
        return Err(RlpError::NonCanonical("length has leading zero"));
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::Overflow);
    }
    let len = len_bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
    if len < 56 {
        return Err(RlpError::NonCanonical("long form used for short payload"));
    }
    Ok((1 + len_of_len, len))
}

fn slice(data: &[u8], start: usize, len: usize) -> Result<&[u8], RlpError> {
    let end = start.checked_add(len).ok_or(RlpError::Overflow)?;
    data.get(start..end).ok_or(RlpError::Truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_single_bytes() {
        assert_eq!(encode_bytes(&[0x00]), vec![0x00]);
        assert_eq!(encode_bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(encode_bytes(&[0x80]), vec![0x81, 0x80]);
        assert_eq!(encode_bytes(&[]), vec![0x80]);
    }

    #[test]
    fn test_encode_integers() {
        assert_eq!(encode_uint(U256::ZERO), vec![0x80]);
        assert_eq!(encode_uint(U256::from(15u64)), vec![0x0f]);
        assert_eq!(encode_uint(U256::from(1024u64)), vec![0x82, 0x04, 0x00]);
        assert_eq!(0u64.rlp_bytes(), vec![0x80]);
    }

    #[test]
    fn test_encode_strings_and_lists() {
        assert_eq!(hex::encode("dog".rlp_bytes()), "83646f67");
        let list = RlpItem::list(vec![RlpItem::bytes(*b"cat"), RlpItem::bytes(*b"dog")]);
        assert_eq!(hex::encode(list.encode()), "c88363617483646f67");
        assert_eq!(encode_list(&[]), vec![0xc0]);
    }

    #[test]
    fn test_encode_long_string() {
        let text = b"Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        assert_eq!(text.len(), 56);
        let encoded = encode_bytes(text);
        assert_eq!(&encoded[..2], &[0xb8, 0x38]);
        assert_eq!(&encoded[2..], text);
    }

    #[test]
    fn test_encode_nested_empty_lists() {
        // [ [], [[]], [ [], [[]] ] ]
        let empty = || RlpItem::list(vec![]);
        let item = RlpItem::list(vec![
            empty(),
            RlpItem::list(vec![empty()]),
            RlpItem::list(vec![empty(), RlpItem::list(vec![empty()])]),
        ]);
        assert_eq!(hex::encode(item.encode()), "c7c0c1c0c3c0c1c0");
    }

    #[test]
    fn test_decode_round_trip_nested() {
        let item = RlpItem::list(vec![
            RlpItem::bytes(vec![0xaa; 60]),
            RlpItem::list(vec![RlpItem::empty(), RlpItem::bytes([0x01u8])]),
        ]);
        assert_eq!(decode(&item.encode()).unwrap(), item);
    }

    #[test]
    fn test_decode_rejects_non_canonical() {
        assert!(matches!(decode(&[0x81, 0x05]), Err(RlpError::NonCanonical(_))));
        assert!(matches!(decode(&[0xb8, 0x02, 0x01, 0x02]), Err(RlpError::NonCanonical(_))));
        let mut padded_len = vec![0xb9, 0x00, 0x38];
        padded_len.extend_from_slice(&[0u8; 56]);
        assert!(matches!(decode(&padded_len), Err(RlpError::NonCanonical(_))));
    }

    #[test]
    fn test_decode_rejects_truncation_and_trailing() {
        assert_eq!(decode(&[]), Err(RlpError::Truncated));
        assert_eq!(decode(&[0x83, 0x01]), Err(RlpError::Truncated));
        assert_eq!(decode(&[0xc2, 0x01]), Err(RlpError::Truncated));
        assert_eq!(decode(&[0x01, 0x02]), Err(RlpError::TrailingBytes(1)));
    }

    /// `depth` lists, each holding only the next, innermost empty.
    fn nested_lists(depth: usize) -> Vec<u8> {
        let mut headers = Vec::with_capacity(depth);
        let mut payload_len = 0;
        for _ in 0..depth {
            let mut header = Vec::new();
            append_header(payload_len, 0xc0, &mut header);
            payload_len += header.len();
            headers.push(header);
        }
        headers.into_iter().rev().flatten().collect()
    }

    #[test]
    fn test_decode_depth_limit() {
        let mut item = decode(&nested_lists(MAX_DEPTH)).unwrap();
        let mut depth = 1;
        while let Some([inner]) = item.as_list() {
            item = inner.clone();
            depth += 1;
        }
        assert_eq!(depth, MAX_DEPTH);
        assert_eq!(item, RlpItem::list(vec![]));

        assert_eq!(
            decode(&nested_lists(MAX_DEPTH + 1)),
            Err(RlpError::TooDeep(MAX_DEPTH))
        );
        assert_eq!(
            decode(&nested_lists(200_000)),
            Err(RlpError::TooDeep(MAX_DEPTH))
        );
    }
}
