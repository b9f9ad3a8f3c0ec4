//! Recursive Length Prefix encoding
//!
//! Only the encoding direction is needed to build transactions. Lists take
//! children that are already RLP-encoded; the list header counts the encoded
//! child bytes, not the raw payloads.

use super::integer::{be_minimal_u256, be_minimal_u64, be_minimal_usize, fit_width};
use crate::error::TxResult;
use ethers_core::types::U256;

const EMPTY_STRING: u8 = 0x80;
const SHORT_STRING_MAX: u8 = 0xb7;
const EMPTY_LIST: u8 = 0xc0;
const SHORT_LIST_MAX: u8 = 0xf7;

/// Encode a byte string
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < EMPTY_STRING {
        return data.to_vec();
    }
    let mut result = encode_header(data.len(), EMPTY_STRING, SHORT_STRING_MAX);
    result.extend_from_slice(data);
    result
}

/// Encode a list from already-encoded children
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(Vec::len).sum();
    let mut result = encode_header(payload_len, EMPTY_LIST, SHORT_LIST_MAX);
    result.reserve(payload_len);
    for item in items {
        result.extend_from_slice(item);
    }
    result
}

/// Encode an unsigned integer; zero becomes the empty string (0x80)
pub fn encode_u64(value: u64) -> Vec<u8> {
    encode_bytes(&be_minimal_u64(value))
}

/// Encode a 256-bit unsigned integer; zero becomes the empty string (0x80)
pub fn encode_uint(value: &U256) -> Vec<u8> {
    encode_bytes(&be_minimal_u256(value))
}

/// Encode an unsigned integer that must fit in `width` bytes
pub fn encode_uint_bounded(value: &U256, width: usize, field: &str) -> TxResult<Vec<u8>> {
    Ok(encode_bytes(&fit_width(value, width, field)?))
}

/// Encode an optional byte string; `None` is the empty string, never omitted
pub fn encode_optional_bytes(data: Option<&[u8]>) -> Vec<u8> {
    match data {
        Some(bytes) => encode_bytes(bytes),
        None => vec![EMPTY_STRING],
    }
}

fn encode_header(len: usize, short_base: u8, long_base: u8) -> Vec<u8> {
    if len < 56 {
        vec![short_base + len as u8]
    } else {
        let len_bytes = be_minimal_usize(len);
        let mut header = Vec::with_capacity(1 + len_bytes.len());
        header.push(long_base + len_bytes.len() as u8);
        header.extend_from_slice(&len_bytes);
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TxError;

    #[test]
    fn test_rlp_encode_uint() {
        assert_eq!(encode_u64(0), vec![0x80]);
        assert_eq!(encode_u64(127), vec![127]);
        assert_eq!(encode_u64(128), vec![0x81, 128]);
        assert_eq!(encode_u64(256), vec![0x82, 1, 0]);
        assert_eq!(encode_uint(&U256::zero()), vec![0x80]);
        assert_eq!(encode_uint(&U256::from(1024u64)), vec![0x82, 0x04, 0x00]);
    }

    #[test]
    fn test_rlp_encode_bytes() {
        assert_eq!(encode_bytes(&[]), vec![0x80]);
        assert_eq!(encode_bytes(&[0x00]), vec![0x00]);
        assert_eq!(encode_bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(encode_bytes(&[0x80]), vec![0x81, 0x80]);
        assert_eq!(encode_bytes(&[1, 2, 3]), vec![0x83, 1, 2, 3]);
    }

    #[test]
    fn test_rlp_string_length_thresholds() {
        let s55 = vec![0xaa; 55];
        let enc = encode_bytes(&s55);
        assert_eq!(enc[0], 0x80 + 55);
        assert_eq!(enc.len(), 56);

        let s56 = vec![0xaa; 56];
        let enc = encode_bytes(&s56);
        assert_eq!(&enc[..2], &[0xb8, 56]);
        assert_eq!(enc.len(), 58);

        let s1024 = vec![0xaa; 1024];
        let enc = encode_bytes(&s1024);
        assert_eq!(&enc[..3], &[0xb9, 0x04, 0x00]);
    }

    #[test]
    fn test_rlp_list() {
        assert_eq!(encode_list(&[]), vec![0xc0]);

        // ["cat", "dog"]
        let items = vec![encode_bytes(b"cat"), encode_bytes(b"dog")];
        assert_eq!(
            encode_list(&items),
            vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']
        );

        // [[], [[]], [[], [[]]]]
        let empty = encode_list(&[]);
        let one = encode_list(&[empty.clone()]);
        let two = encode_list(&[empty.clone(), one.clone()]);
        assert_eq!(
            encode_list(&[empty, one, two]),
            vec![0xc7, 0xc0, 0xc1, 0xc0, 0xc3, 0xc0, 0xc1, 0xc0]
        );
    }

    #[test]
    fn test_rlp_list_counts_encoded_child_lengths() {
        // One 60-byte child: 62 encoded bytes, so the list needs a long header.
        let child = encode_bytes(&[0u8; 60]);
        assert_eq!(child.len(), 62);
        let list = encode_list(&[child]);
        assert_eq!(&list[..4], &[0xf8, 62, 0xb8, 60]);
    }

    #[test]
    fn test_optional_bytes() {
        assert_eq!(encode_optional_bytes(None), vec![0x80]);
        assert_eq!(encode_optional_bytes(Some(&[0x01])), vec![0x01]);
    }

    #[test]
    fn test_encode_uint_bounded() {
        let fits = U256::from(u64::MAX);
        assert_eq!(encode_uint_bounded(&fits, 8, "gas_limit").unwrap()[0], 0x88);

        let too_big = U256::from(u64::MAX) + U256::one();
        assert!(matches!(
            encode_uint_bounded(&too_big, 8, "gas_limit"),
            Err(TxError::OutOfRange(_))
        ));
    }
}
