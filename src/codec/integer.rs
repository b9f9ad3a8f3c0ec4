//! Integer codecs
//!
//! Big-endian minimal-width trimming (RLP payloads), fixed-width
//! little-endian fields and Bitcoin's CompactSize VarInt.

use crate::error::{TxError, TxResult};
use ethers_core::types::U256;

/// Strip leading zero bytes. Zero (or an empty slice) yields an empty slice.
pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    &bytes[leading_zeros..]
}

/// Minimal big-endian bytes of a u64 (empty for zero)
pub fn be_minimal_u64(value: u64) -> Vec<u8> {
    trim_leading_zeros(&value.to_be_bytes()).to_vec()
}

/// Minimal big-endian bytes of a U256 (empty for zero)
pub fn be_minimal_u256(value: &U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    trim_leading_zeros(&buf).to_vec()
}

/// Minimal big-endian bytes of a usize, used for RLP long-form lengths
pub fn be_minimal_usize(value: usize) -> Vec<u8> {
    trim_leading_zeros(&value.to_be_bytes()).to_vec()
}

/// Minimal big-endian bytes of `value`, or `OutOfRange` if it needs more
/// than `width` bytes.
pub fn fit_width(value: &U256, width: usize, field: &str) -> TxResult<Vec<u8>> {
    let bytes = be_minimal_u256(value);
    if bytes.len() > width {
        return Err(TxError::out_of_range(format!(
            "{} needs {} bytes, limit is {}",
            field,
            bytes.len(),
            width
        )));
    }
    Ok(bytes)
}

pub fn le_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn le_i32(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn le_u64(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Append a Bitcoin VarInt (CompactSize) to `buf`
pub fn write_var_int(value: u64, buf: &mut Vec<u8>) {
    if value < 0xfd {
        buf.push(value as u8);
    } else if value <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

/// Encode a Bitcoin VarInt into a fresh buffer
pub fn var_int(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(9);
    write_var_int(value, &mut buf);
    buf
}

/// Append `VarInt(len(data)) ++ data`
pub fn write_var_bytes(data: &[u8], buf: &mut Vec<u8>) {
    write_var_int(data.len() as u64, buf);
    buf.extend_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_leading_zeros() {
        assert_eq!(trim_leading_zeros(&[0, 0, 1, 0]), &[1, 0]);
        assert!(trim_leading_zeros(&[0, 0, 0]).is_empty());
        assert!(trim_leading_zeros(&[]).is_empty());
    }

    #[test]
    fn test_be_minimal() {
        assert!(be_minimal_u64(0).is_empty());
        assert_eq!(be_minimal_u64(0x7f), vec![0x7f]);
        assert_eq!(be_minimal_u64(0x0100), vec![0x01, 0x00]);
        assert!(be_minimal_u256(&U256::zero()).is_empty());
        assert_eq!(
            be_minimal_u256(&U256::from(1_000_000_000_000_000_000u64)),
            hex::decode("0de0b6b3a7640000").unwrap()
        );
        assert_eq!(be_minimal_u256(&U256::MAX).len(), 32);
    }

    #[test]
    fn test_fit_width() {
        let max_u64 = U256::from(u64::MAX);
        assert_eq!(fit_width(&max_u64, 8, "nonce").unwrap().len(), 8);

        let over = max_u64 + U256::one();
        let err = fit_width(&over, 8, "nonce").unwrap_err();
        assert!(matches!(err, TxError::OutOfRange(ref m) if m.contains("nonce")));
    }

    #[test]
    fn test_fixed_width_little_endian() {
        assert_eq!(le_u32(1), [1, 0, 0, 0]);
        assert_eq!(le_i32(-1), [0xff; 4]);
        assert_eq!(le_u64(0x0102), [2, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_var_int_boundaries() {
        assert_eq!(var_int(0), vec![0x00]);
        assert_eq!(var_int(252), vec![0xfc]);
        assert_eq!(var_int(253), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(var_int(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(var_int(65536), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(var_int(0xffff_ffff), vec![0xfe, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(
            var_int(0x1_0000_0000),
            vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_write_var_bytes() {
        let mut buf = Vec::new();
        write_var_bytes(&[0xaa, 0xbb], &mut buf);
        assert_eq!(buf, vec![0x02, 0xaa, 0xbb]);
    }
}
