//! DER signature encoding
//!
//! ECDSA signatures inside Bitcoin scripts and witnesses are
//! `SEQUENCE { INTEGER r, INTEGER s }` in strict DER.

use super::integer::trim_leading_zeros;
use crate::error::{TxError, TxResult};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// Encode raw `(r, s)` scalars as a DER signature (no sighash byte)
pub fn encode_signature(r: &[u8; 32], s: &[u8; 32]) -> Vec<u8> {
    let r_int = encode_integer(r);
    let s_int = encode_integer(s);

    let mut der = Vec::with_capacity(6 + r_int.len() + s_int.len());
    der.push(SEQUENCE_TAG);
    der.push((4 + r_int.len() + s_int.len()) as u8);
    der.push(INTEGER_TAG);
    der.push(r_int.len() as u8);
    der.extend_from_slice(&r_int);
    der.push(INTEGER_TAG);
    der.push(s_int.len() as u8);
    der.extend_from_slice(&s_int);
    der
}

/// Minimal non-negative INTEGER content bytes
fn encode_integer(scalar: &[u8]) -> Vec<u8> {
    let trimmed = trim_leading_zeros(scalar);
    if trimmed.is_empty() {
        return vec![0x00];
    }
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

/// Parse a strict DER signature back into 32-byte `(r, s)` scalars
pub fn decode_signature(der: &[u8]) -> TxResult<([u8; 32], [u8; 32])> {
    if der.len() < 8 {
        return Err(TxError::invalid_encoding("DER signature too short"));
    }
    if der[0] != SEQUENCE_TAG {
        return Err(TxError::invalid_encoding("missing SEQUENCE tag"));
    }
    if der[1] & 0x80 != 0 || der[1] as usize != der.len() - 2 {
        return Err(TxError::invalid_encoding(format!(
            "SEQUENCE length {} does not match {} content bytes",
            der[1],
            der.len() - 2
        )));
    }

    let (r, rest) = decode_integer(&der[2..])?;
    let (s, rest) = decode_integer(rest)?;
    if !rest.is_empty() {
        return Err(TxError::invalid_encoding("trailing bytes after s"));
    }
    Ok((r, s))
}

fn decode_integer(data: &[u8]) -> TxResult<([u8; 32], &[u8])> {
    if data.len() < 2 || data[0] != INTEGER_TAG {
        return Err(TxError::invalid_encoding("missing INTEGER tag"));
    }
    let len = data[1] as usize;
    if len == 0 || len & 0x80 != 0 || data.len() < 2 + len {
        return Err(TxError::invalid_encoding(format!("bad INTEGER length {}", len)));
    }
    let content = &data[2..2 + len];
    if content[0] & 0x80 != 0 {
        return Err(TxError::invalid_encoding("negative INTEGER"));
    }
    if len > 1 && content[0] == 0x00 && content[1] & 0x80 == 0 {
        return Err(TxError::invalid_encoding("non-minimal INTEGER padding"));
    }

    let value = trim_leading_zeros(content);
    if value.len() > 32 {
        return Err(TxError::invalid_encoding("INTEGER wider than 32 bytes"));
    }
    let mut scalar = [0u8; 32];
    scalar[32 - value.len()..].copy_from_slice(value);
    Ok((scalar, &data[2 + len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(first: u8, fill: u8) -> [u8; 32] {
        let mut s = [fill; 32];
        s[0] = first;
        s
    }

    #[test]
    fn test_plain_scalars() {
        let der = encode_signature(&[0x11; 32], &[0x22; 32]);
        assert_eq!(der.len(), 70);
        assert_eq!(&der[..4], &[0x30, 0x44, 0x02, 0x20]);
        assert_eq!(&der[36..38], &[0x02, 0x20]);
    }

    #[test]
    fn test_high_bit_gains_zero_prefix() {
        let mut s = [0u8; 32];
        s[31] = 0x05;
        let der = encode_signature(&scalar(0x80, 0x01), &s);
        assert_eq!(
            hex::encode(&der),
            "30260221008001010101010101010101010101010101010101010101010101010101010101020105"
        );
        // 4 + len(r) + len(s)
        assert_eq!(der[1] as usize, 4 + 33 + 1);
    }

    #[test]
    fn test_zero_scalar_is_single_zero_byte() {
        let der = encode_signature(&[0u8; 32], &[0x01; 32]);
        assert_eq!(&der[2..5], &[0x02, 0x01, 0x00]);
    }

    #[test]
    fn test_leading_zero_trimmed_then_padded() {
        // 0x00 0x90 ... trims to 0x90 ... then regains a single 0x00
        let der = encode_signature(&scalar(0x00, 0x90), &[0x01; 32]);
        assert_eq!(&der[2..5], &[0x02, 0x20, 0x00]);
        assert_eq!(der[5], 0x90);
    }

    #[test]
    fn test_decode_round_trip() {
        let r = scalar(0x80, 0x01);
        let s = scalar(0x00, 0x7f);
        let (dr, ds) = decode_signature(&encode_signature(&r, &s)).unwrap();
        assert_eq!(dr, r);
        assert_eq!(ds, s);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let good = encode_signature(&[0x11; 32], &[0x22; 32]);

        let mut wrong_tag = good.clone();
        wrong_tag[0] = 0x31;
        assert!(matches!(decode_signature(&wrong_tag), Err(TxError::InvalidEncoding(_))));

        let mut trailing = good.clone();
        trailing.push(0x00);
        assert!(decode_signature(&trailing).is_err());

        let mut negative = good.clone();
        negative[4] = 0x91;
        assert!(decode_signature(&negative).is_err());

        // r = 0x00 0x11 is padded without need
        let padded = hex::decode("3007020200110201010000").unwrap();
        assert!(decode_signature(&padded[..9]).is_err());

        assert!(decode_signature(&[0x30, 0x00]).is_err());
    }
}
