//! Bitcoin transaction value types

use crate::codec::der;
use crate::error::{TxError, TxResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of output an input spends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScriptType {
    /// Legacy P2PKH
    P2PKH,
    /// Legacy P2SH
    P2SH,
    /// Native SegWit P2WPKH
    P2WPKH,
    /// Native SegWit P2WSH
    P2WSH,
}

impl ScriptType {
    /// Spent through a witness (BIP143 sighash, empty scriptSig)
    pub fn is_segwit(&self) -> bool {
        match self {
            Self::P2PKH | Self::P2SH => false,
            Self::P2WPKH | Self::P2WSH => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P2PKH => "P2PKH",
            Self::P2SH => "P2SH",
            Self::P2WPKH => "P2WPKH",
            Self::P2WSH => "P2WSH",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptType {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "P2PKH" => Ok(Self::P2PKH),
            "P2SH" => Ok(Self::P2SH),
            "P2WPKH" => Ok(Self::P2WPKH),
            "P2WSH" => Ok(Self::P2WSH),
            _ => Err(TxError::UnsupportedScriptType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ScriptType {
    type Error = TxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScriptType> for String {
    fn from(value: ScriptType) -> Self {
        value.as_str().to_string()
    }
}

/// Bitcoin sighash types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SigHashType {
    /// Sign all inputs and all outputs
    All = 0x01,
    /// Sign all inputs, no outputs
    None = 0x02,
    /// Sign all inputs, only output at same index
    Single = 0x03,
    /// SIGHASH_ALL | ANYONECANPAY (only sign own input, all outputs)
    AllAnyoneCanPay = 0x81,
    /// SIGHASH_NONE | ANYONECANPAY
    NoneAnyoneCanPay = 0x82,
    /// SIGHASH_SINGLE | ANYONECANPAY
    SingleAnyoneCanPay = 0x83,
}

impl SigHashType {
    pub fn to_byte(&self) -> u8 {
        *self as u8
    }

    pub fn from_byte(b: u8) -> TxResult<Self> {
        match b {
            0x01 => Ok(Self::All),
            0x02 => Ok(Self::None),
            0x03 => Ok(Self::Single),
            0x81 => Ok(Self::AllAnyoneCanPay),
            0x82 => Ok(Self::NoneAnyoneCanPay),
            0x83 => Ok(Self::SingleAnyoneCanPay),
            _ => Err(TxError::malformed(format!("unknown sighash type 0x{:02x}", b))),
        }
    }

    pub fn is_anyonecanpay(&self) -> bool {
        (*self as u8) & 0x80 != 0
    }

    pub fn is_none(&self) -> bool {
        (*self as u8) & 0x1f == 0x02
    }

    pub fn is_single(&self) -> bool {
        (*self as u8) & 0x1f == 0x03
    }
}

impl TryFrom<u8> for SigHashType {
    type Error = TxError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_byte(value)
    }
}

impl From<SigHashType> for u8 {
    fn from(value: SigHashType) -> Self {
        value.to_byte()
    }
}

/// Transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Previous txid in wire order, copied to the output verbatim
    #[serde(with = "crate::serde_bytes::hex32")]
    pub txid: [u8; 32],
    pub vout: u32,
    #[serde(default, with = "crate::serde_bytes::hex_vec")]
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    /// Witness stack items, without the item-count prefix
    #[serde(default, with = "crate::serde_bytes::hex_vec_list")]
    pub witness: Vec<Vec<u8>>,
    pub script_type: ScriptType,
    /// P2SH redeem script or P2WSH witness script
    #[serde(default, with = "crate::serde_bytes::hex_vec")]
    pub redeem_script: Vec<u8>,
}

impl TxInput {
    /// Unsigned input with empty scriptSig and witness
    pub fn new(txid: [u8; 32], vout: u32, sequence: u32, script_type: ScriptType) -> Self {
        Self {
            txid,
            vout,
            script_sig: Vec::new(),
            sequence,
            witness: Vec::new(),
            script_type,
            redeem_script: Vec::new(),
        }
    }

    pub fn with_redeem_script(mut self, script: Vec<u8>) -> Self {
        self.redeem_script = script;
        self
    }
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Value in satoshis
    pub value: u64,
    #[serde(with = "crate::serde_bytes::hex_vec")]
    pub script_pubkey: Vec<u8>,
}

/// Bitcoin transaction (legacy or SegWit layout)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcTransaction {
    pub version: i32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub locktime: u32,
    /// Serialize with the SegWit marker/flag and witness section
    #[serde(default)]
    pub has_witness: bool,
}

impl BtcTransaction {
    pub fn input(&self, index: usize) -> TxResult<&TxInput> {
        self.inputs.get(index).ok_or_else(|| {
            TxError::malformed(format!(
                "input index {} out of range ({} inputs)",
                index,
                self.inputs.len()
            ))
        })
    }
}

/// ECDSA signature for one input, DER-encoded only when placed in a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcSignature {
    #[serde(with = "crate::serde_bytes::hex32")]
    pub r: [u8; 32],
    #[serde(with = "crate::serde_bytes::hex32")]
    pub s: [u8; 32],
    pub hash_type: SigHashType,
}

impl BtcSignature {
    /// Split a 64-byte compact `r || s` signature
    pub fn from_compact(compact: &[u8; 64], hash_type: SigHashType) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Self { r, s, hash_type }
    }

    /// Parse `DER || hashType` as found in scripts and witnesses
    pub fn from_der_with_hash_type(bytes: &[u8]) -> TxResult<Self> {
        let (hash_type, der_bytes) = bytes
            .split_last()
            .ok_or_else(|| TxError::invalid_encoding("empty signature"))?;
        let (r, s) = der::decode_signature(der_bytes)?;
        Ok(Self {
            r,
            s,
            hash_type: SigHashType::from_byte(*hash_type)?,
        })
    }

    /// `DER(r, s) || hashType`, the form pushed in scriptSig or witness
    pub fn to_script_bytes(&self) -> Vec<u8> {
        let mut bytes = der::encode_signature(&self.r, &self.s);
        bytes.push(self.hash_type.to_byte());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_type_parsing() {
        assert_eq!("p2wpkh".parse::<ScriptType>().unwrap(), ScriptType::P2WPKH);
        assert!(matches!(
            "P2TR".parse::<ScriptType>(),
            Err(TxError::UnsupportedScriptType(ref s)) if s == "P2TR"
        ));
        assert!(ScriptType::P2WSH.is_segwit());
        assert!(!ScriptType::P2SH.is_segwit());
    }

    #[test]
    fn test_script_type_serde() {
        let json = serde_json::to_string(&ScriptType::P2PKH).unwrap();
        assert_eq!(json, "\"P2PKH\"");
        let err = serde_json::from_str::<ScriptType>("\"P2TR\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported script type"));
    }

    #[test]
    fn test_sighash_type_parsing() {
        assert_eq!(SigHashType::from_byte(0x01).unwrap(), SigHashType::All);
        assert_eq!(
            SigHashType::from_byte(0x81).unwrap(),
            SigHashType::AllAnyoneCanPay
        );
        assert!(!SigHashType::All.is_anyonecanpay());
        assert!(SigHashType::AllAnyoneCanPay.is_anyonecanpay());
        assert!(SigHashType::NoneAnyoneCanPay.is_none());
        assert!(SigHashType::Single.is_single());
        assert!(matches!(
            SigHashType::from_byte(0x04),
            Err(TxError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_input_from_json() {
        let json = format!(
            r#"{{"txid":"{}","vout":1,"sequence":4294967295,"script_type":"P2WPKH"}}"#,
            "ab".repeat(32)
        );
        let input: TxInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input.txid, [0xab; 32]);
        assert!(input.script_sig.is_empty());
        assert!(input.witness.is_empty());
        assert_eq!(input.script_type, ScriptType::P2WPKH);
    }

    #[test]
    fn test_signature_script_bytes_round_trip() {
        let sig = BtcSignature {
            r: [0x11; 32],
            s: [0x22; 32],
            hash_type: SigHashType::All,
        };
        let bytes = sig.to_script_bytes();
        assert_eq!(bytes.len(), 71);
        assert_eq!(*bytes.last().unwrap(), 0x01);
        assert_eq!(BtcSignature::from_der_with_hash_type(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_input_index_out_of_range() {
        let tx = BtcTransaction {
            version: 2,
            inputs: vec![],
            outputs: vec![],
            locktime: 0,
            has_witness: false,
        };
        assert!(matches!(tx.input(0), Err(TxError::MalformedInput(_))));
    }
}
