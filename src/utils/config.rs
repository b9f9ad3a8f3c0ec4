//! Encoding Configuration
//!
//! Centralized encoding settings with:
//! - Presets (standard, legacy_compat)
//! - Per-field integer widths for EVM payloads
//! - The sighash type field width used in Bitcoin pre-images
//! - JSON loading and validation

use crate::error::{TxError, TxResult};
use serde::{Deserialize, Serialize};

/// Byte widths enforced on bounded EVM fields
///
/// Fee and value fields are always full 256-bit quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvmFieldWidths {
    pub chain_id: usize,
    /// EIP-2681 caps the account nonce at 2^64-1
    pub nonce: usize,
    pub gas_limit: usize,
}

impl Default for EvmFieldWidths {
    fn default() -> Self {
        Self {
            chain_id: 8,
            nonce: 8,
            gas_limit: 8,
        }
    }
}

/// How the sighash type is committed at the end of a Bitcoin pre-image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashTypeEncoding {
    /// 4-byte little-endian field, as consensus requires
    FourByteLe,
    /// Single byte. Produces digests real nodes reject; only for
    /// reproducing hashes from older tooling.
    SingleByte,
}

impl HashTypeEncoding {
    pub fn append(&self, hash_type: u8, buf: &mut Vec<u8>) {
        match self {
            Self::FourByteLe => buf.extend_from_slice(&(hash_type as u32).to_le_bytes()),
            Self::SingleByte => buf.push(hash_type),
        }
    }
}

/// Encoding settings shared by the assemblers and the sighash engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingConfig {
    #[serde(default)]
    pub evm: EvmFieldWidths,
    #[serde(default = "default_hash_type_encoding")]
    pub hash_type_encoding: HashTypeEncoding,
}

fn default_hash_type_encoding() -> HashTypeEncoding {
    HashTypeEncoding::FourByteLe
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl EncodingConfig {
    /// Node-compatible settings
    pub fn standard() -> Self {
        Self {
            evm: EvmFieldWidths::default(),
            hash_type_encoding: HashTypeEncoding::FourByteLe,
        }
    }

    /// Reproduces digests from tooling that committed a one-byte sighash type
    pub fn legacy_compat() -> Self {
        Self {
            evm: EvmFieldWidths::default(),
            hash_type_encoding: HashTypeEncoding::SingleByte,
        }
    }

    /// Check widths are within 1..=32 bytes
    pub fn validate(&self) -> TxResult<()> {
        let widths = [
            ("chain_id", self.evm.chain_id),
            ("nonce", self.evm.nonce),
            ("gas_limit", self.evm.gas_limit),
        ];
        for (name, width) in widths {
            if width == 0 || width > 32 {
                return Err(TxError::out_of_range(format!(
                    "{} width must be 1..=32 bytes, got {}",
                    name, width
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> TxResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        if config.hash_type_encoding == HashTypeEncoding::SingleByte {
            crate::log_warn!(
                "config",
                "single-byte sighash type enabled; digests will not match Bitcoin nodes"
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(EncodingConfig::default(), EncodingConfig::standard());
        assert_eq!(
            EncodingConfig::legacy_compat().hash_type_encoding,
            HashTypeEncoding::SingleByte
        );
        assert!(EncodingConfig::standard().validate().is_ok());
    }

    #[test]
    fn test_hash_type_append() {
        let mut buf = Vec::new();
        HashTypeEncoding::FourByteLe.append(0x81, &mut buf);
        assert_eq!(buf, vec![0x81, 0, 0, 0]);

        let mut buf = Vec::new();
        HashTypeEncoding::SingleByte.append(0x01, &mut buf);
        assert_eq!(buf, vec![0x01]);
    }

    #[test]
    fn test_from_json_defaults() {
        let config = EncodingConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EncodingConfig::standard());

        let json = r#"{"evm":{"nonce":32},"hash_type_encoding":"single_byte"}"#;
        let config = EncodingConfig::from_json_str(json).unwrap();
        assert_eq!(config.evm.nonce, 32);
        assert_eq!(config.evm.chain_id, 8);
        assert_eq!(config.hash_type_encoding, HashTypeEncoding::SingleByte);
    }

    #[test]
    fn test_from_json_rejects_bad_width() {
        let err = EncodingConfig::from_json_str(r#"{"evm":{"gas_limit":0}}"#).unwrap_err();
        assert!(matches!(err, TxError::OutOfRange(_)));

        let err = EncodingConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, TxError::InvalidEncoding(_)));
    }
}
