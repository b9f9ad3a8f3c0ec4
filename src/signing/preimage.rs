//! Pre-Image Hash Generation
//!
//! Wraps the digests an external signer must sign with enough metadata to
//! route each one (air-gapped and hardware-wallet flows).

use crate::btc::{BtcTransaction, SigHashType, SighashEngine};
use crate::error::TxResult;
use crate::evm::{Eip1559Assembler, EvmTransaction};
use serde::{Deserialize, Serialize};

/// A pre-image hash with metadata for signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreImageHash {
    /// The hash to sign (32 bytes)
    #[serde(with = "crate::serde_bytes::hex32")]
    pub hash: [u8; 32],

    /// For UTXO chains: which input index this is for
    pub input_index: Option<usize>,

    /// Human-readable description
    pub description: String,
}

impl PreImageHash {
    pub fn new(hash: [u8; 32]) -> Self {
        Self {
            hash,
            input_index: None,
            description: String::new(),
        }
    }

    pub fn with_input_index(mut self, index: usize) -> Self {
        self.input_index = Some(index);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Get hash as hex string
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }
}

/// One pre-image per input, in input order
pub fn bitcoin_preimages(
    engine: &SighashEngine,
    tx: &BtcTransaction,
    script_codes: &[Vec<u8>],
    values: &[u64],
    hash_type: SigHashType,
) -> TxResult<Vec<PreImageHash>> {
    let hashes = engine.all_hashes_to_sign(tx, script_codes, values, hash_type)?;
    Ok(hashes
        .into_iter()
        .zip(&tx.inputs)
        .enumerate()
        .map(|(i, (hash, input))| {
            let algo = if input.script_type.is_segwit() { "BIP-143" } else { "legacy" };
            PreImageHash::new(hash)
                .with_input_index(i)
                .with_description(format!(
                    "{} input {} ({} sighash, type 0x{:02x})",
                    input.script_type,
                    i,
                    algo,
                    hash_type.to_byte()
                ))
        })
        .collect())
}

/// Signing hash of an EIP-1559 transaction
pub fn ethereum_preimage(
    assembler: &Eip1559Assembler,
    tx: &EvmTransaction,
) -> TxResult<PreImageHash> {
    let hash = assembler.signing_hash_for(tx)?;
    Ok(PreImageHash::new(hash).with_description(format!(
        "EIP-1559 transaction on chain {}",
        tx.chain_id
    )))
}
