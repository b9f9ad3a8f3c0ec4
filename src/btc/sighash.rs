//! Bitcoin Pre-Image Hashing
//!
//! Legacy sighash and the BIP-143 (SegWit v0) sighash. Both end with a
//! double SHA-256 over a pre-image that commits to the sighash type.

use super::assembler::serialize;
use super::types::{BtcTransaction, ScriptType, SigHashType, TxInput, TxOutput};
use crate::codec::integer::{le_i32, le_u32, le_u64, write_var_bytes};
use crate::error::{TxError, TxResult};
use crate::log_debug;
use crate::utils::config::{EncodingConfig, HashTypeEncoding};
use bitcoin::hashes::{sha256d, Hash};

/// Digest returned for SIGHASH_SINGLE without a matching output
/// (the integer 1, little-endian)
const SIGHASH_SINGLE_BUG: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).to_byte_array()
}

/// dSHA256 over every input's outpoint
pub fn hash_prevouts(tx: &BtcTransaction) -> [u8; 32] {
    let mut prevouts = Vec::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        prevouts.extend_from_slice(&input.txid);
        prevouts.extend_from_slice(&le_u32(input.vout));
    }
    double_sha256(&prevouts)
}

/// dSHA256 over every input's sequence
pub fn hash_sequence(tx: &BtcTransaction) -> [u8; 32] {
    let mut sequences = Vec::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        sequences.extend_from_slice(&le_u32(input.sequence));
    }
    double_sha256(&sequences)
}

/// dSHA256 over every serialized output
pub fn hash_outputs(tx: &BtcTransaction) -> [u8; 32] {
    let mut outputs = Vec::new();
    for output in &tx.outputs {
        write_output(output, &mut outputs);
    }
    double_sha256(&outputs)
}

fn write_output(output: &TxOutput, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&le_u64(output.value));
    write_var_bytes(&output.script_pubkey, buf);
}

/// Computes the digests each input's signer must sign
#[derive(Debug, Clone, Copy)]
pub struct SighashEngine {
    hash_type_encoding: HashTypeEncoding,
}

impl Default for SighashEngine {
    fn default() -> Self {
        Self::new(&EncodingConfig::standard())
    }
}

impl SighashEngine {
    pub fn new(config: &EncodingConfig) -> Self {
        Self {
            hash_type_encoding: config.hash_type_encoding,
        }
    }

    /// Pre-SegWit sighash for input `input_index`
    ///
    /// `script_code` replaces that input's scriptSig in a stripped copy of
    /// the transaction; OP_CODESEPARATOR handling is left to the caller.
    pub fn legacy_sighash(
        &self,
        tx: &BtcTransaction,
        input_index: usize,
        script_code: &[u8],
        hash_type: SigHashType,
    ) -> TxResult<[u8; 32]> {
        tx.input(input_index)?;

        let zero_other_sequences = hash_type.is_none() || hash_type.is_single();
        let inputs: Vec<TxInput> = tx
            .inputs
            .iter()
            .enumerate()
            .filter(|(i, _)| !hash_type.is_anyonecanpay() || *i == input_index)
            .map(|(i, input)| {
                let is_signed = i == input_index;
                TxInput {
                    script_sig: if is_signed { script_code.to_vec() } else { Vec::new() },
                    sequence: if !is_signed && zero_other_sequences { 0 } else { input.sequence },
                    witness: Vec::new(),
                    ..input.clone()
                }
            })
            .collect();

        let outputs = if hash_type.is_none() {
            Vec::new()
        } else if hash_type.is_single() {
            if input_index >= tx.outputs.len() {
                return Ok(SIGHASH_SINGLE_BUG);
            }
            let mut outputs = vec![
                TxOutput {
                    value: u64::MAX,
                    script_pubkey: Vec::new(),
                };
                input_index
            ];
            outputs.push(tx.outputs[input_index].clone());
            outputs
        } else {
            tx.outputs.clone()
        };

        let stripped = BtcTransaction {
            version: tx.version,
            inputs,
            outputs,
            locktime: tx.locktime,
            has_witness: false,
        };

        let mut preimage = serialize(&stripped);
        self.hash_type_encoding.append(hash_type.to_byte(), &mut preimage);

        let hash = double_sha256(&preimage);
        log_debug!(
            "btc",
            "legacy sighash",
            input = input_index,
            preimage_len = preimage.len(),
            sighash = hex::encode(hash),
        );
        Ok(hash)
    }

    /// BIP-143 sighash for input `input_index` spending `input_value` sats
    pub fn witness_v0_sighash(
        &self,
        tx: &BtcTransaction,
        input_index: usize,
        script_code: &[u8],
        input_value: u64,
        hash_type: SigHashType,
    ) -> TxResult<[u8; 32]> {
        let input = tx.input(input_index)?;

        let prevouts = if hash_type.is_anyonecanpay() {
            [0u8; 32]
        } else {
            hash_prevouts(tx)
        };

        let sequences =
            if hash_type.is_anyonecanpay() || hash_type.is_none() || hash_type.is_single() {
                [0u8; 32]
            } else {
                hash_sequence(tx)
            };

        let outputs = if hash_type.is_single() {
            match tx.outputs.get(input_index) {
                Some(output) => {
                    let mut single = Vec::new();
                    write_output(output, &mut single);
                    double_sha256(&single)
                }
                None => [0u8; 32],
            }
        } else if hash_type.is_none() {
            [0u8; 32]
        } else {
            hash_outputs(tx)
        };

        let mut preimage = Vec::with_capacity(160 + script_code.len());
        preimage.extend_from_slice(&le_i32(tx.version));
        preimage.extend_from_slice(&prevouts);
        preimage.extend_from_slice(&sequences);
        preimage.extend_from_slice(&input.txid);
        preimage.extend_from_slice(&le_u32(input.vout));
        write_var_bytes(script_code, &mut preimage);
        preimage.extend_from_slice(&le_u64(input_value));
        preimage.extend_from_slice(&le_u32(input.sequence));
        preimage.extend_from_slice(&outputs);
        preimage.extend_from_slice(&le_u32(tx.locktime));
        self.hash_type_encoding.append(hash_type.to_byte(), &mut preimage);

        let hash = double_sha256(&preimage);
        log_debug!(
            "btc",
            "witness v0 sighash",
            input = input_index,
            value = input_value,
            sighash = hex::encode(hash),
        );
        Ok(hash)
    }

    /// One digest per input, dispatched on each input's script type
    ///
    /// `script_codes[i]` and `values[i]` belong to `tx.inputs[i]`; values
    /// are only committed for SegWit inputs.
    pub fn all_hashes_to_sign(
        &self,
        tx: &BtcTransaction,
        script_codes: &[Vec<u8>],
        values: &[u64],
        hash_type: SigHashType,
    ) -> TxResult<Vec<[u8; 32]>> {
        if script_codes.len() != tx.inputs.len() {
            return Err(TxError::malformed(format!(
                "expected {} script codes, got {}",
                tx.inputs.len(),
                script_codes.len()
            )));
        }
        if values.len() != tx.inputs.len() {
            return Err(TxError::malformed(format!(
                "expected {} input values, got {}",
                tx.inputs.len(),
                values.len()
            )));
        }

        tx.inputs
            .iter()
            .enumerate()
            .map(|(i, input)| match input.script_type {
                ScriptType::P2PKH | ScriptType::P2SH => {
                    self.legacy_sighash(tx, i, &script_codes[i], hash_type)
                }
                ScriptType::P2WPKH | ScriptType::P2WSH => {
                    self.witness_v0_sighash(tx, i, &script_codes[i], values[i], hash_type)
                }
            })
            .collect()
    }
}
