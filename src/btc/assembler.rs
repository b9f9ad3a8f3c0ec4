//! Bitcoin transaction serialization
//!
//! Layout: version | [marker 0x00, flag 0x01] | inputs | outputs |
//! [witnesses] | locktime. All integers little-endian, lengths as VarInt.

use super::script::authorize_input;
use super::types::{BtcSignature, BtcTransaction};
use crate::codec::integer::{le_i32, le_u32, le_u64, write_var_bytes, write_var_int};
use crate::error::{TxError, TxResult};
use crate::log_debug;
use bitcoin::hashes::{sha256d, Hash};
use serde::{Deserialize, Serialize};

const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;

/// Compiled Bitcoin transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledBitcoinTransaction {
    /// Raw transaction bytes (ready to broadcast)
    #[serde(with = "crate::serde_bytes::hex_vec")]
    pub raw_tx: Vec<u8>,
    /// Transaction ID in display (byte-reversed) order
    #[serde(with = "crate::serde_bytes::hex32")]
    pub txid: [u8; 32],
    /// Witness transaction ID in display order; equals txid without witnesses
    #[serde(with = "crate::serde_bytes::hex32")]
    pub wtxid: [u8; 32],
    /// BIP141 weight units
    pub weight: usize,
    /// Virtual size in vbytes
    pub vsize: usize,
}

/// Serialize using the transaction's own `has_witness` flag
pub fn serialize(tx: &BtcTransaction) -> Vec<u8> {
    serialize_with(tx, tx.has_witness)
}

/// Serialize without marker, flag or witnesses (the txid pre-image)
pub fn serialize_without_witness(tx: &BtcTransaction) -> Vec<u8> {
    serialize_with(tx, false)
}

fn serialize_with(tx: &BtcTransaction, include_witness: bool) -> Vec<u8> {
    let mut raw_tx = Vec::new();

    raw_tx.extend_from_slice(&le_i32(tx.version));

    if include_witness {
        raw_tx.push(SEGWIT_MARKER);
        raw_tx.push(SEGWIT_FLAG);
    }

    write_var_int(tx.inputs.len() as u64, &mut raw_tx);
    for input in &tx.inputs {
        raw_tx.extend_from_slice(&input.txid);
        raw_tx.extend_from_slice(&le_u32(input.vout));
        write_var_bytes(&input.script_sig, &mut raw_tx);
        raw_tx.extend_from_slice(&le_u32(input.sequence));
    }

    write_var_int(tx.outputs.len() as u64, &mut raw_tx);
    for output in &tx.outputs {
        raw_tx.extend_from_slice(&le_u64(output.value));
        write_var_bytes(&output.script_pubkey, &mut raw_tx);
    }

    if include_witness {
        for input in &tx.inputs {
            // An empty stack is the single byte 0x00 (item count zero)
            write_var_int(input.witness.len() as u64, &mut raw_tx);
            for item in &input.witness {
                write_var_bytes(item, &mut raw_tx);
            }
        }
    }

    raw_tx.extend_from_slice(&le_u32(tx.locktime));
    raw_tx
}

/// Place signatures and public keys into a copy of `tx`
///
/// `signatures[i]` and `pubkeys[i]` authorize `tx.inputs[i]`.
pub fn apply_signatures(
    tx: &BtcTransaction,
    signatures: &[BtcSignature],
    pubkeys: &[Vec<u8>],
) -> TxResult<BtcTransaction> {
    if signatures.len() != tx.inputs.len() {
        return Err(TxError::malformed(format!(
            "expected {} signatures, got {}",
            tx.inputs.len(),
            signatures.len()
        )));
    }
    if pubkeys.len() != tx.inputs.len() {
        return Err(TxError::malformed(format!(
            "expected {} public keys, got {}",
            tx.inputs.len(),
            pubkeys.len()
        )));
    }

    let mut signed = tx.clone();
    for ((input, sig), pubkey) in signed.inputs.iter_mut().zip(signatures).zip(pubkeys) {
        let auth = authorize_input(input, sig, pubkey)?;
        input.script_sig = auth.script_sig;
        input.witness = auth.witness;
    }
    // Marker and flag only when some input actually carries witness data
    signed.has_witness = signed.inputs.iter().any(|i| !i.witness.is_empty());
    Ok(signed)
}

/// Signed, broadcast-ready bytes
pub fn build_signed(
    tx: &BtcTransaction,
    signatures: &[BtcSignature],
    pubkeys: &[Vec<u8>],
) -> TxResult<Vec<u8>> {
    let signed = apply_signatures(tx, signatures, pubkeys)?;
    Ok(serialize(&signed))
}

/// Serialize and compute ids and size metrics
pub fn compile(tx: &BtcTransaction) -> CompiledBitcoinTransaction {
    let raw_tx = serialize(tx);
    let base = serialize_without_witness(tx);

    let txid = display_hash(&base);
    let wtxid = if tx.has_witness { display_hash(&raw_tx) } else { txid };

    let weight = base.len() * 3 + raw_tx.len();
    let vsize = (weight + 3) / 4;

    log_debug!(
        "btc",
        "compiled transaction",
        inputs = tx.inputs.len(),
        bytes = raw_tx.len(),
        vsize = vsize,
        txid = hex::encode(txid),
    );

    CompiledBitcoinTransaction {
        raw_tx,
        txid,
        wtxid,
        weight,
        vsize,
    }
}

fn display_hash(data: &[u8]) -> [u8; 32] {
    let mut hash = sha256d::Hash::hash(data).to_byte_array();
    hash.reverse();
    hash
}
