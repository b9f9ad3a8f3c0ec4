//! Transaction Compiler
//!
//! Runs the full hash, sign and assemble pipeline for one transaction.

use super::signer::{address_from_public_key, DigestSigner};
use crate::btc::{
    assembler, BtcSignature, BtcTransaction, CompiledBitcoinTransaction, SigHashType,
    SighashEngine,
};
use crate::error::TxResult;
use crate::evm::{transaction_hash, Eip1559Assembler, EvmSignature, EvmTransaction};
use crate::log_debug;
use serde::{Deserialize, Serialize};

/// Compiled Ethereum transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledEthereumTransaction {
    /// Typed signed payload (ready to broadcast)
    #[serde(with = "crate::serde_bytes::hex_vec")]
    pub raw_tx: Vec<u8>,
    /// Transaction hash
    #[serde(with = "crate::serde_bytes::hex32")]
    pub tx_hash: [u8; 32],
    /// Sender address derived from the signer's key
    #[serde(with = "crate::serde_bytes::hex20")]
    pub from: [u8; 20],
}

/// Hash, sign and assemble an EIP-1559 transaction
pub fn compile_ethereum_transaction<S: DigestSigner + ?Sized>(
    assembler: &Eip1559Assembler,
    tx: &EvmTransaction,
    signer: &S,
) -> TxResult<CompiledEthereumTransaction> {
    let digest = assembler.signing_hash_for(tx)?;
    let sig = signer.sign_digest(&digest)?;

    let signature = EvmSignature {
        v: sig.recovery_id,
        r: sig.r,
        s: sig.s,
    };
    let raw_tx = assembler.build_signed(tx, &signature)?;
    let tx_hash = transaction_hash(&raw_tx);
    let from = address_from_public_key(&signer.public_key())?;

    log_debug!(
        "signing",
        "compiled EIP-1559 transaction",
        chain_id = tx.chain_id,
        bytes = raw_tx.len(),
        tx_hash = hex::encode(tx_hash),
    );

    Ok(CompiledEthereumTransaction {
        raw_tx,
        tx_hash,
        from,
    })
}

/// Hash every input, sign each digest with one key, and assemble
///
/// Every input is assumed to be spendable by `signer`.
pub fn compile_bitcoin_transaction<S: DigestSigner + ?Sized>(
    engine: &SighashEngine,
    tx: &BtcTransaction,
    script_codes: &[Vec<u8>],
    values: &[u64],
    hash_type: SigHashType,
    signer: &S,
) -> TxResult<CompiledBitcoinTransaction> {
    let hashes = engine.all_hashes_to_sign(tx, script_codes, values, hash_type)?;

    let signatures = hashes
        .iter()
        .map(|hash| {
            let sig = signer.sign_digest(hash)?;
            Ok(BtcSignature {
                r: sig.r,
                s: sig.s,
                hash_type,
            })
        })
        .collect::<TxResult<Vec<_>>>()?;
    let pubkeys = vec![signer.public_key().to_vec(); tx.inputs.len()];

    let signed = assembler::apply_signatures(tx, &signatures, &pubkeys)?;
    let compiled = assembler::compile(&signed);

    log_debug!(
        "signing",
        "compiled Bitcoin transaction",
        inputs = tx.inputs.len(),
        vsize = compiled.vsize,
        txid = hex::encode(compiled.txid),
    );

    Ok(compiled)
}
