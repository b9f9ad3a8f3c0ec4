//! EIP-1559 transaction assembly
//!
//! Unsigned payload: `0x02 || RLP([chainId, nonce, maxPriorityFeePerGas,
//! maxFeePerGas, gasLimit, to, value, data, accessList])`.
//! The signed payload appends `yParity, r, s` to the same list.

use super::access_list::encode_access_list;
use super::types::{EvmSignature, EvmTransaction};
use crate::codec::integer::be_minimal_u256;
use crate::codec::rlp::{
    encode_bytes, encode_list, encode_optional_bytes, encode_uint, encode_uint_bounded,
};
use crate::error::{TxError, TxResult};
use crate::log_debug;
use crate::utils::config::{EncodingConfig, EvmFieldWidths};
use ethers_core::types::U256;
use tiny_keccak::{Hasher, Keccak};

/// EIP-2718 type byte for fee-market transactions
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// Builds EIP-1559 payloads under a fixed set of field widths
#[derive(Debug, Clone, Default)]
pub struct Eip1559Assembler {
    widths: EvmFieldWidths,
}

impl Eip1559Assembler {
    pub fn new(config: &EncodingConfig) -> Self {
        Self { widths: config.evm }
    }

    /// `0x02 || RLP(fields)` ready for hashing
    pub fn build_unsigned(&self, tx: &EvmTransaction) -> TxResult<Vec<u8>> {
        let items = self.encode_fields(tx)?;
        let payload = typed_payload(&items);

        log_debug!(
            "evm",
            "built unsigned EIP-1559 payload",
            bytes = payload.len(),
            access_list_entries = tx.access_list.len(),
        );
        Ok(payload)
    }

    /// `0x02 || RLP(fields ++ [yParity, r, s])` ready for broadcast
    pub fn build_signed(&self, tx: &EvmTransaction, sig: &EvmSignature) -> TxResult<Vec<u8>> {
        if sig.v > 1 {
            return Err(TxError::out_of_range(format!(
                "y-parity must be 0 or 1, got {}",
                sig.v
            )));
        }

        let mut items = self.encode_fields(tx)?;
        items.push(encode_uint(&U256::from(sig.v)));
        items.push(encode_bytes(&be_minimal_u256(&U256::from_big_endian(&sig.r))));
        items.push(encode_bytes(&be_minimal_u256(&U256::from_big_endian(&sig.s))));
        let payload = typed_payload(&items);

        log_debug!(
            "evm",
            "built signed EIP-1559 payload",
            bytes = payload.len(),
            tx_hash = hex::encode(transaction_hash(&payload)),
        );
        Ok(payload)
    }

    /// Unsigned payload and its signing hash in one step
    pub fn signing_hash_for(&self, tx: &EvmTransaction) -> TxResult<[u8; 32]> {
        Ok(signing_hash(&self.build_unsigned(tx)?))
    }

    fn encode_fields(&self, tx: &EvmTransaction) -> TxResult<Vec<Vec<u8>>> {
        Ok(vec![
            encode_uint_bounded(&tx.chain_id, self.widths.chain_id, "chain_id")?,
            encode_uint_bounded(&tx.nonce, self.widths.nonce, "nonce")?,
            encode_uint(&tx.max_priority_fee_per_gas),
            encode_uint(&tx.max_fee_per_gas),
            encode_uint_bounded(&tx.gas_limit, self.widths.gas_limit, "gas_limit")?,
            encode_optional_bytes(tx.to.as_ref().map(|a| a.as_slice())),
            encode_uint(&tx.value),
            encode_bytes(&tx.data),
            encode_access_list(&tx.access_list),
        ])
    }
}

fn typed_payload(items: &[Vec<u8>]) -> Vec<u8> {
    let rlp_data = encode_list(items);
    let mut typed = Vec::with_capacity(1 + rlp_data.len());
    typed.push(EIP1559_TX_TYPE);
    typed.extend_from_slice(&rlp_data);
    typed
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// keccak256 over the whole unsigned payload, type byte included
pub fn signing_hash(unsigned: &[u8]) -> [u8; 32] {
    keccak256(unsigned)
}

/// Hash identifying a signed transaction on chain
pub fn transaction_hash(signed: &[u8]) -> [u8; 32] {
    keccak256(signed)
}
