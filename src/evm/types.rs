//! EIP-1559 transaction value types

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

/// Access list entry (EIP-2930)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListEntry {
    /// Contract address
    #[serde(with = "crate::serde_bytes::hex20")]
    pub address: [u8; 20],
    /// Storage keys, in the order they are to be committed
    #[serde(with = "crate::serde_bytes::hex32_list")]
    pub storage_keys: Vec<[u8; 32]>,
}

/// Unsigned EIP-1559 (type 0x02) transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTransaction {
    pub chain_id: U256,
    pub nonce: U256,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: U256,
    /// Recipient address (None for contract creation)
    #[serde(default, with = "crate::serde_bytes::hex20_option")]
    pub to: Option<[u8; 20]>,
    /// Value in wei
    pub value: U256,
    #[serde(default, with = "crate::serde_bytes::hex_vec")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub access_list: Vec<AccessListEntry>,
}

impl EvmTransaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// Signature over an EIP-1559 signing hash
///
/// `v` is the y-parity of the signature point (0 or 1), not the legacy
/// 27/28 or EIP-155 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmSignature {
    pub v: u8,
    #[serde(with = "crate::serde_bytes::hex32")]
    pub r: [u8; 32],
    #[serde(with = "crate::serde_bytes::hex32")]
    pub s: [u8; 32],
}

impl EvmSignature {
    /// Split a 64-byte compact `r || s` signature
    pub fn from_compact(v: u8, compact: &[u8; 64]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Self { v, r, s }
    }
}
