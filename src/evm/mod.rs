//! EVM (EIP-1559) transaction encoding
//!
//! Builds type-2 payloads and the keccak256 digest an external signer must sign.

pub mod access_list;
pub mod assembler;
pub mod types;

pub use assembler::{keccak256, signing_hash, transaction_hash, Eip1559Assembler, EIP1559_TX_TYPE};
pub use types::{AccessListEntry, EvmSignature, EvmTransaction};
