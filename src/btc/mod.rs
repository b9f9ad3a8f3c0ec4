//! Bitcoin transaction encoding
//!
//! Legacy and SegWit serialization, scriptSig/witness construction and the
//! legacy and BIP-143 signature hashes.

pub mod assembler;
pub mod script;
pub mod sighash;
pub mod types;

pub use assembler::{
    apply_signatures, build_signed, compile, serialize, serialize_without_witness,
    CompiledBitcoinTransaction,
};
pub use script::{authorize_input, InputAuthorization};
pub use sighash::SighashEngine;
pub use types::{BtcSignature, BtcTransaction, ScriptType, SigHashType, TxInput, TxOutput};
