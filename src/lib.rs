//! txwire: canonical transaction encoding and signing-hash engine
//!
//! Byte-exact, deterministic builders for two transaction families:
//! - **evm**: EIP-1559 (type 0x02) payloads and their keccak256 signing hash
//! - **btc**: legacy and SegWit serialization, legacy and BIP-143 sighash
//!
//! Shared building blocks live in **codec** (RLP, integer widths, VarInt,
//! DER). Key material never enters the encoders; **signing** defines the
//! [`signing::DigestSigner`] seam plus a local secp256k1 implementation and
//! compile flows that chain hash, sign and assemble.
//!
//! # Example
//!
//! ```rust,ignore
//! use txwire::evm::{Eip1559Assembler, EvmSignature};
//!
//! let assembler = Eip1559Assembler::default();
//! let digest = assembler.signing_hash_for(&tx)?;
//! let sig: EvmSignature = external_signer.sign(digest);
//! let raw = assembler.build_signed(&tx, &sig)?;
//! ```

pub mod btc;
pub mod codec;
pub mod error;
pub mod evm;
pub mod serde_bytes;
pub mod signing;
pub mod utils;

// Re-export key types for convenience
pub use error::{ErrorCode, TxError, TxResult};
pub use utils::config::EncodingConfig;
