//! External Signature Compilation
//!
//! Glue for signing outside the encoders:
//! 1. Generate pre-image hashes from unsigned transactions
//! 2. Sign them through a [`DigestSigner`]
//! 3. Compile signatures into final signed transactions

pub mod compiler;
pub mod preimage;
pub mod signer;

pub use compiler::*;
pub use preimage::*;
pub use signer::*;
