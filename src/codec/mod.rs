//! Byte-level codecs shared by the EVM and Bitcoin assemblers.

pub mod der;
pub mod integer;
pub mod rlp;

pub use integer::{var_int, write_var_bytes, write_var_int};
