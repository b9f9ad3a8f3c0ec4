//! Utilities Module
//!
//! Logging and configuration shared across the crate.

pub mod config;
pub mod logging;

pub use config::{EncodingConfig, EvmFieldWidths, HashTypeEncoding};
