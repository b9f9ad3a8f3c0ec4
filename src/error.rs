//! Unified error types for txwire
//!
//! Every codec and assembler is a total, fail-fast function: a violation is
//! reported at the point it is detected and no partial output escapes.

use serde::{Deserialize, Serialize};

/// Main error type for all encoding, hashing and assembly operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    /// Structurally inconsistent input, e.g. signature count != input count
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A value does not fit the configured integer width
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Script type outside the supported set
    #[error("Unsupported script type: {0}")]
    UnsupportedScriptType(String),

    /// Malformed DER, hex or length field
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Reported by a signer implementation
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl TxError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    pub fn invalid_encoding(msg: impl Into<String>) -> Self {
        Self::InvalidEncoding(msg.into())
    }

    /// Stable category for JSON/FFI consumers
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedInput(_) => ErrorCode::MalformedInput,
            Self::OutOfRange(_) => ErrorCode::OutOfRange,
            Self::UnsupportedScriptType(_) => ErrorCode::UnsupportedScriptType,
            Self::InvalidEncoding(_) => ErrorCode::InvalidEncoding,
            Self::Signing(_) => ErrorCode::SigningFailed,
        }
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedInput,
    OutOfRange,
    UnsupportedScriptType,
    InvalidEncoding,
    SigningFailed,
}

/// Result type alias for txwire operations
pub type TxResult<T> = Result<T, TxError>;

// Conversions from common error types

impl From<hex::FromHexError> for TxError {
    fn from(e: hex::FromHexError) -> Self {
        TxError::InvalidEncoding(format!("hex: {}", e))
    }
}

impl From<serde_json::Error> for TxError {
    fn from(e: serde_json::Error) -> Self {
        TxError::InvalidEncoding(format!("json: {}", e))
    }
}

impl From<secp256k1::Error> for TxError {
    fn from(e: secp256k1::Error) -> Self {
        TxError::Signing(format!("secp256k1: {}", e))
    }
}
