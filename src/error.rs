//! Error types for the internal key format
//!
//! Provides a unified error type for all fallible operations.
//! Accessors on constructed keys never fail; errors only surface at the
//! encode boundary, in checked decoding, and in configuration.

use thiserror::Error;

/// Result type alias using KeyFormatError
pub type Result<T> = std::result::Result<T, KeyFormatError>;

/// Unified error type for key encoding operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyFormatError {
    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    #[error("Key too large: {size} bytes (max {max})")]
    KeyTooLarge { size: usize, max: usize },

    #[error("Value too large: {size} bytes (max {max})")]
    ValueTooLarge { size: usize, max: usize },

    #[error("Sequence number {0} does not fit in 56 bits")]
    SequenceOverflow(u64),

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("Corrupted internal key: {0}")]
    Corruption(String),

    #[error("Invalid value type: 0x{0:02x}")]
    InvalidValueType(u8),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
