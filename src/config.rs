//! Configuration for the key encoder and memtable
//!
//! Centralized limits with sensible defaults. The defaults match the
//! capacity of the 32-bit size fields in the record layout.

use crate::error::{KeyFormatError, Result};
use crate::format::{MAX_KEY_SIZE, MAX_VALUE_SIZE};

/// Main configuration for encoding and buffering internal keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Encoder Configuration
    // -------------------------------------------------------------------------
    /// Largest user key accepted by the encoder (in bytes)
    pub max_key_size: usize,

    /// Largest value accepted by the encoder (in bytes)
    pub max_value_size: usize,

    // -------------------------------------------------------------------------
    // MemTable Configuration
    // -------------------------------------------------------------------------
    /// Max size of memtable before flush (in bytes)
    pub memtable_size_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_key_size: MAX_KEY_SIZE,
            max_value_size: MAX_VALUE_SIZE,
            memtable_size_limit: 4 * 1024 * 1024, // 4 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the largest user key the encoder accepts
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set the largest value the encoder accepts
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    /// Set the memtable size limit (in bytes)
    pub fn memtable_size_limit(mut self, size: usize) -> Self {
        self.config.memtable_size_limit = size;
        self
    }

    /// Validate and return the config
    ///
    /// Limits may be tightened but never raised past what the 32-bit
    /// size fields can hold.
    pub fn build(self) -> Result<Config> {
        if self.config.max_key_size > MAX_KEY_SIZE {
            return Err(KeyFormatError::Config(format!(
                "max_key_size {} exceeds field capacity {}",
                self.config.max_key_size, MAX_KEY_SIZE
            )));
        }

        if self.config.max_value_size > MAX_VALUE_SIZE {
            return Err(KeyFormatError::Config(format!(
                "max_value_size {} exceeds field capacity {}",
                self.config.max_value_size, MAX_VALUE_SIZE
            )));
        }

        if self.config.memtable_size_limit == 0 {
            return Err(KeyFormatError::Config(
                "memtable_size_limit must be non-zero".to_string(),
            ));
        }

        Ok(self.config)
    }
}
