//! Configuration for copy behavior.
//!
//! - [`CopyConfig`] - Staging capacity and hashing
//! - [`HashConfig`] - Hash computation control

use crate::buffer::DEFAULT_CAPACITY;
use crate::error::StagingError;

/// Configuration for staged and memory-mapped copies.
///
/// The staging capacity bounds how many bytes move per fill/drain round.
/// It must be non-zero: a zero-capacity buffer can never make progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyConfig {
    buffer_capacity: usize,
    hash_config: HashConfig,
}

impl CopyConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if `buffer_capacity` is zero.
    pub fn new(buffer_capacity: usize) -> Result<Self, StagingError> {
        if buffer_capacity == 0 {
            return Err(StagingError::InvalidConfig {
                message: "buffer capacity must be non-zero",
            });
        }

        Ok(Self {
            buffer_capacity,
            hash_config: HashConfig::default(),
        })
    }

    /// Sets the staging buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Sets the hash configuration.
    pub fn with_hash_config(mut self, config: HashConfig) -> Self {
        self.hash_config = config;
        self
    }

    /// Returns the staging buffer capacity.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Returns the hash configuration.
    pub fn hash_config(&self) -> &HashConfig {
        &self.hash_config
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), StagingError> {
        Self::new(self.buffer_capacity).map(|_| ())
    }
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_CAPACITY,
            hash_config: HashConfig::default(),
        }
    }
}

/// Configuration for transfer hashing.
///
/// Controls whether a BLAKE3 digest of the copied bytes is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashConfig {
    /// Whether to compute BLAKE3 hashes.
    pub enabled: bool,
}

impl HashConfig {
    /// Creates a new hash configuration.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enables hashing.
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Disables hashing.
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
