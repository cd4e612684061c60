//! Copy outcome reporting.

use std::time::Duration;

use super::TransferHash;
use crate::config::HashConfig;

/// Outcome of a completed file copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Number of bytes written to the destination.
    pub bytes: u64,

    /// Wall-clock time from opening the source to the final flush.
    pub elapsed: Duration,

    /// Digest of the copied bytes (if computed).
    pub hash: Option<TransferHash>,
}

impl CopyReport {
    /// Returns the elapsed time in whole milliseconds.
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Running BLAKE3 digest of the bytes a copy has moved so far.
#[cfg(feature = "hash-blake3")]
pub(crate) struct DigestState {
    hasher: Option<blake3::Hasher>,
}

#[cfg(not(feature = "hash-blake3"))]
pub(crate) struct DigestState;

#[cfg(feature = "hash-blake3")]
impl DigestState {
    /// Creates a digest state based on the configuration.
    pub(crate) fn new(config: &HashConfig) -> Self {
        Self {
            hasher: config.enabled.then(blake3::Hasher::new),
        }
    }

    /// A digest state that never hashes.
    pub(crate) fn disabled() -> Self {
        Self { hasher: None }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        if let Some(h) = self.hasher.as_mut() {
            h.update(data);
        }
    }

    pub(crate) fn finish(&self) -> Option<TransferHash> {
        self.hasher
            .as_ref()
            .map(|h| TransferHash::new(h.finalize().into()))
    }
}

#[cfg(not(feature = "hash-blake3"))]
impl DigestState {
    /// Creates a digest state (no-op when hashing is compiled out).
    pub(crate) fn new(_config: &HashConfig) -> Self {
        Self
    }

    pub(crate) fn disabled() -> Self {
        Self
    }

    pub(crate) fn update(&mut self, _data: &[u8]) {}

    pub(crate) fn finish(&self) -> Option<TransferHash> {
        None
    }
}
