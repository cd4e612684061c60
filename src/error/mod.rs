//! Error types for stagebuf.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StagingError>;

/// Errors that can occur while staging or transferring bytes.
///
/// Buffer operations that fail leave the buffer's cursors and contents
/// exactly as they were before the call.
#[derive(Debug)]
pub enum StagingError {
    /// An I/O error occurred while reading from a source or writing to a sink.
    Io(std::io::Error),

    /// An argument was outside the range the operation accepts.
    InvalidArgument {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// An absolute index was at or past the buffer's limit.
    IndexOutOfBounds {
        /// The index that was requested.
        index: usize,
        /// The limit at the time of the call.
        limit: usize,
    },

    /// A write would run past the buffer's limit.
    Overflow {
        /// Number of bytes the caller tried to write.
        requested: usize,
        /// Number of bytes that were available.
        remaining: usize,
    },

    /// A read would run past the buffer's limit.
    Underflow {
        /// Number of bytes the caller tried to read.
        requested: usize,
        /// Number of bytes that were available.
        remaining: usize,
    },

    /// The buffer is not in a state that permits the operation.
    InvalidState {
        /// Description of the offending state.
        message: &'static str,
    },

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl StagingError {
    /// Returns `true` for the argument-rejection family
    /// ([`InvalidArgument`](Self::InvalidArgument) and
    /// [`IndexOutOfBounds`](Self::IndexOutOfBounds)).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            StagingError::InvalidArgument { .. } | StagingError::IndexOutOfBounds { .. }
        )
    }
}

impl fmt::Display for StagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagingError::Io(e) => write!(f, "io error: {}", e),
            StagingError::InvalidArgument { message } => {
                write!(f, "invalid argument: {}", message)
            }
            StagingError::IndexOutOfBounds { index, limit } => {
                write!(f, "index {} out of bounds (limit {})", index, limit)
            }
            StagingError::Overflow {
                requested,
                remaining,
            } => write!(
                f,
                "buffer overflow: {} bytes requested, {} remaining",
                requested, remaining
            ),
            StagingError::Underflow {
                requested,
                remaining,
            } => write!(
                f,
                "buffer underflow: {} bytes requested, {} remaining",
                requested, remaining
            ),
            StagingError::InvalidState { message } => write!(f, "invalid state: {}", message),
            StagingError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for StagingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StagingError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StagingError {
    fn from(e: std::io::Error) -> Self {
        StagingError::Io(e)
    }
}
