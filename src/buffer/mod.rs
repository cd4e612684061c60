//! Staging buffers.
//!
//! - [`StagingBuffer`] - Fixed-capacity byte container with cursor semantics
//!
//! Storage for pooled buffers comes from a thread-local pool. The pool is an
//! implementation detail and not part of the public API.

mod pool;
mod staging;

pub use pool::DEFAULT_CAPACITY;
pub use staging::StagingBuffer;
