//! Async staging support.
//!
//! This module provides asynchronous staging using the `futures-io`
//! traits, making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! - [`stage_async`] - Stream of staged fills from an async reader
//! - [`copy_async`] - Fill, flip, drain, clear between an async reader and writer
//!
//! This module requires the `async-io` feature to be enabled.

mod copy;
mod stream;

pub use copy::{CopyFuture, copy_async};
pub use stream::{StageStream, stage_async};
