//! stagebuf
//!
//! Fixed-capacity staging buffers and the copy loop built on them.
//!
//! A [`StagingBuffer`] owns a fixed run of bytes and four cursors:
//! `capacity`, `limit`, `position` and an optional `mark`, with
//! `mark <= position <= limit <= capacity` at all times. Bytes are `put`
//! in, the buffer is `flip`ped, and bytes are `get` out again.
//!
//! On top of it the crate offers the classic staged copy between a byte
//! source and a byte sink (fill, flip, drain, clear), a file-to-file variant
//! with an optional BLAKE3 digest, and a memory-mapped file copy.
//!
//! The crate intentionally:
//! - does NOT define its own channel or socket types
//! - does NOT share buffers across threads
//! - does NOT persist anything
//!
//! # Buffer
//!
//! ```
//! use stagebuf::StagingBuffer;
//!
//! let mut buf = StagingBuffer::allocate(1024);
//! buf.put(b"asdfg")?;
//! buf.flip();
//!
//! assert_eq!(&buf.get(2)?[..], b"as");
//! buf.mark();
//! assert_eq!(&buf.get(2)?[..], b"df");
//! buf.reset()?;
//! assert_eq!(buf.position(), 2);
//! assert_eq!(buf.remaining(), 3);
//! # Ok::<(), stagebuf::StagingError>(())
//! ```
//!
//! # File copy
//!
//! ```no_run
//! use stagebuf::{copy_file, CopyConfig, StagingError};
//!
//! fn main() -> Result<(), StagingError> {
//!     let report = copy_file("1.jpg", "2.jpg", &CopyConfig::default())?;
//!     println!("copied {} bytes in {} ms", report.bytes, report.elapsed_millis());
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_io::{AsyncRead, AsyncWrite};
//! use stagebuf::{copy_async, StagingBuffer};
//!
//! async fn demo<R, W>(mut reader: R, mut writer: W) -> Result<u64, stagebuf::StagingError>
//! where
//!     R: AsyncRead + Unpin,
//!     W: AsyncWrite + Unpin,
//! {
//!     let mut buf = StagingBuffer::allocate(1024);
//!     copy_async(&mut reader, &mut writer, &mut buf).await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod transfer;

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use buffer::{DEFAULT_CAPACITY, StagingBuffer};
pub use config::{CopyConfig, HashConfig};
pub use error::{Result, StagingError};
pub use transfer::{CopyReport, TransferHash, copy, copy_file, read_into, write_from};

#[cfg(feature = "mmap")]
pub use transfer::copy_mapped;

#[cfg(feature = "async-io")]
pub use async_stream::{CopyFuture, StageStream, copy_async, stage_async};
