//! Staged copying between a byte source and a byte sink.
//!
//! Each round fills the staging buffer from the source, flips it, drains the
//! readable range into the sink and clears it again, until the source reports
//! end of stream.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use stagebuf::{copy, StagingBuffer};
//!
//! let mut src = Cursor::new(b"some bytes to move".to_vec());
//! let mut dst = Vec::new();
//! let mut buf = StagingBuffer::allocate(4);
//!
//! let moved = copy(&mut src, &mut dst, &mut buf)?;
//! assert_eq!(moved, 18);
//! assert_eq!(dst, b"some bytes to move");
//! # Ok::<(), stagebuf::StagingError>(())
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::Instant;

use log::{debug, trace};

use super::CopyReport;
use super::partial::PartialFile;
use super::report::DigestState;
use crate::buffer::StagingBuffer;
use crate::config::CopyConfig;
use crate::error::{Result, StagingError};

/// Performs one read from `reader` into the buffer's writable window.
///
/// Returns `Ok(None)` once the reader reports end of stream, otherwise the
/// number of bytes added. A full buffer yields `Ok(Some(0))` without
/// touching the reader. Interrupted reads are retried.
pub fn read_into<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut StagingBuffer,
) -> Result<Option<usize>> {
    if !buf.has_remaining() {
        return Ok(Some(0));
    }

    loop {
        match reader.read(buf.writable()) {
            Ok(0) => return Ok(None),
            Ok(n) => {
                buf.commit(n)?;
                return Ok(Some(n));
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Writes the buffer's whole readable range to `writer`.
///
/// On success the position has moved up to the limit and the number of
/// bytes written is returned.
pub fn write_from<W: Write + ?Sized>(writer: &mut W, buf: &mut StagingBuffer) -> Result<usize> {
    let n = buf.remaining();
    writer.write_all(buf.readable())?;
    buf.consume(n)?;
    Ok(n)
}

/// Moves every byte of `reader` into `writer` through `buf`.
///
/// The buffer is cleared before the first fill, and the writer is flushed
/// after the last drain. Returns the number of bytes moved. Any I/O error is
/// returned to the caller as soon as it happens.
pub fn copy<R, W>(reader: &mut R, writer: &mut W, buf: &mut StagingBuffer) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    copy_staged(reader, writer, buf, &mut DigestState::disabled())
}

pub(crate) fn copy_staged<R, W>(
    reader: &mut R,
    writer: &mut W,
    buf: &mut StagingBuffer,
    digest: &mut DigestState,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if buf.capacity() == 0 {
        return Err(StagingError::InvalidArgument {
            message: "staging buffer has zero capacity",
        });
    }

    buf.clear();
    let mut total = 0u64;
    let mut rounds = 0usize;

    while read_into(reader, buf)?.is_some() {
        buf.flip();
        digest.update(buf.readable());
        let n = write_from(writer, buf)?;
        buf.clear();

        total += n as u64;
        rounds += 1;
        trace!("staged round {}: {} bytes", rounds, n);
    }

    writer.flush()?;
    debug!("staged copy finished: {} bytes in {} rounds", total, rounds);
    Ok(total)
}

/// Copies the file at `src` to `dst` through a pooled staging buffer.
///
/// `dst` is created, or truncated if it exists. Both handles are closed on
/// every exit path. If the copy fails after `dst` was opened, `dst` is
/// removed, so a truncated or half-written file is never left behind.
pub fn copy_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    config: &CopyConfig,
) -> Result<CopyReport> {
    config.validate()?;
    let (src, dst) = (src.as_ref(), dst.as_ref());
    debug!(
        "copying {} -> {} (staging {} bytes)",
        src.display(),
        dst.display(),
        config.buffer_capacity()
    );

    let start = Instant::now();
    let mut input = File::open(src)?;
    let mut partial = PartialFile::new(dst);
    let mut output = File::create(dst)?;
    partial.arm();
    let mut buf = StagingBuffer::take(config.buffer_capacity());
    let mut digest = DigestState::new(config.hash_config());

    let bytes = copy_staged(&mut input, &mut output, &mut buf, &mut digest)?;
    drop(output);
    partial.complete();

    Ok(CopyReport {
        bytes,
        elapsed: start.elapsed(),
        hash: digest.finish(),
    })
}
