//! Async stream of staged reads.
//!
//! Each item is one fill of a staging buffer from a `futures-io::AsyncRead`,
//! flipped and handed out as [`Bytes`].
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use stagebuf::stage_async;
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), stagebuf::StagingError> {
//!     let mut stream = stage_async(reader, 1024);
//!
//!     while let Some(piece) = stream.next().await {
//!         let piece = piece?;
//!         println!("staged {} bytes", piece.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::buffer::StagingBuffer;
use crate::error::StagingError;

pin_project! {
    /// A stream that yields one staged fill at a time from an async reader.
    ///
    /// This uses `futures_io::AsyncRead` which is runtime-agnostic.
    /// Works with tokio, async-std, smol, or any futures-compatible runtime.
    pub struct StageStream<R> {
        #[pin]
        reader: R,
        buf: StagingBuffer,
        offset: u64,
        finished: bool,
    }
}

impl<R> StageStream<R> {
    /// Creates a stream staging reads through a pooled buffer of `capacity`
    /// bytes.
    pub fn new(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: StagingBuffer::take(capacity),
            offset: 0,
            finished: false,
        }
    }

    /// Returns the number of bytes yielded so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl<R: AsyncRead> Stream for StageStream<R> {
    type Item = Result<Bytes, StagingError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        this.buf.clear();
        let n = match this.reader.poll_read(cx, this.buf.writable()) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Err(e)) => {
                *this.finished = true;
                return Poll::Ready(Some(Err(StagingError::Io(e))));
            }
            // End of stream, or a zero-capacity buffer that can never fill
            Poll::Ready(Ok(0)) => {
                *this.finished = true;
                return Poll::Ready(None);
            }
            Poll::Ready(Ok(n)) => n,
        };

        let staged = this
            .buf
            .commit(n)
            .and_then(|()| this.buf.flip().get(n));
        match staged {
            Ok(bytes) => {
                *this.offset += n as u64;
                Poll::Ready(Some(Ok(bytes)))
            }
            Err(e) => {
                *this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
        }
    }
}

/// Creates a staged read stream from an async reader.
///
/// For tokio users, `tokio_util::compat` converts `tokio::io::AsyncRead`
/// into `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use stagebuf::stage_async;
///
/// let tokio_reader = tokio::fs::File::open("file").await?;
/// let stream = stage_async(tokio_reader.compat(), 1024);
/// ```
pub fn stage_async<R: AsyncRead>(reader: R, capacity: usize) -> StageStream<R> {
    StageStream::new(reader, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stage_stream_empty() {
        let reader: &[u8] = &[];
        let stream = StageStream::new(reader, 16);
        let pieces: Vec<_> = futures_util::StreamExt::collect(stream).await;
        assert!(pieces.is_empty());
    }

    #[tokio::test]
    async fn test_stage_stream_respects_capacity() {
        let data: Vec<u8> = (0..100).map(|i| i as u8).collect();
        let reader: &[u8] = &data;
        let stream = StageStream::new(reader, 16);

        let pieces: Vec<_> = futures_util::StreamExt::collect(stream).await;
        let pieces: Vec<Bytes> = pieces.into_iter().collect::<Result<_, _>>().unwrap();

        assert!(pieces.iter().all(|p| p.len() <= 16));
        let joined: Vec<u8> = pieces.iter().flat_map(|p| p.iter().copied()).collect();
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn test_stage_stream_zero_capacity() {
        let reader: &[u8] = b"data";
        let stream = StageStream::new(reader, 0);
        let pieces: Vec<_> = futures_util::StreamExt::collect(stream).await;
        assert!(pieces.is_empty());
    }
}
