//! Async staged copy.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncRead, AsyncWrite};
use log::{debug, trace};

use crate::buffer::StagingBuffer;
use crate::error::StagingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyState {
    Start,
    Filling,
    Draining,
    Flushing,
    Done,
}

/// Future returned by [`copy_async`].
///
/// Resolves to the number of bytes moved. Polling it again after that
/// yields [`StagingError::InvalidState`].
#[must_use = "futures do nothing unless polled"]
pub struct CopyFuture<'a, R: ?Sized, W: ?Sized> {
    reader: &'a mut R,
    writer: &'a mut W,
    buf: &'a mut StagingBuffer,
    state: CopyState,
    total: u64,
}

impl<R, W> Future for CopyFuture<'_, R, W>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    type Output = Result<u64, StagingError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;

        loop {
            match this.state {
                CopyState::Start => {
                    if this.buf.capacity() == 0 {
                        this.state = CopyState::Done;
                        return Poll::Ready(Err(StagingError::InvalidArgument {
                            message: "staging buffer has zero capacity",
                        }));
                    }
                    this.buf.clear();
                    this.state = CopyState::Filling;
                }
                CopyState::Filling => {
                    let n = match Pin::new(&mut *this.reader).poll_read(cx, this.buf.writable()) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Poll::Ready(Err(e)) => {
                            this.state = CopyState::Done;
                            return Poll::Ready(Err(e.into()));
                        }
                        Poll::Ready(Ok(n)) => n,
                    };

                    if n == 0 {
                        this.state = CopyState::Flushing;
                        continue;
                    }
                    if let Err(e) = this.buf.commit(n) {
                        this.state = CopyState::Done;
                        return Poll::Ready(Err(e));
                    }
                    this.buf.flip();
                    this.state = CopyState::Draining;
                }
                CopyState::Draining => {
                    while this.buf.has_remaining() {
                        let written =
                            match Pin::new(&mut *this.writer).poll_write(cx, this.buf.readable()) {
                                Poll::Pending => return Poll::Pending,
                                Poll::Ready(Ok(0)) => {
                                    this.state = CopyState::Done;
                                    return Poll::Ready(Err(
                                        io::Error::from(io::ErrorKind::WriteZero).into()
                                    ));
                                }
                                Poll::Ready(Ok(n)) => n,
                                Poll::Ready(Err(e))
                                    if e.kind() == io::ErrorKind::Interrupted =>
                                {
                                    continue;
                                }
                                Poll::Ready(Err(e)) => {
                                    this.state = CopyState::Done;
                                    return Poll::Ready(Err(e.into()));
                                }
                            };
                        if let Err(e) = this.buf.consume(written) {
                            this.state = CopyState::Done;
                            return Poll::Ready(Err(e));
                        }
                        this.total += written as u64;
                    }
                    trace!("async staged round: {} bytes total", this.total);
                    this.buf.clear();
                    this.state = CopyState::Filling;
                }
                CopyState::Flushing => {
                    match Pin::new(&mut *this.writer).poll_flush(cx) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) => {
                            this.state = CopyState::Done;
                            return Poll::Ready(Err(e.into()));
                        }
                        Poll::Ready(Ok(())) => {}
                    }
                    this.state = CopyState::Done;
                    debug!("async staged copy finished: {} bytes", this.total);
                    return Poll::Ready(Ok(this.total));
                }
                CopyState::Done => {
                    return Poll::Ready(Err(StagingError::InvalidState {
                        message: "copy already completed",
                    }));
                }
            }
        }
    }
}

/// Moves every byte of `reader` into `writer` through `buf`, asynchronously.
///
/// Same fill, flip, drain, clear loop as [`copy`](crate::copy), over
/// `futures_io` traits. The writer is flushed once the reader is exhausted.
pub fn copy_async<'a, R, W>(
    reader: &'a mut R,
    writer: &'a mut W,
    buf: &'a mut StagingBuffer,
) -> CopyFuture<'a, R, W>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    CopyFuture {
        reader,
        writer,
        buf,
        state: CopyState::Start,
        total: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_async_roundtrips_bytes() {
        let data: Vec<u8> = (0..5000).map(|i| (i % 256) as u8).collect();
        let mut reader: &[u8] = &data;
        let mut writer: Vec<u8> = Vec::new();
        let mut buf = StagingBuffer::allocate(64);

        let moved = copy_async(&mut reader, &mut writer, &mut buf).await.unwrap();
        assert_eq!(moved, data.len() as u64);
        assert_eq!(writer, data);
    }

    #[tokio::test]
    async fn test_copy_async_empty_source() {
        let mut reader: &[u8] = &[];
        let mut writer: Vec<u8> = Vec::new();
        let mut buf = StagingBuffer::allocate(8);

        assert_eq!(copy_async(&mut reader, &mut writer, &mut buf).await.unwrap(), 0);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_copy_future_polled_after_completion() {
        use futures_util::FutureExt;

        let mut reader: &[u8] = b"abc";
        let mut writer: Vec<u8> = Vec::new();
        let mut buf = StagingBuffer::allocate(8);
        let mut copy = copy_async(&mut reader, &mut writer, &mut buf);

        assert!(matches!((&mut copy).now_or_never(), Some(Ok(3))));
        assert!(matches!(
            (&mut copy).now_or_never(),
            Some(Err(StagingError::InvalidState { .. }))
        ));
    }

    #[tokio::test]
    async fn test_copy_async_zero_capacity() {
        let mut reader: &[u8] = b"abc";
        let mut writer: Vec<u8> = Vec::new();
        let mut buf = StagingBuffer::allocate(0);

        let err = copy_async(&mut reader, &mut writer, &mut buf)
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
