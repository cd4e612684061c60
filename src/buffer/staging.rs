//! The staging buffer - a fixed-capacity byte container with cursors.
//!
//! A [`StagingBuffer`] owns `capacity` bytes of storage and tracks three
//! cursors over it plus an optional mark:
//!
//! ```text
//! 0 <= mark <= position <= limit <= capacity
//! ```
//!
//! Writes go in at `position` and may not pass `limit`. [`flip`] turns the
//! bytes written so far into the readable range `[0, position)`; reads then
//! consume from `position` up to `limit`. [`clear`] makes the whole storage
//! writable again without erasing it.
//!
//! # Example
//!
//! ```
//! use stagebuf::StagingBuffer;
//!
//! let mut buf = StagingBuffer::allocate(1024);
//! buf.put(b"test")?;
//! assert_eq!(buf.position(), 4);
//!
//! buf.flip();
//! assert_eq!((buf.position(), buf.limit()), (0, 4));
//!
//! assert_eq!(&buf.get(4)?[..], b"test");
//! assert!(!buf.has_remaining());
//! # Ok::<(), stagebuf::StagingError>(())
//! ```
//!
//! [`flip`]: StagingBuffer::flip
//! [`clear`]: StagingBuffer::clear

use std::fmt;

use bytes::{Buf, Bytes};

use super::pool;
use crate::error::{Result, StagingError};

/// A fixed-capacity byte buffer with `capacity`, `limit`, `position` and
/// `mark` cursors.
///
/// The buffer is a plain owned value: single-threaded, synchronous, and
/// mutated in place. Callers sharing one across threads must serialize
/// access themselves.
pub struct StagingBuffer {
    storage: Vec<u8>,
    limit: usize,
    position: usize,
    mark: Option<usize>,
    pooled: bool,
}

impl StagingBuffer {
    /// Allocates a zero-filled buffer of `capacity` bytes.
    ///
    /// The new buffer has `position == 0`, `limit == capacity` and no mark.
    pub fn allocate(capacity: usize) -> Self {
        Self::from_storage(vec![0u8; capacity], false)
    }

    /// Allocates a buffer from a signed capacity.
    ///
    /// Returns [`StagingError::InvalidArgument`] if `capacity` is negative
    /// or the storage cannot be reserved.
    pub fn try_allocate(capacity: i64) -> Result<Self> {
        const TOO_LARGE: StagingError = StagingError::InvalidArgument {
            message: "capacity exceeds addressable memory",
        };

        if capacity < 0 {
            return Err(StagingError::InvalidArgument {
                message: "capacity must not be negative",
            });
        }
        let capacity = usize::try_from(capacity).map_err(|_| TOO_LARGE)?;

        let mut storage = Vec::new();
        storage.try_reserve_exact(capacity).map_err(|_| TOO_LARGE)?;
        storage.resize(capacity, 0);
        Ok(Self::from_storage(storage, false))
    }

    /// Takes a zero-filled buffer from the thread-local pool.
    ///
    /// Behaves exactly like [`allocate`](Self::allocate); the storage goes
    /// back to the pool when the buffer is dropped.
    pub fn take(capacity: usize) -> Self {
        Self::from_storage(pool::take(capacity), true)
    }

    fn from_storage(storage: Vec<u8>, pooled: bool) -> Self {
        let limit = storage.len();
        Self {
            storage,
            limit,
            position: 0,
            mark: None,
            pooled,
        }
    }

    /// Returns the total number of bytes the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the exclusive bound of the accessible range.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the index of the next byte to read or write.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the marked position, if any.
    pub fn mark_position(&self) -> Option<usize> {
        self.mark
    }

    /// Moves the position cursor.
    ///
    /// Fails with [`StagingError::InvalidArgument`] if `position > limit`.
    /// A mark beyond the new position is discarded.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            return Err(StagingError::InvalidArgument {
                message: "position must not exceed limit",
            });
        }
        self.position = position;
        if self.mark.is_some_and(|m| m > position) {
            self.mark = None;
        }
        Ok(())
    }

    /// Moves the limit cursor.
    ///
    /// Fails with [`StagingError::InvalidArgument`] if `limit > capacity`.
    /// The position is pulled back to the new limit if it lay beyond it, and
    /// a mark beyond the new limit is discarded.
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.capacity() {
            return Err(StagingError::InvalidArgument {
                message: "limit must not exceed capacity",
            });
        }
        self.limit = limit;
        if self.position > limit {
            self.position = limit;
        }
        if self.mark.is_some_and(|m| m > limit) {
            self.mark = None;
        }
        Ok(())
    }

    /// Returns the number of bytes between position and limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Returns `true` if at least one byte lies between position and limit.
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Copies `src` in at the current position and advances past it.
    ///
    /// Fails with [`StagingError::Overflow`] if `src` does not fit before the
    /// limit; nothing is written in that case.
    pub fn put(&mut self, src: &[u8]) -> Result<()> {
        let end = self.checked_end_for_write(src.len())?;
        self.storage[self.position..end].copy_from_slice(src);
        self.position = end;
        Ok(())
    }

    /// Writes a single byte at the current position.
    pub fn put_u8(&mut self, byte: u8) -> Result<()> {
        let end = self.checked_end_for_write(1)?;
        self.storage[self.position] = byte;
        self.position = end;
        Ok(())
    }

    /// Reads `count` bytes from the current position and advances past them.
    ///
    /// Fails with [`StagingError::Underflow`] if fewer than `count` bytes
    /// remain; the position is left untouched in that case.
    pub fn get(&mut self, count: usize) -> Result<Bytes> {
        let end = self.checked_end_for_read(count)?;
        let out = Bytes::copy_from_slice(&self.storage[self.position..end]);
        self.position = end;
        Ok(out)
    }

    /// Fills `dst` from the current position and advances past the copied
    /// bytes.
    pub fn get_into(&mut self, dst: &mut [u8]) -> Result<()> {
        let end = self.checked_end_for_read(dst.len())?;
        dst.copy_from_slice(&self.storage[self.position..end]);
        self.position = end;
        Ok(())
    }

    /// Reads a single byte from the current position.
    pub fn get_u8(&mut self) -> Result<u8> {
        let end = self.checked_end_for_read(1)?;
        let byte = self.storage[self.position];
        self.position = end;
        Ok(byte)
    }

    /// Reads the byte at `index` without moving any cursor.
    ///
    /// Fails with [`StagingError::IndexOutOfBounds`] if `index >= limit`.
    pub fn get_at(&self, index: usize) -> Result<u8> {
        if index >= self.limit {
            return Err(StagingError::IndexOutOfBounds {
                index,
                limit: self.limit,
            });
        }
        Ok(self.storage[index])
    }

    /// Switches from writing to reading: `limit = position`, `position = 0`,
    /// mark cleared.
    pub fn flip(&mut self) -> &mut Self {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
        self
    }

    /// Rewinds for a repeat read of `[0, limit)`: `position = 0`, mark cleared.
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = None;
        self
    }

    /// Resets the cursors for writing: `position = 0`, `limit = capacity`,
    /// mark cleared.
    ///
    /// The stored bytes are not erased.
    pub fn clear(&mut self) -> &mut Self {
        self.position = 0;
        self.limit = self.capacity();
        self.mark = None;
        self
    }

    /// Records the current position as the mark.
    pub fn mark(&mut self) -> &mut Self {
        self.mark = Some(self.position);
        self
    }

    /// Moves the position back to the mark.
    ///
    /// Fails with [`StagingError::InvalidState`] if no mark is set. The mark
    /// stays set, so `reset` may be repeated.
    pub fn reset(&mut self) -> Result<()> {
        match self.mark {
            Some(mark) => {
                self.position = mark;
                Ok(())
            }
            None => Err(StagingError::InvalidState {
                message: "reset called without a mark",
            }),
        }
    }

    /// Moves the unread bytes `[position, limit)` to the front and prepares
    /// the buffer for writing after them.
    ///
    /// Afterwards `position = remaining`, `limit = capacity` and the mark is
    /// cleared.
    pub fn compact(&mut self) -> &mut Self {
        let remaining = self.remaining();
        self.storage.copy_within(self.position..self.limit, 0);
        self.position = remaining;
        self.limit = self.capacity();
        self.mark = None;
        self
    }

    /// Returns the bytes between position and limit.
    pub fn readable(&self) -> &[u8] {
        &self.storage[self.position..self.limit]
    }

    /// Returns the writable window between position and limit.
    ///
    /// Bytes written through this slice become part of the buffer only after
    /// [`commit`](Self::commit).
    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.storage[self.position..self.limit]
    }

    /// Advances the position over `count` bytes written through
    /// [`writable`](Self::writable).
    pub fn commit(&mut self, count: usize) -> Result<()> {
        self.position = self.checked_end_for_write(count)?;
        Ok(())
    }

    /// Advances the position over `count` bytes consumed through
    /// [`readable`](Self::readable).
    pub fn consume(&mut self, count: usize) -> Result<()> {
        self.position = self.checked_end_for_read(count)?;
        Ok(())
    }

    fn checked_end_for_write(&self, len: usize) -> Result<usize> {
        if len > self.remaining() {
            return Err(StagingError::Overflow {
                requested: len,
                remaining: self.remaining(),
            });
        }
        Ok(self.position + len)
    }

    fn checked_end_for_read(&self, len: usize) -> Result<usize> {
        if len > self.remaining() {
            return Err(StagingError::Underflow {
                requested: len,
                remaining: self.remaining(),
            });
        }
        Ok(self.position + len)
    }
}

impl Default for StagingBuffer {
    fn default() -> Self {
        Self::allocate(pool::DEFAULT_CAPACITY)
    }
}

impl Clone for StagingBuffer {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            limit: self.limit,
            position: self.position,
            mark: self.mark,
            pooled: false,
        }
    }
}

impl fmt::Debug for StagingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagingBuffer")
            .field("capacity", &self.capacity())
            .field("limit", &self.limit)
            .field("position", &self.position)
            .field("mark", &self.mark)
            .finish()
    }
}

impl Drop for StagingBuffer {
    fn drop(&mut self) {
        if self.pooled {
            pool::give_back(std::mem::take(&mut self.storage));
        }
    }
}

/// Reading a flipped buffer through the `bytes` API.
///
/// `advance` panics when asked to skip past the limit, as the [`Buf`]
/// contract requires.
impl Buf for StagingBuffer {
    fn remaining(&self) -> usize {
        self.limit - self.position
    }

    fn chunk(&self) -> &[u8] {
        self.readable()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= Buf::remaining(self),
            "cannot advance past limit: {} > {}",
            cnt,
            Buf::remaining(self)
        );
        self.position += cnt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cursors(buf: &StagingBuffer, position: usize, limit: usize, capacity: usize) {
        assert_eq!(buf.position(), position, "position");
        assert_eq!(buf.limit(), limit, "limit");
        assert_eq!(buf.capacity(), capacity, "capacity");
    }

    #[test]
    fn test_allocate() {
        let buf = StagingBuffer::allocate(1024);
        assert_cursors(&buf, 0, 1024, 1024);
        assert_eq!(buf.mark_position(), None);
        assert!(buf.readable().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_allocate_zero_capacity() {
        let mut buf = StagingBuffer::allocate(0);
        assert_cursors(&buf, 0, 0, 0);
        assert!(!buf.has_remaining());
        assert!(buf.put(b"").is_ok());
        assert!(matches!(
            buf.put(b"x"),
            Err(StagingError::Overflow {
                requested: 1,
                remaining: 0
            })
        ));
    }

    #[test]
    fn test_try_allocate_negative() {
        let err = StagingBuffer::try_allocate(-1).unwrap_err();
        assert!(matches!(err, StagingError::InvalidArgument { .. }));

        let buf = StagingBuffer::try_allocate(16).unwrap();
        assert_cursors(&buf, 0, 16, 16);
    }

    #[test]
    fn test_try_allocate_unreservable() {
        let err = StagingBuffer::try_allocate(i64::MAX).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(matches!(
            err,
            StagingError::InvalidArgument {
                message: "capacity exceeds addressable memory"
            }
        ));
    }

    #[test]
    fn test_put_flip_get() {
        let mut buf = StagingBuffer::allocate(1024);
        buf.put(b"test").unwrap();
        assert_cursors(&buf, 4, 1024, 1024);

        buf.flip();
        assert_cursors(&buf, 0, 4, 1024);

        let data = buf.get(4).unwrap();
        assert_eq!(&data[..], b"test");
        assert_cursors(&buf, 4, 4, 1024);
    }

    #[test]
    fn test_mark_and_reset() {
        let mut buf = StagingBuffer::allocate(1024);
        buf.put(b"asdfg").unwrap();
        buf.flip();

        assert_eq!(&buf.get(2).unwrap()[..], b"as");
        assert_eq!(buf.position(), 2);

        buf.mark();
        assert_eq!(&buf.get(2).unwrap()[..], b"df");
        assert_eq!(buf.position(), 4);

        buf.reset().unwrap();
        assert_eq!(buf.position(), 2);
        assert!(buf.has_remaining());
        assert_eq!(buf.remaining(), 3);

        // The mark survives a reset
        buf.get(1).unwrap();
        buf.reset().unwrap();
        assert_eq!(buf.position(), 2);
    }

    #[test]
    fn test_reset_without_mark() {
        let mut buf = StagingBuffer::allocate(8);
        buf.put(b"abc").unwrap();
        let err = buf.reset().unwrap_err();
        assert!(matches!(err, StagingError::InvalidState { .. }));
        assert_eq!(buf.position(), 3);
    }

    #[test]
    fn test_flip_rewind_clear_drop_mark() {
        let mut buf = StagingBuffer::allocate(8);
        buf.put(b"ab").unwrap();
        buf.mark();
        buf.flip();
        assert_eq!(buf.mark_position(), None);

        buf.get(1).unwrap();
        buf.mark();
        buf.rewind();
        assert_eq!(buf.mark_position(), None);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 2);

        buf.mark();
        buf.clear();
        assert_eq!(buf.mark_position(), None);
    }

    #[test]
    fn test_rewind_repeats_read() {
        let mut buf = StagingBuffer::allocate(32);
        buf.put(b"repeatable").unwrap();
        buf.flip();

        let first = buf.get(buf.limit()).unwrap();
        buf.rewind();
        let second = buf.get(buf.limit()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clear_keeps_bytes() {
        let mut buf = StagingBuffer::allocate(1024);
        buf.put(b"test").unwrap();
        buf.flip();
        buf.get(4).unwrap();
        buf.rewind();
        buf.clear();

        assert_cursors(&buf, 0, 1024, 1024);
        assert_eq!(buf.get_at(1).unwrap(), b'e');
    }

    #[test]
    fn test_overflow_leaves_buffer_unchanged() {
        let mut buf = StagingBuffer::allocate(4);
        buf.put(b"ab").unwrap();
        let err = buf.put(b"cde").unwrap_err();
        assert!(matches!(
            err,
            StagingError::Overflow {
                requested: 3,
                remaining: 2
            }
        ));
        assert_eq!(buf.position(), 2);
        assert_eq!(buf.get_at(2).unwrap(), 0);
    }

    #[test]
    fn test_underflow_leaves_buffer_unchanged() {
        let mut buf = StagingBuffer::allocate(16);
        buf.put(b"abc").unwrap();
        buf.flip();
        let err = buf.get(4).unwrap_err();
        assert!(matches!(
            err,
            StagingError::Underflow {
                requested: 4,
                remaining: 3
            }
        ));
        assert_eq!(buf.position(), 0);

        let mut dst = [0u8; 5];
        assert!(buf.get_into(&mut dst).is_err());
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_get_into_and_single_bytes() {
        let mut buf = StagingBuffer::allocate(8);
        buf.put_u8(b'x').unwrap();
        buf.put(b"yz").unwrap();
        buf.flip();

        assert_eq!(buf.get_u8().unwrap(), b'x');
        let mut dst = [0u8; 2];
        buf.get_into(&mut dst).unwrap();
        assert_eq!(&dst, b"yz");
        assert!(buf.get_u8().is_err());
    }

    #[test]
    fn test_get_at_bounds() {
        let mut buf = StagingBuffer::allocate(8);
        buf.put(b"abc").unwrap();
        buf.flip();
        assert_eq!(buf.get_at(2).unwrap(), b'c');
        assert!(matches!(
            buf.get_at(3),
            Err(StagingError::IndexOutOfBounds { index: 3, limit: 3 })
        ));
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_set_position_and_limit() {
        let mut buf = StagingBuffer::allocate(10);
        buf.set_position(6).unwrap();
        buf.mark();

        buf.set_position(4).unwrap();
        assert_eq!(buf.mark_position(), None);

        buf.set_position(6).unwrap();
        buf.mark();
        buf.set_limit(5).unwrap();
        assert_eq!(buf.position(), 5);
        assert_eq!(buf.mark_position(), None);

        assert!(buf.set_position(6).unwrap_err().is_invalid_argument());
        assert!(buf.set_limit(11).unwrap_err().is_invalid_argument());
        assert_cursors(&buf, 5, 5, 10);
    }

    #[test]
    fn test_compact() {
        let mut buf = StagingBuffer::allocate(8);
        buf.put(b"abcdef").unwrap();
        buf.flip();
        buf.get(4).unwrap();

        buf.compact();
        assert_cursors(&buf, 2, 8, 8);
        buf.put(b"gh").unwrap();
        buf.flip();
        assert_eq!(&buf.get(4).unwrap()[..], b"efgh");
    }

    #[test]
    fn test_writable_commit() {
        let mut buf = StagingBuffer::allocate(8);
        buf.writable()[..3].copy_from_slice(b"abc");
        buf.commit(3).unwrap();
        assert_eq!(buf.position(), 3);
        assert!(buf.commit(6).is_err());

        buf.flip();
        assert_eq!(buf.readable(), b"abc");
        buf.consume(2).unwrap();
        assert_eq!(buf.readable(), b"c");
        assert!(buf.consume(2).is_err());
    }

    #[test]
    fn test_buf_trait() {
        let mut buf = StagingBuffer::allocate(16);
        buf.put(b"hello world").unwrap();
        buf.flip();

        let mut out = Vec::new();
        while Buf::has_remaining(&buf) {
            let chunk = Buf::chunk(&buf);
            out.extend_from_slice(chunk);
            let n = chunk.len();
            Buf::advance(&mut buf, n);
        }
        assert_eq!(out, b"hello world");
        assert_eq!(buf.position(), 11);
    }

    #[test]
    #[should_panic(expected = "cannot advance past limit")]
    fn test_buf_advance_past_limit_panics() {
        let mut buf = StagingBuffer::allocate(4);
        buf.flip();
        Buf::advance(&mut buf, 1);
    }

    #[test]
    fn test_take_behaves_like_allocate() {
        {
            let mut buf = StagingBuffer::take(64);
            buf.put(b"dirty").unwrap();
        }
        let buf = StagingBuffer::take(64);
        assert_cursors(&buf, 0, 64, 64);
        assert!(buf.readable().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_debug_shows_cursors() {
        let mut buf = StagingBuffer::allocate(4);
        buf.put(b"ab").unwrap();
        let s = format!("{:?}", buf);
        assert!(s.contains("position: 2"));
        assert!(s.contains("capacity: 4"));
    }
}
