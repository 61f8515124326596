//! Buffered channel over a native handle.

use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::debug;

use super::{unsupported, ByteChannel, Capabilities};
use crate::DEFAULT_BUFFER_SIZE;

/// A raw read/write/seek-capable handle (an open file, an adopted descriptor, ...).
///
/// Blanket-implemented for every `Read + Write + Seek + Send` type.
pub trait NativeHandle: Read + Write + Seek + Send {}

impl<T: Read + Write + Seek + Send + ?Sized> NativeHandle for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Read,
    Write,
}

/// Channel that wraps a native handle with a fixed-size intermediate buffer.
///
/// A channel is opened for exactly one direction. Reading refills the buffer
/// when it runs dry; a native read error is logged and reported as end of
/// data. Writing accumulates into the buffer and flushes on overflow, on
/// [`flush`](ByteChannel::flush), on seek and on drop; a flush that cannot
/// write everything is a hard error.
///
/// Seeking drops the buffered window. For [`SeekFrom::Current`] on a reader
/// the unread remainder is subtracted first, so buffering never shows
/// through in offsets.
///
/// # Example
///
/// ```rust
/// use assetfs::{ByteChannel, FdChannel};
/// use std::io::{Cursor, SeekFrom};
///
/// let mut channel = FdChannel::reader(Cursor::new(b"LcfMapUnit".to_vec()));
/// let mut magic = [0u8; 3];
/// channel.read(&mut magic).unwrap();
/// assert_eq!(&magic, b"Lcf");
/// assert_eq!(channel.seek(SeekFrom::Current(0)).unwrap(), 3);
/// ```
pub struct FdChannel<H: NativeHandle> {
    handle: H,
    direction: Direction,
    buf: Box<[u8]>,
    // read cursor inside `buf`; unused when writing
    pos: usize,
    // read: valid bytes in `buf`, write: pending bytes in `buf`
    filled: usize,
}

impl<H: NativeHandle> FdChannel<H> {
    /// Open a read channel with [`DEFAULT_BUFFER_SIZE`].
    pub fn reader(handle: H) -> Self {
        Self::with_capacity(handle, false, DEFAULT_BUFFER_SIZE)
    }

    /// Open a write channel with [`DEFAULT_BUFFER_SIZE`].
    pub fn writer(handle: H) -> Self {
        Self::with_capacity(handle, true, DEFAULT_BUFFER_SIZE)
    }

    /// Open a channel with a custom buffer size (at least one byte).
    pub fn with_capacity(handle: H, write: bool, capacity: usize) -> Self {
        Self {
            handle,
            direction: if write { Direction::Write } else { Direction::Read },
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            filled: 0,
        }
    }

    /// Open a read channel whose buffer already holds `filled` bytes read from `handle`.
    ///
    /// The handle must be positioned right after those bytes.
    pub fn from_prefetched(handle: H, buf: Box<[u8]>, filled: usize) -> Self {
        let buf = if buf.is_empty() {
            vec![0; DEFAULT_BUFFER_SIZE].into_boxed_slice()
        } else {
            buf
        };
        let filled = filled.min(buf.len());
        Self {
            handle,
            direction: Direction::Read,
            buf,
            pos: 0,
            filled,
        }
    }

    /// Size of the intermediate buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes buffered but not yet handed to the caller.
    fn remaining(&self) -> usize {
        self.filled - self.pos
    }

    fn discard(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        let mut written = 0;
        let mut result = Ok(());
        while written < self.filled {
            match self.handle.write(&self.buf[written..self.filled]) {
                Ok(0) => {
                    result = Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write the buffered data",
                    ));
                    break;
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        if written > 0 {
            self.buf.copy_within(written..self.filled, 0);
            self.filled -= written;
        }
        result
    }
}

fn read_native<H: Read + ?Sized>(handle: &mut H, buf: &mut [u8]) -> usize {
    loop {
        match handle.read(buf) {
            Ok(n) => return n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                debug!(error = %e, "channel read failed, treating as end of data");
                return 0;
            }
        }
    }
}

impl<H: NativeHandle> ByteChannel for FdChannel<H> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.direction != Direction::Read {
            return Err(unsupported("read"));
        }
        if out.is_empty() {
            return Ok(0);
        }

        if self.remaining() == 0 {
            // large reads bypass the buffer
            if out.len() >= self.buf.len() {
                return Ok(read_native(&mut self.handle, out));
            }
            self.discard();
            self.filled = read_native(&mut self.handle, &mut self.buf);
            if self.filled == 0 {
                return Ok(0);
            }
        }

        let n = out.len().min(self.remaining());
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.direction != Direction::Write {
            return Err(unsupported("write"));
        }

        if self.filled + data.len() > self.buf.len() {
            self.flush_buf()?;
        }

        if data.len() >= self.buf.len() {
            self.handle.write_all(data)?;
        } else {
            self.buf[self.filled..self.filled + data.len()].copy_from_slice(data);
            self.filled += data.len();
        }
        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.direction {
            Direction::Read => {
                let result = if let SeekFrom::Current(offset) = pos {
                    let remaining = self.remaining() as i64;
                    match offset.checked_sub(remaining) {
                        Some(adjusted) => self.handle.seek(SeekFrom::Current(adjusted))?,
                        None => {
                            self.handle.seek(SeekFrom::Current(-remaining))?;
                            self.discard();
                            self.handle.seek(SeekFrom::Current(offset))?
                        }
                    }
                } else {
                    self.handle.seek(pos)?
                };
                self.discard();
                Ok(result)
            }
            Direction::Write => {
                self.flush_buf()?;
                self.handle.seek(pos)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.direction {
            Direction::Read => Ok(()),
            Direction::Write => {
                self.flush_buf()?;
                self.handle.flush()
            }
        }
    }

    fn capabilities(&self) -> Capabilities {
        match self.direction {
            Direction::Read => Capabilities::READ,
            Direction::Write => Capabilities::WRITE,
        }
    }
}

impl<H: NativeHandle> Drop for FdChannel<H> {
    fn drop(&mut self) {
        if self.direction == Direction::Write && self.filled > 0 {
            if let Err(e) = self.flush_buf() {
                debug!(error = %e, "flush on close failed");
            }
        }
    }
}

impl<H: NativeHandle> std::fmt::Debug for FdChannel<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdChannel")
            .field("direction", &self.direction)
            .field("capacity", &self.buf.len())
            .field("buffered", &(self.filled - self.pos))
            .finish()
    }
}
