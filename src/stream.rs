//! # Stream Wrappers
//!
//! Caller-facing objects bound to one open [`ByteChannel`].
//!
//! A stream is created by a successful open, tracks its position on every
//! read, write and seek, and moves to a terminal closed state on
//! [`close`](InputStream::close) or drop, whichever comes first. Closing is
//! idempotent and the channel is released exactly once. A closed stream
//! fails cleanly: reads return nothing, typed reads return `None`.
//!
//! ## Typed Reads
//!
//! 16- and 32-bit integers are stored in [`WIRE_ORDER`](crate::WIRE_ORDER)
//! and converted to host order on every read, see [`WireScalar`]. Bytes,
//! booleans and floats pass through unchanged.
//!
//! ```rust
//! use assetfs::InputStream;
//!
//! let mut stream = InputStream::from_bytes(vec![0x34, 0x12, 0x78, 0x56, 0x34, 0x12], "header");
//! assert_eq!(stream.read_obj::<u16>(), Some(0x1234));
//! assert_eq!(stream.read_obj::<u32>(), Some(0x1234_5678));
//! assert_eq!(stream.read_obj::<u8>(), None);
//! ```

use std::io::{self, SeekFrom};

use tracing::debug;

use crate::channel::{ByteChannel, MemoryChannel};
use crate::{ByteOrder, DEFAULT_BUFFER_SIZE, FsError, WIRE_ORDER};

/// A scalar with a fixed on-wire width.
///
/// Integer implementations swap bytes when the stream's order differs from
/// the host; the swap is skipped internally when the orders match.
/// `u8`, `i8`, `bool`, `f32` and `f64` are passed through as stored.
pub trait WireScalar: Copy {
    /// Width in bytes.
    const WIDTH: usize;

    /// Build from `WIDTH` raw bytes, as laid out in memory.
    fn from_raw(raw: &[u8]) -> Self;

    /// Write the in-memory representation into `out[..WIDTH]`.
    fn to_raw(self, out: &mut [u8]);

    /// Convert between `order` and host order (the conversion is symmetric).
    fn convert(self, order: ByteOrder) -> Self;
}

macro_rules! swapped_scalar {
    ($($ty:ty),*) => {$(
        impl WireScalar for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn from_raw(raw: &[u8]) -> Self {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(&raw[..Self::WIDTH]);
                <$ty>::from_ne_bytes(bytes)
            }

            fn to_raw(self, out: &mut [u8]) {
                out[..Self::WIDTH].copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn convert(self, order: ByteOrder) -> Self {
                if order.needs_swap() { self.swap_bytes() } else { self }
            }
        }
    )*};
}

macro_rules! plain_scalar {
    ($($ty:ty),*) => {$(
        impl WireScalar for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn from_raw(raw: &[u8]) -> Self {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(&raw[..Self::WIDTH]);
                <$ty>::from_ne_bytes(bytes)
            }

            fn to_raw(self, out: &mut [u8]) {
                out[..Self::WIDTH].copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn convert(self, _: ByteOrder) -> Self {
                self
            }
        }
    )*};
}

swapped_scalar!(u16, i16, u32, i32);
plain_scalar!(u8, i8, f32, f64);

impl WireScalar for bool {
    const WIDTH: usize = 1;

    fn from_raw(raw: &[u8]) -> Self {
        raw[0] != 0
    }

    fn to_raw(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    fn convert(self, _: ByteOrder) -> Self {
        self
    }
}

// wide enough for every WireScalar
const MAX_WIDTH: usize = 8;

/// Readable stream over one open channel.
///
/// The lifetime ties the stream to borrowed memory when built with
/// [`from_slice`](Self::from_slice); streams opened through a
/// [`FilesystemNode`](crate::FilesystemNode) are `'static`.
pub struct InputStream<'a> {
    channel: Option<Box<dyn ByteChannel + 'a>>,
    name: String,
    size: Option<i64>,
    position: u64,
    byte_order: ByteOrder,
}

impl<'a> InputStream<'a> {
    /// Bind a stream to an open channel.
    pub fn new(channel: Box<dyn ByteChannel + 'a>, name: impl Into<String>) -> Self {
        Self {
            channel: Some(channel),
            name: name.into(),
            size: None,
            position: 0,
            byte_order: WIRE_ORDER,
        }
    }

    /// Stream over borrowed bytes.
    pub fn from_slice(data: &'a [u8], name: impl Into<String>) -> Self {
        Self::new(Box::new(MemoryChannel::view(data)), name)
    }

    /// Use `order` instead of [`WIRE_ORDER`] for typed reads.
    #[must_use]
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Logical path the stream was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte order used by typed reads.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Returns `true` until the stream is closed.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Current offset from the start of the resource.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total size in bytes, or `-1` if it cannot be determined.
    ///
    /// Measured by seeking to the end and back on first use, then cached.
    /// Channels that cannot seek report `-1`.
    pub fn size(&mut self) -> i64 {
        let Some(channel) = self.channel.as_mut() else {
            return -1;
        };
        if let Some(size) = self.size {
            return size;
        }

        let size = if channel.capabilities().seek {
            measure(channel.as_mut()).unwrap_or_else(|e| {
                debug!(name = %self.name, error = %e, "cannot measure stream size");
                -1
            })
        } else {
            -1
        };
        self.size = Some(size);
        size
    }

    /// Read up to `buf.len()` bytes. Returns `0` at end of data, on error or once closed.
    pub fn read_bytes_into(&mut self, buf: &mut [u8]) -> usize {
        match io::Read::read(self, buf) {
            Ok(n) => n,
            Err(e) => {
                debug!(name = %self.name, error = %e, "read failed");
                0
            }
        }
    }

    /// Read exactly `len` bytes, or `None` if the stream ends first.
    ///
    /// Memory grows with the bytes actually read, so a bogus length taken
    /// from corrupt data yields `None` instead of a huge allocation.
    pub fn read_bytes(&mut self, len: usize) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; DEFAULT_BUFFER_SIZE];
        while out.len() < len {
            let want = (len - out.len()).min(chunk.len());
            let n = self.read_bytes_into(&mut chunk[..want]);
            if n == 0 {
                return None;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        Some(out)
    }

    /// Read a typed scalar, converting integers from the stream's byte order.
    ///
    /// Returns `None` if fewer than `T::WIDTH` bytes remain.
    pub fn read_obj<T: WireScalar>(&mut self) -> Option<T> {
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        if self.fill(raw) != T::WIDTH {
            return None;
        }
        Some(T::from_raw(raw).convert(self.byte_order))
    }

    /// Read `len` bytes as UTF-8 text.
    ///
    /// Returns `None` on a short read or invalid UTF-8.
    pub fn read_string(&mut self, len: usize) -> Option<String> {
        self.read_bytes(len).and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Read everything from the current position to the end.
    pub fn read_to_end(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut chunk = [0u8; DEFAULT_BUFFER_SIZE];
        loop {
            let n = self.read_bytes_into(&mut chunk);
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        out
    }

    /// Reposition the stream. Returns the new offset, or `None` on failure or once closed.
    pub fn seek_to(&mut self, pos: SeekFrom) -> Option<u64> {
        match io::Seek::seek(self, pos) {
            Ok(offset) => Some(offset),
            Err(e) => {
                debug!(name = %self.name, error = %e, "seek failed");
                None
            }
        }
    }

    /// Release the channel. Further calls are no-ops.
    pub fn close(&mut self) {
        self.channel = None;
    }

    fn fill(&mut self, buf: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_bytes_into(&mut buf[filled..]);
            if n == 0 {
                break;
            }
            filled += n;
        }
        filled
    }

    fn channel(&mut self) -> io::Result<&mut (dyn ByteChannel + 'a)> {
        match self.channel.as_mut() {
            Some(channel) => Ok(channel.as_mut()),
            None => Err(FsError::Closed {
                name: self.name.clone(),
            }
            .into()),
        }
    }
}

impl InputStream<'static> {
    /// Stream that owns an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>, name: impl Into<String>) -> Self {
        Self::new(Box::new(MemoryChannel::owned(data)), name)
    }
}

fn measure(channel: &mut (dyn ByteChannel + '_)) -> io::Result<i64> {
    let current = channel.seek(SeekFrom::Current(0))?;
    let end = channel.seek(SeekFrom::End(0));
    let restored = channel.seek(SeekFrom::Start(current));
    let end = end?;
    restored?;
    i64::try_from(end).map_err(io::Error::other)
}

impl io::Read for InputStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.channel()?.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl io::Seek for InputStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let offset = self.channel()?.seek(pos)?;
        self.position = offset;
        Ok(offset)
    }
}

impl std::fmt::Debug for InputStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputStream")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .field("position", &self.position)
            .field("size", &self.size)
            .finish()
    }
}

/// Writable stream over one open channel.
///
/// Pending bytes are flushed on [`close`](Self::close) and on drop. A flush
/// that cannot write everything is reported as an error by `close` and
/// [`flush`](Self::flush); on drop it is only logged.
pub struct OutputStream<'a> {
    channel: Option<Box<dyn ByteChannel + 'a>>,
    name: String,
    position: u64,
    byte_order: ByteOrder,
}

impl<'a> OutputStream<'a> {
    /// Bind a stream to an open channel.
    pub fn new(channel: Box<dyn ByteChannel + 'a>, name: impl Into<String>) -> Self {
        Self {
            channel: Some(channel),
            name: name.into(),
            position: 0,
            byte_order: WIRE_ORDER,
        }
    }

    /// Use `order` instead of [`WIRE_ORDER`] for typed writes.
    #[must_use]
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Logical path the stream was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` until the stream is closed.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Bytes written (or the offset after the last seek).
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Write all of `data`. Returns `false` on failure or once closed.
    pub fn write_bytes(&mut self, data: &[u8]) -> bool {
        match io::Write::write_all(self, data) {
            Ok(()) => true,
            Err(e) => {
                debug!(name = %self.name, error = %e, "write failed");
                false
            }
        }
    }

    /// Write a typed scalar, converting integers to the stream's byte order.
    pub fn write_obj<T: WireScalar>(&mut self, value: T) -> bool {
        let mut raw = [0u8; MAX_WIDTH];
        value.convert(self.byte_order).to_raw(&mut raw);
        self.write_bytes(&raw[..T::WIDTH])
    }

    /// Push buffered bytes to the resource.
    ///
    /// # Errors
    ///
    /// - [`FsError::Closed`] if the stream was closed
    /// - [`FsError::Io`] if the buffered bytes could not all be written
    pub fn flush(&mut self) -> Result<(), FsError> {
        let Some(channel) = self.channel.as_mut() else {
            return Err(FsError::Closed {
                name: self.name.clone(),
            });
        };
        channel
            .flush()
            .map_err(|source| FsError::io("flush", self.name.clone(), source))
    }

    /// Flush and release the channel. Further calls return `Ok(())`.
    ///
    /// # Errors
    ///
    /// - [`FsError::Io`] if the final flush failed (the channel is released anyway)
    pub fn close(&mut self) -> Result<(), FsError> {
        let Some(mut channel) = self.channel.take() else {
            return Ok(());
        };
        channel
            .flush()
            .map_err(|source| FsError::io("close", self.name.clone(), source))
    }

    fn channel(&mut self) -> io::Result<&mut (dyn ByteChannel + 'a)> {
        match self.channel.as_mut() {
            Some(channel) => Ok(channel.as_mut()),
            None => Err(FsError::Closed {
                name: self.name.clone(),
            }
            .into()),
        }
    }
}

impl io::Write for OutputStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.channel()?.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.channel()?.flush()
    }
}

impl io::Seek for OutputStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let offset = self.channel()?.seek(pos)?;
        self.position = offset;
        Ok(offset)
    }
}

impl Drop for OutputStream<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!(error = %e, "closing output stream failed");
        }
    }
}

impl std::fmt::Debug for OutputStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Capabilities;
    use std::io::{Read, Seek, Write};
    use std::sync::{Arc, Mutex};

    /// Channel that counts how often it is dropped and keeps written bytes.
    struct Tracked {
        drops: Arc<Mutex<usize>>,
        sink: Arc<Mutex<Vec<u8>>>,
    }

    impl ByteChannel for Tracked {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.sink.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
            Err(io::Error::other("not seekable"))
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                read: true,
                write: true,
                seek: false,
            }
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            *self.drops.lock().unwrap() += 1;
        }
    }

    fn tracked() -> (Tracked, Arc<Mutex<usize>>, Arc<Mutex<Vec<u8>>>) {
        let drops = Arc::new(Mutex::new(0));
        let sink = Arc::new(Mutex::new(Vec::new()));
        let channel = Tracked {
            drops: Arc::clone(&drops),
            sink: Arc::clone(&sink),
        };
        (channel, drops, sink)
    }

    #[test]
    fn typed_reads_follow_wire_order() {
        let mut stream = InputStream::from_bytes(vec![0xFE, 0xFF, 0x01, 0x00, 0x00, 0x80], "t");
        assert_eq!(stream.read_obj::<i16>(), Some(-2));
        assert_eq!(stream.read_obj::<i32>(), Some(i32::MIN + 1));
        assert_eq!(stream.position(), 6);
    }

    #[test]
    fn typed_reads_big_endian_override() {
        let mut stream =
            InputStream::from_bytes(vec![0x12, 0x34], "t").with_byte_order(ByteOrder::Big);
        assert_eq!(stream.read_obj::<u16>(), Some(0x1234));
    }

    #[test]
    fn byte_and_float_reads_pass_through() {
        let value = 1.5f32;
        let mut data = vec![0xAB, 0x01];
        data.extend_from_slice(&value.to_ne_bytes());
        let mut stream = InputStream::from_bytes(data, "t").with_byte_order(ByteOrder::Big);
        assert_eq!(stream.read_obj::<u8>(), Some(0xAB));
        assert_eq!(stream.read_obj::<bool>(), Some(true));
        assert_eq!(stream.read_obj::<f32>(), Some(1.5));
    }

    #[test]
    fn short_typed_read_is_none() {
        let mut stream = InputStream::from_bytes(vec![1, 2, 3], "t");
        assert_eq!(stream.read_obj::<u32>(), None);
    }

    #[test]
    fn size_is_measured_and_cached() {
        let mut stream = InputStream::from_bytes(vec![0; 42], "t");
        stream.read_bytes(10).unwrap();
        assert_eq!(stream.size(), 42);
        assert_eq!(stream.position(), 10);
        assert_eq!(stream.read_obj::<u8>(), Some(0));
        assert_eq!(stream.position(), 11);
        assert_eq!(stream.size(), 42);
    }

    #[test]
    fn size_of_unseekable_channel_is_negative() {
        let (channel, _, _) = tracked();
        let mut stream = InputStream::new(Box::new(channel), "pipe");
        assert_eq!(stream.size(), -1);
    }

    #[test]
    fn slice_stream_reads_string() {
        let data = b"\x05Title";
        let mut stream = InputStream::from_slice(data, "mem");
        let len = stream.read_obj::<u8>().unwrap();
        assert_eq!(stream.read_string(len as usize).as_deref(), Some("Title"));
        assert_eq!(stream.read_to_end(), Vec::<u8>::new());
    }

    #[test]
    fn seek_updates_position() {
        let mut stream = InputStream::from_bytes((0u8..20).collect(), "t");
        assert_eq!(stream.seek_to(SeekFrom::Start(15)), Some(15));
        assert_eq!(stream.position(), 15);
        assert_eq!(stream.read_to_end(), vec![15, 16, 17, 18, 19]);
        assert_eq!(stream.position(), 20);
    }

    #[test]
    fn input_close_is_idempotent_and_releases_once() {
        let (channel, drops, _) = tracked();
        let mut stream = InputStream::new(Box::new(channel), "save");
        stream.close();
        stream.close();
        assert!(!stream.is_open());
        drop(stream);
        assert_eq!(*drops.lock().unwrap(), 1);
    }

    #[test]
    fn closed_input_fails_cleanly() {
        let mut stream = InputStream::from_bytes(vec![1, 2, 3, 4], "t");
        stream.close();
        assert_eq!(stream.read_obj::<u16>(), None);
        assert_eq!(stream.size(), -1);
        assert_eq!(stream.seek_to(SeekFrom::Start(0)), None);
        let mut buf = [0u8; 2];
        let err = stream.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert_eq!(stream.name(), "t");
    }

    #[test]
    fn output_close_is_idempotent_and_releases_once() {
        let (channel, drops, sink) = tracked();
        let mut stream = OutputStream::new(Box::new(channel), "Save01.lsd");
        assert!(stream.write_bytes(b"LcfSaveData"));
        stream.close().unwrap();
        stream.close().unwrap();
        assert!(!stream.write_bytes(b"more"));
        drop(stream);
        assert_eq!(*drops.lock().unwrap(), 1);
        assert_eq!(&*sink.lock().unwrap(), b"LcfSaveData");
    }

    #[test]
    fn flush_after_close_reports_closed() {
        let (channel, _, _) = tracked();
        let mut out = OutputStream::new(Box::new(channel), "Save01.lsd");
        out.close().unwrap();
        match out.flush() {
            Err(FsError::Closed { name }) => assert_eq!(name, "Save01.lsd"),
            other => panic!("expected Closed, got {other:?}"),
        }
    }

    #[test]
    fn size_after_close_is_negative_even_when_cached() {
        let mut stream = InputStream::from_bytes(vec![0; 42], "t");
        assert_eq!(stream.size(), 42);
        stream.close();
        assert_eq!(stream.size(), -1);
    }

    #[test]
    fn oversized_length_is_none() {
        let mut stream = InputStream::from_bytes(vec![1, 2, 3], "t");
        assert_eq!(stream.read_bytes(usize::MAX), None);

        let mut stream = InputStream::from_bytes(vec![0xFF, 0xFF, 0xFF, 0x7F, b'x'], "t");
        let len = stream.read_obj::<u32>().unwrap();
        assert_eq!(stream.read_string(len as usize), None);
    }

    #[test]
    fn read_bytes_spans_chunks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut stream = InputStream::from_bytes(data.clone(), "t");
        assert_eq!(stream.read_bytes(9_000).unwrap(), data[..9_000]);
        assert_eq!(stream.position(), 9_000);
    }

    #[test]
    fn typed_write_read_round_trip() {
        let (channel, _, sink) = tracked();
        let mut out = OutputStream::new(Box::new(channel), "t");
        assert!(out.write_obj(0xDEAD_BEEFu32));
        assert!(out.write_obj(-3i16));
        assert_eq!(out.position(), 6);
        out.close().unwrap();

        let bytes = sink.lock().unwrap().clone();
        assert_eq!(&bytes[..4], &[0xEF, 0xBE, 0xAD, 0xDE]);
        let mut input = InputStream::from_bytes(bytes, "t");
        assert_eq!(input.read_obj::<u32>(), Some(0xDEAD_BEEF));
        assert_eq!(input.read_obj::<i16>(), Some(-3));
    }

    #[test]
    fn output_works_with_std_write() {
        let (channel, _, sink) = tracked();
        let mut out = OutputStream::new(Box::new(channel), "t");
        write!(out, "[Game]\nTitle={}", "Demo").unwrap();
        out.flush().unwrap();
        drop(out);
        assert_eq!(&*sink.lock().unwrap(), b"[Game]\nTitle=Demo");
    }

    #[test]
    fn input_works_with_std_seek() {
        let mut stream = InputStream::from_bytes(vec![1, 2, 3], "t");
        assert_eq!(stream.seek(SeekFrom::End(-1)).unwrap(), 2);
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn streams_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<InputStream<'static>>();
        assert_send::<OutputStream<'static>>();
    }
}
