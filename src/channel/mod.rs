//! # Byte Channels
//!
//! The lowest layer of the crate: one open resource with a read/write/seek
//! capability subset fixed at open time.
//!
//! | Channel | Backing |
//! |---------|---------|
//! | [`FdChannel`] | Any native handle, behind a fixed-size buffer |
//! | [`MemoryChannel`] | Borrowed or owned bytes, no syscalls |
//! | [`PlatformChannel`] | Descriptor handed out by a [`StorageBridge`](crate::StorageBridge) |
//! | [`CaesarChannel`] | Byte-shifting view over another channel |
//!
//! Channels are exclusively owned. Dropping a channel releases its handle;
//! write channels flush pending bytes first.

use std::io::{self, SeekFrom};

use crate::FsError;

mod caesar;
mod fd;
mod memory;
mod platform;

pub use caesar::CaesarChannel;
pub use fd::{FdChannel, NativeHandle};
pub use memory::MemoryChannel;
pub use platform::PlatformChannel;

#[cfg(unix)]
pub use platform::native_handle_from_fd;

/// What a channel was opened for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `read` may succeed.
    pub read: bool,
    /// `write` may succeed.
    pub write: bool,
    /// `seek` may succeed.
    pub seek: bool,
}

impl Capabilities {
    /// Readable and seekable.
    pub const READ: Self = Self {
        read: true,
        write: false,
        seek: true,
    };

    /// Writable and seekable.
    pub const WRITE: Self = Self {
        read: false,
        write: true,
        seek: true,
    };

    /// Readable, writable and seekable.
    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
        seek: true,
    };
}

/// Minimal read/write/seek abstraction over one open resource.
///
/// Operations outside the channel's [`Capabilities`] fail with
/// [`io::ErrorKind::Unsupported`].
///
/// # Object Safety
///
/// This trait is object-safe; streams hold `Box<dyn ByteChannel>`.
pub trait ByteChannel: Send {
    /// Read up to `buf.len()` bytes. `Ok(0)` signals end of data.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write bytes, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = buf;
        Err(unsupported("write"))
    }

    /// Reposition the channel, returning the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Push buffered bytes to the underlying resource.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// The operations this channel was opened for.
    fn capabilities(&self) -> Capabilities;
}

impl<C: ByteChannel + ?Sized> ByteChannel for Box<C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        (**self).seek(pos)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }
}

pub(crate) fn unsupported(operation: &'static str) -> io::Error {
    FsError::NotSupported { operation }.into()
}
