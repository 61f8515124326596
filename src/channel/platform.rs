//! Channel over a descriptor handed out by a platform storage bridge.

use std::io::{self, Read, SeekFrom};

use tracing::debug;

use super::{ByteChannel, Capabilities, FdChannel, NativeHandle};
use crate::{FsError, DEFAULT_BUFFER_SIZE};

/// Buffered channel over a descriptor obtained through a
/// [`StorageHandle`](crate::StorageHandle).
///
/// Some content providers return a descriptor even when the resource does
/// not exist (typically one pointing at a directory). Input channels are
/// therefore validated with an initial read; a failing read means "not
/// found". The bytes from that read are kept as the first buffer window, so
/// no rewind is needed.
pub struct PlatformChannel {
    inner: FdChannel<Box<dyn NativeHandle>>,
}

impl PlatformChannel {
    /// Validate `handle` by reading from it and wrap it for input.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the initial read fails
    pub fn open_input(mut handle: Box<dyn NativeHandle>, path: &str) -> Result<Self, FsError> {
        let mut buf = vec![0u8; DEFAULT_BUFFER_SIZE].into_boxed_slice();
        let filled = loop {
            match handle.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(path, error = %e, "descriptor is not readable");
                    return Err(FsError::NotFound { path: path.into() });
                }
            }
        };
        Ok(Self {
            inner: FdChannel::from_prefetched(handle, buf, filled),
        })
    }

    /// Wrap `handle` for output.
    pub fn open_output(handle: Box<dyn NativeHandle>) -> Self {
        Self {
            inner: FdChannel::writer(handle),
        }
    }
}

impl ByteChannel for PlatformChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }
}

/// Adopt a raw descriptor returned by a platform bridge.
///
/// Ownership moves into the returned handle; the descriptor is closed when the
/// channel built on it is dropped.
#[cfg(unix)]
pub fn native_handle_from_fd(fd: std::os::fd::OwnedFd) -> Box<dyn NativeHandle> {
    Box::new(std::fs::File::from(fd))
}
