//! Byte-shifting read channel.

use std::io::{self, SeekFrom};

use super::{ByteChannel, Capabilities};

/// Read channel that subtracts a fixed amount from every byte of an inner channel.
///
/// Seeks go straight to the inner channel. Writing is not supported.
pub struct CaesarChannel {
    inner: Box<dyn ByteChannel>,
    shift: u8,
}

impl CaesarChannel {
    /// Undo a shift of `shift` applied to every byte of `inner`.
    pub fn new(inner: Box<dyn ByteChannel>, shift: u8) -> Self {
        Self { inner, shift }
    }
}

impl ByteChannel for CaesarChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for byte in &mut buf[..n] {
            *byte = byte.wrapping_sub(self.shift);
        }
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            write: false,
            ..self.inner.capabilities()
        }
    }
}
