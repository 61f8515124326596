//! In-memory channel over borrowed or owned bytes.

use std::borrow::Cow;
use std::io::{self, SeekFrom};

use super::{unsupported, ByteChannel, Capabilities};

/// Channel over an in-memory byte sequence.
///
/// A view borrows the bytes and is read-only. An owned channel may also be
/// written: writes overwrite at the current position and grow the buffer.
/// Seeks never fail; the target is clamped to `[0, len]`.
///
/// # Example
///
/// ```rust
/// use assetfs::{ByteChannel, MemoryChannel};
/// use std::io::SeekFrom;
///
/// let decoded = [1u8, 2, 3, 4];
/// let mut channel = MemoryChannel::view(&decoded);
/// assert_eq!(channel.seek(SeekFrom::End(10)).unwrap(), 4);
/// assert_eq!(channel.seek(SeekFrom::Current(-100)).unwrap(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryChannel<'a> {
    data: Cow<'a, [u8]>,
    pos: usize,
}

impl<'a> MemoryChannel<'a> {
    /// Read-only channel over borrowed bytes.
    pub fn view(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            pos: 0,
        }
    }
}

impl MemoryChannel<'static> {
    /// Channel that owns its buffer.
    pub fn owned(data: Vec<u8>) -> Self {
        Self {
            data: Cow::Owned(data),
            pos: 0,
        }
    }
}

impl MemoryChannel<'_> {
    /// The bytes behind this channel.
    pub fn get_ref(&self) -> &[u8] {
        &self.data
    }

    /// Consume the channel and return its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data.into_owned()
    }

    fn is_owned(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }
}

impl ByteChannel for MemoryChannel<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = &self.data[self.pos.min(self.data.len())..];
        let n = buf.len().min(available.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Cow::Owned(data) = &mut self.data else {
            return Err(unsupported("write"));
        };
        let end = self.pos + buf.len();
        if end > data.len() {
            data.resize(end, 0);
        }
        data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.data.len() as i128;
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => self.pos as i128 + i128::from(offset),
            SeekFrom::End(offset) => len + i128::from(offset),
        };
        self.pos = target.clamp(0, len) as usize;
        Ok(self.pos as u64)
    }

    fn capabilities(&self) -> Capabilities {
        if self.is_owned() {
            Capabilities::READ_WRITE
        } else {
            Capabilities::READ
        }
    }
}
