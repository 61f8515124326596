//! Core types for the assetfs filesystem core.

/// Size of the intermediate buffer used by descriptor channels.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Byte order of multi-byte integers in the binary formats served by this crate.
///
/// The asset formats store 16- and 32-bit integers little-endian. Streams can
/// override this per instance, see
/// [`InputStream::with_byte_order`](crate::InputStream::with_byte_order).
pub const WIRE_ORDER: ByteOrder = ByteOrder::Little;

/// Type of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileType {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// The backend could not classify the entry.
    Unknown,
}

/// A directory entry returned from a listing.
///
/// Entries carry no identity beyond the `(name, file_type)` pair. Listings
/// never contain `.` or `..`, and their order is backend-defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirEntry {
    /// Name of the entry (file name only, not full path).
    pub name: String,
    /// Type of the entry.
    pub file_type: FileType,
}

impl DirEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, file_type: FileType) -> Self {
        Self {
            name: name.into(),
            file_type,
        }
    }

    /// Returns `true` if this entry is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Returns `true` if this entry is a regular file.
    #[inline]
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::Regular
    }
}

/// Backend capability predicate.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feature {
    /// The backend accepts mutating operations (open for write, make directory).
    Write,
}

/// Mode used when opening a stream.
///
/// Text mode performs no newline translation on any backend; the flag is
/// carried so callers can record intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenMode {
    /// Open in text mode instead of binary.
    pub text: bool,
    /// Append to the end instead of truncating. Ignored for input streams.
    pub append: bool,
}

impl OpenMode {
    /// Binary mode, truncating on write.
    pub const BINARY: Self = Self {
        text: false,
        append: false,
    };

    /// Text mode, truncating on write.
    pub const TEXT: Self = Self {
        text: true,
        append: false,
    };

    /// Binary mode, appending on write.
    pub const APPEND: Self = Self {
        text: false,
        append: true,
    };

    /// Text mode, appending on write.
    pub const TEXT_APPEND: Self = Self {
        text: true,
        append: true,
    };
}

/// Byte order of multi-byte scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// Byte order of the host this crate was compiled for.
    #[cfg(target_endian = "little")]
    pub const HOST: Self = ByteOrder::Little;

    /// Byte order of the host this crate was compiled for.
    #[cfg(target_endian = "big")]
    pub const HOST: Self = ByteOrder::Big;

    /// Returns `true` if values in this order must be swapped to reach host order.
    #[inline]
    pub const fn needs_swap(self) -> bool {
        !matches!(
            (self, Self::HOST),
            (ByteOrder::Little, ByteOrder::Little) | (ByteOrder::Big, ByteOrder::Big)
        )
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        WIRE_ORDER
    }
}
