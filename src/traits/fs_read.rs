//! Metadata queries and input streams.

use std::sync::Arc;

use crate::{ByteChannel, FsError, OpenMode};

/// Read side of a storage backend.
///
/// Paths are the fully resolved paths produced by a
/// [`FilesystemNode`](crate::FilesystemNode); backends never see relative
/// paths of a subtree.
///
/// All queries are total: a missing path, a path of the wrong kind or a
/// platform failure all answer `false` (or `-1` for sizes).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and take `&self`. Whether calls may
/// actually run concurrently depends on the native primitives behind the
/// backend.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsRead`.
pub trait FsRead: Send + Sync {
    /// Returns `true` if `path` is a regular resource.
    fn is_file(&self, path: &str) -> bool;

    /// Returns `true` if `path` is a directory.
    ///
    /// With `follow_symlinks`, a link to a directory counts as a directory.
    /// Backends without links ignore the flag.
    fn is_directory(&self, path: &str, follow_symlinks: bool) -> bool;

    /// Returns `true` if `path` is a regular resource or a directory.
    fn exists(&self, path: &str) -> bool {
        self.is_file(path) || self.is_directory(path, true)
    }

    /// Size in bytes, or `-1` if absent or indeterminate.
    fn file_size(&self, path: &str) -> i64;

    /// Open `path` for reading.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotAFile`] if the path is not a readable regular resource
    /// - [`FsError::Backend`] if the platform refused a handle
    fn open_input(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError>;

    /// Diagnostic description: a backend tag followed by `base_path`.
    ///
    /// For logging only.
    fn describe(&self, base_path: &str) -> String;
}

impl<T: FsRead + ?Sized> FsRead for Arc<T> {
    fn is_file(&self, path: &str) -> bool {
        (**self).is_file(path)
    }

    fn is_directory(&self, path: &str, follow_symlinks: bool) -> bool {
        (**self).is_directory(path, follow_symlinks)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn file_size(&self, path: &str) -> i64 {
        (**self).file_size(path)
    }

    fn open_input(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        (**self).open_input(path, mode)
    }

    fn describe(&self, base_path: &str) -> String {
        (**self).describe(base_path)
    }
}
