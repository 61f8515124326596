//! Mutating operations and capability queries.

use std::sync::Arc;

use crate::{ByteChannel, Feature, FsError, OpenMode};

/// Write side of a storage backend.
///
/// Callers query [`is_feature_supported`](Self::is_feature_supported) with
/// [`Feature::Write`] before mutating. A backend that answers `false` must
/// fail every mutating call with [`FsError::ReadOnly`].
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsWrite`.
pub trait FsWrite: Send + Sync {
    /// Returns `true` if the backend supports `feature`.
    fn is_feature_supported(&self, feature: Feature) -> bool;

    /// Open `path` for writing, truncating unless `mode.append` is set.
    ///
    /// The resource is created if missing; its parent directory must exist.
    ///
    /// # Errors
    ///
    /// - [`FsError::ReadOnly`] if writing is not supported
    /// - [`FsError::NotFound`] if the parent directory does not exist
    /// - [`FsError::Backend`] if the platform refused a handle
    fn open_output(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError>;

    /// Create `path` and any missing parents.
    ///
    /// Succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// - [`FsError::ReadOnly`] if writing is not supported
    /// - [`FsError::NotADirectory`] if a component exists but is not a directory
    fn make_directory(&self, path: &str, follow_symlinks: bool) -> Result<(), FsError>;
}

impl<T: FsWrite + ?Sized> FsWrite for Arc<T> {
    fn is_feature_supported(&self, feature: Feature) -> bool {
        (**self).is_feature_supported(feature)
    }

    fn open_output(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        (**self).open_output(path, mode)
    }

    fn make_directory(&self, path: &str, follow_symlinks: bool) -> Result<(), FsError> {
        (**self).make_directory(path, follow_symlinks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_write_is_object_safe() {
        fn _check(_: &dyn FsWrite) {}
    }

    #[test]
    fn fs_write_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FsWrite>() {
            _assert_send_sync::<T>();
        }
    }
}
