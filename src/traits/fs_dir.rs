//! Directory enumeration.

use std::sync::Arc;

use crate::{DirEntry, FileType, FsError};

/// Directory listing for a storage backend.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
pub trait FsDir: Send + Sync {
    /// List the entries of `path`.
    ///
    /// The result never contains `.` or `..`, and no entry is left
    /// [`FileType::Unknown`] when the backend can determine it. Order is
    /// backend-defined. An empty `Ok` means an empty directory; a directory
    /// that cannot be opened is an `Err`. Entries whose names are not valid
    /// UTF-8 are left out, since they could not be opened by name.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotADirectory`] if the path cannot be opened as a directory
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;
}

impl<T: FsDir + ?Sized> FsDir for Arc<T> {
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        (**self).list_directory(path)
    }
}

/// Normalize raw `(name, type)` pairs from a native listing.
///
/// Drops `.` and `..`. Entries of [`FileType::Unknown`] are classified by
/// calling `is_directory` with the entry name: `true` makes a directory,
/// `false` a regular file.
///
/// # Example
///
/// ```rust
/// use assetfs::{normalize_entries, DirEntry, FileType};
///
/// let raw = vec![
///     (".".to_string(), FileType::Directory),
///     ("Save".to_string(), FileType::Unknown),
///     ("RPG_RT.ini".to_string(), FileType::Regular),
/// ];
/// let entries = normalize_entries(raw, |name| name == "Save");
/// assert_eq!(entries, vec![
///     DirEntry::new("Save", FileType::Directory),
///     DirEntry::new("RPG_RT.ini", FileType::Regular),
/// ]);
/// ```
pub fn normalize_entries<I, F>(raw: I, mut is_directory: F) -> Vec<DirEntry>
where
    I: IntoIterator<Item = (String, FileType)>,
    F: FnMut(&str) -> bool,
{
    raw.into_iter()
        .filter(|(name, _)| name != "." && name != "..")
        .map(|(name, file_type)| {
            let file_type = match file_type {
                FileType::Unknown if is_directory(&name) => FileType::Directory,
                FileType::Unknown => FileType::Regular,
                known => known,
            };
            DirEntry { name, file_type }
        })
        .collect()
}
