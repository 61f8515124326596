//! Backend over the host's file tree.

use std::fs::{self, File, OpenOptions};

use tracing::debug;

use crate::path;
use crate::{
    normalize_entries, ByteChannel, DirEntry, FdChannel, Feature, FileType, FsDir, FsError,
    FsRead, FsWrite, OpenMode,
};

/// Backend that calls the operating system directly.
///
/// Paths are handed to `std::fs` as given. Input and output channels are
/// [`FdChannel`]s over the opened [`File`].
///
/// # Example
///
/// ```rust
/// use assetfs::{Feature, FsWrite, NativeBackend};
///
/// assert!(NativeBackend::new().is_feature_supported(Feature::Write));
/// assert!(!NativeBackend::read_only().is_feature_supported(Feature::Write));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NativeBackend {
    read_only: bool,
}

impl NativeBackend {
    /// A writable native backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// A native backend that refuses every mutating operation.
    pub fn read_only() -> Self {
        Self { read_only: true }
    }

    fn check_writable(&self, operation: &'static str) -> Result<(), FsError> {
        if self.read_only {
            return Err(FsError::ReadOnly { operation });
        }
        Ok(())
    }
}

impl FsRead for NativeBackend {
    fn is_file(&self, path: &str) -> bool {
        fs::metadata(path).is_ok_and(|m| m.is_file())
    }

    fn is_directory(&self, path: &str, follow_symlinks: bool) -> bool {
        let metadata = if follow_symlinks {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        };
        metadata.is_ok_and(|m| m.is_dir())
    }

    fn exists(&self, path: &str) -> bool {
        fs::metadata(path).is_ok_and(|m| m.is_file() || m.is_dir())
    }

    fn file_size(&self, path: &str) -> i64 {
        match fs::metadata(path) {
            Ok(m) if m.is_file() => i64::try_from(m.len()).unwrap_or(-1),
            _ => -1,
        }
    }

    fn open_input(&self, path: &str, _mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        let file = File::open(path).map_err(|e| FsError::io("open_input", path, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| FsError::io("open_input", path, e))?;
        if !metadata.is_file() {
            return Err(FsError::NotAFile { path: path.into() });
        }
        Ok(Box::new(FdChannel::reader(file)))
    }

    fn describe(&self, base_path: &str) -> String {
        format!("[Native] {base_path}")
    }
}

impl FsWrite for NativeBackend {
    fn is_feature_supported(&self, feature: Feature) -> bool {
        match feature {
            Feature::Write => !self.read_only,
        }
    }

    fn open_output(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        self.check_writable("open_output")?;
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        if mode.append {
            options.append(true);
        } else {
            options.truncate(true);
        }
        let file = options
            .open(path)
            .map_err(|e| FsError::io("open_output", path, e))?;
        Ok(Box::new(FdChannel::writer(file)))
    }

    fn make_directory(&self, path: &str, follow_symlinks: bool) -> Result<(), FsError> {
        self.check_writable("make_directory")?;
        if self.is_directory(path, follow_symlinks) {
            return Ok(());
        }
        if fs::symlink_metadata(path).is_ok() {
            return Err(FsError::NotADirectory { path: path.into() });
        }
        fs::create_dir_all(path).map_err(|e| FsError::io("make_directory", path, e))
    }
}

impl FsDir for NativeBackend {
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let reader = fs::read_dir(path).map_err(|e| {
            if self.is_file(path) {
                FsError::NotADirectory { path: path.into() }
            } else {
                FsError::io("list_directory", path, e)
            }
        })?;

        let mut raw = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| FsError::io("list_directory", path, e))?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!(path, name = ?raw, "skipping entry with non UTF-8 name");
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(t) if t.is_dir() => FileType::Directory,
                Ok(t) if t.is_file() => FileType::Regular,
                // symlinks and anything the OS did not classify
                _ => FileType::Unknown,
            };
            raw.push((name, file_type));
        }

        Ok(normalize_entries(raw, |name| {
            self.is_directory(&path::join(path, name), true)
        }))
    }
}
