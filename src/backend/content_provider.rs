//! Backend over a handle-based platform store.

use tracing::warn;

use super::bridge::{StorageBridge, StorageHandle};
use crate::path;
use crate::{
    normalize_entries, ByteChannel, DirEntry, Feature, FileType, FsDir, FsError, FsRead, FsWrite,
    OpenMode, PlatformChannel,
};

/// Backend that reaches files through a [`StorageBridge`].
///
/// Every operation asks the bridge for a handle on the resolved path and
/// forwards the query to it. Input descriptors are validated with an initial
/// read (see [`PlatformChannel`]), since stores may hand out a descriptor for
/// a resource that does not exist.
///
/// `follow_symlinks` is ignored: the store has no links.
#[derive(Debug)]
pub struct ContentProviderBackend<B> {
    bridge: B,
    read_only: bool,
}

impl<B: StorageBridge> ContentProviderBackend<B> {
    /// A writable backend over `bridge`.
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            read_only: false,
        }
    }

    /// A backend over `bridge` that refuses every mutating operation.
    pub fn read_only(bridge: B) -> Self {
        Self {
            bridge,
            read_only: true,
        }
    }

    /// The underlying bridge.
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    fn handle(&self, path: &str) -> Result<Box<dyn StorageHandle>, FsError> {
        self.bridge
            .handle_for_path(path)
            .ok_or_else(|| FsError::NotFound { path: path.into() })
    }
}

impl<B: StorageBridge> FsRead for ContentProviderBackend<B> {
    fn is_file(&self, path: &str) -> bool {
        self.bridge
            .handle_for_path(path)
            .is_some_and(|h| h.is_file())
    }

    fn is_directory(&self, path: &str, _follow_symlinks: bool) -> bool {
        self.bridge
            .handle_for_path(path)
            .is_some_and(|h| h.is_directory())
    }

    fn exists(&self, path: &str) -> bool {
        self.bridge.handle_for_path(path).is_some_and(|h| h.exists())
    }

    fn file_size(&self, path: &str) -> i64 {
        self.bridge
            .handle_for_path(path)
            .map_or(-1, |h| h.file_size().max(-1))
    }

    fn open_input(&self, path: &str, _mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        let descriptor = self
            .handle(path)?
            .create_input_descriptor()
            .ok_or_else(|| FsError::NotFound { path: path.into() })?;
        Ok(Box::new(PlatformChannel::open_input(descriptor, path)?))
    }

    fn describe(&self, base_path: &str) -> String {
        format!("[ContentProvider] {base_path}")
    }
}

impl<B: StorageBridge> FsWrite for ContentProviderBackend<B> {
    fn is_feature_supported(&self, feature: Feature) -> bool {
        match feature {
            Feature::Write => !self.read_only,
        }
    }

    fn open_output(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        if self.read_only {
            return Err(FsError::ReadOnly {
                operation: "open_output",
            });
        }
        let descriptor = self
            .handle(path)?
            .create_output_descriptor(mode.append)
            .ok_or_else(|| {
                FsError::Backend(format!("store refused output descriptor for {path}"))
            })?;
        Ok(Box::new(PlatformChannel::open_output(descriptor)))
    }

    fn make_directory(&self, path: &str, _follow_symlinks: bool) -> Result<(), FsError> {
        if self.read_only {
            return Err(FsError::ReadOnly {
                operation: "make_directory",
            });
        }
        if self.is_directory(path, true) {
            return Ok(());
        }
        Err(FsError::NotSupported {
            operation: "make_directory",
        })
    }
}

impl<B: StorageBridge> FsDir for ContentProviderBackend<B> {
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let listing = self
            .handle(path)?
            .list_directory()
            .ok_or_else(|| FsError::NotADirectory { path: path.into() })?;

        if listing.names.len() != listing.is_directory.len() {
            warn!(
                path,
                names = listing.names.len(),
                flags = listing.is_directory.len(),
                "directory listing has mismatched name and flag counts"
            );
        }

        let mut flags = listing.is_directory.into_iter();
        let raw = listing.names.into_iter().map(|name| {
            let file_type = match flags.next() {
                Some(true) => FileType::Directory,
                Some(false) => FileType::Regular,
                None => FileType::Unknown,
            };
            (name, file_type)
        });

        Ok(normalize_entries(raw, |name| {
            self.is_directory(&path::join(path, name), true)
        }))
    }
}
