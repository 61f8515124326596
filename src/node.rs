//! # Filesystem Node
//!
//! A [`FilesystemNode`] is a view of a backend rooted at a base path. Nodes
//! chain: a subtree node resolves its paths against its own base and then
//! hands them to its parent, up to the root node that owns the backend.
//!
//! ```text
//! root  "/game"   ── NativeBackend
//!   └─ sub "Save" ── borrows root
//!
//! sub.open_input("file1.sav")  →  "/game/Save/file1.sav"
//! ```
//!
//! Parents are borrowed, so a chain cannot contain a cycle and a subtree
//! cannot outlive its parent.
//!
//! Every operation reports failure as a sentinel (`None`, `false`, `-1`)
//! after logging the underlying [`FsError`](crate::FsError) at `debug`.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::path;
use crate::{
    Backend, DirEntry, Feature, FsDir, FsExt, FsRead, FsWrite, InputStream, NativeBackend,
    OpenMode, OutputStream,
};

enum Link<'p> {
    Root(Arc<dyn Backend>),
    Parent(&'p FilesystemNode<'p>),
}

/// Handle onto a backend at a base path.
///
/// # Example
///
/// ```rust,no_run
/// use assetfs::{FilesystemNode, OpenMode};
///
/// let game = FilesystemNode::native("/game");
/// let save = game.subtree("Save");
/// if let Some(mut file) = save.open_input("file1.sav", OpenMode::BINARY) {
///     let header = file.read_bytes(11);
/// }
/// ```
pub struct FilesystemNode<'p> {
    base_path: String,
    link: Link<'p>,
}

impl FilesystemNode<'static> {
    /// Root node over `backend`.
    pub fn new(backend: Arc<dyn Backend>, base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            link: Link::Root(backend),
        }
    }

    /// Root node over the host file tree.
    pub fn native(base_path: impl Into<String>) -> Self {
        Self::new(Arc::new(NativeBackend::new()), base_path)
    }
}

impl<'p> FilesystemNode<'p> {
    /// Node whose paths are resolved against `base_path` and then `parent`.
    pub fn with_parent(parent: &'p FilesystemNode<'p>, base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            link: Link::Parent(parent),
        }
    }

    /// Child node rooted at `path`, relative to this node.
    pub fn subtree(&self, path: impl Into<String>) -> FilesystemNode<'_> {
        FilesystemNode::with_parent(self, path)
    }

    /// This node's base path, as given at construction.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The parent node, if this is not a root.
    pub fn parent(&self) -> Option<&FilesystemNode<'p>> {
        match self.link {
            Link::Root(_) => None,
            Link::Parent(parent) => Some(parent),
        }
    }

    /// The backend owned by the root of this chain.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        let mut node = self;
        loop {
            match &node.link {
                Link::Root(backend) => return backend,
                Link::Parent(parent) => node = *parent,
            }
        }
    }

    /// Fully resolved path for `path`, as the backend sees it.
    pub fn resolve(&self, path: &str) -> String {
        let mut resolved = path::join(&self.base_path, path);
        let mut node = self;
        while let Link::Parent(parent) = &node.link {
            resolved = path::join(&parent.base_path, &resolved);
            node = *parent;
        }
        resolved
    }

    /// Returns `true` if `path` is a regular file.
    pub fn is_file(&self, path: &str) -> bool {
        self.backend().is_file(&self.resolve(path))
    }

    /// Returns `true` if `path` is a directory.
    pub fn is_directory(&self, path: &str, follow_symlinks: bool) -> bool {
        self.backend().is_directory(&self.resolve(path), follow_symlinks)
    }

    /// Returns `true` if `path` exists.
    pub fn exists(&self, path: &str) -> bool {
        self.backend().exists(&self.resolve(path))
    }

    /// Size of the file at `path` in bytes, or `-1`.
    pub fn file_size(&self, path: &str) -> i64 {
        self.backend().file_size(&self.resolve(path))
    }

    /// Open `path` for reading.
    ///
    /// The stream is named after `path` as passed here.
    pub fn open_input(&self, path: &str, mode: OpenMode) -> Option<InputStream<'static>> {
        let resolved = self.resolve(path);
        match self.backend().open_input(&resolved, mode) {
            Ok(channel) => Some(InputStream::new(channel, path)),
            Err(e) => {
                debug!(path = %resolved, error = %e, "open_input failed");
                None
            }
        }
    }

    /// Open `path` for writing, truncating unless `mode.append` is set.
    ///
    /// Returns `None` without touching the backend if writing is unsupported.
    pub fn open_output(&self, path: &str, mode: OpenMode) -> Option<OutputStream<'static>> {
        let resolved = self.resolve(path);
        if !self.writable(&resolved) {
            return None;
        }
        match self.backend().open_output(&resolved, mode) {
            Ok(channel) => Some(OutputStream::new(channel, path)),
            Err(e) => {
                debug!(path = %resolved, error = %e, "open_output failed");
                None
            }
        }
    }

    /// Entries of the directory at `path`, without `.` and `..`.
    ///
    /// `None` if the directory cannot be listed, which is distinct from an
    /// empty listing.
    pub fn list_directory(&self, path: &str) -> Option<Vec<DirEntry>> {
        let resolved = self.resolve(path);
        match self.backend().list_directory(&resolved) {
            Ok(entries) => {
                debug!(path = %resolved, count = entries.len(), "listed directory");
                Some(entries)
            }
            Err(e) => {
                debug!(path = %resolved, error = %e, "list_directory failed");
                None
            }
        }
    }

    /// Create the directory at `path` and any missing parents.
    pub fn make_directory(&self, path: &str, follow_symlinks: bool) -> bool {
        let resolved = self.resolve(path);
        if !self.writable(&resolved) {
            return false;
        }
        match self.backend().make_directory(&resolved, follow_symlinks) {
            Ok(()) => true,
            Err(e) => {
                debug!(path = %resolved, error = %e, "make_directory failed");
                false
            }
        }
    }

    /// Returns `true` if the backend supports `feature`.
    pub fn is_feature_supported(&self, feature: Feature) -> bool {
        self.backend().is_feature_supported(feature)
    }

    /// Human readable description, e.g. `[Native] /game/Save`.
    pub fn describe(&self) -> String {
        self.backend().describe(&self.resolve(""))
    }

    /// Whole contents of `path`.
    pub fn read_all(&self, path: &str) -> Option<Vec<u8>> {
        let resolved = self.resolve(path);
        self.backend()
            .read_all(&resolved)
            .map_err(|e| debug!(path = %resolved, error = %e, "read_all failed"))
            .ok()
    }

    /// Write `data` to `path`, truncating unless `mode.append` is set.
    pub fn write_all(&self, path: &str, data: &[u8], mode: OpenMode) -> bool {
        let resolved = self.resolve(path);
        self.backend()
            .write_all(&resolved, data, mode)
            .map_err(|e| debug!(path = %resolved, error = %e, "write_all failed"))
            .is_ok()
    }

    /// Read `path` and deserialize it as JSON.
    #[cfg(feature = "serde")]
    pub fn read_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Option<T> {
        use crate::FsExtJson;

        let resolved = self.resolve(path);
        self.backend()
            .read_json(&resolved)
            .map_err(|e| debug!(path = %resolved, error = %e, "read_json failed"))
            .ok()
    }

    /// Serialize `value` as JSON into `path`.
    #[cfg(feature = "serde")]
    pub fn write_json<T: serde::Serialize>(&self, path: &str, value: &T) -> bool {
        use crate::FsExtJson;

        let resolved = self.resolve(path);
        self.backend()
            .write_json(&resolved, value)
            .map_err(|e| debug!(path = %resolved, error = %e, "write_json failed"))
            .is_ok()
    }

    fn writable(&self, resolved: &str) -> bool {
        let supported = self.is_feature_supported(Feature::Write);
        if !supported {
            debug!(path = %resolved, "backend is read-only");
        }
        supported
    }
}

impl fmt::Debug for FilesystemNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemNode")
            .field("base_path", &self.base_path)
            .field("parent", &self.parent())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteChannel, FileType, FsError, MemoryChannel};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Records every path it is asked about.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
        files: BTreeMap<String, Vec<u8>>,
        writable: bool,
    }

    impl Recorder {
        fn saw(&self, path: &str) {
            self.seen.lock().unwrap().push(path.to_string());
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl FsRead for Recorder {
        fn is_file(&self, path: &str) -> bool {
            self.saw(path);
            self.files.contains_key(path)
        }
        fn is_directory(&self, path: &str, _: bool) -> bool {
            self.saw(path);
            false
        }
        fn file_size(&self, path: &str) -> i64 {
            self.saw(path);
            self.files.get(path).map_or(-1, |d| d.len() as i64)
        }
        fn open_input(&self, path: &str, _: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
            self.saw(path);
            self.files
                .get(path)
                .map(|d| Box::new(MemoryChannel::owned(d.clone())) as Box<dyn ByteChannel>)
                .ok_or_else(|| FsError::NotFound { path: path.into() })
        }
        fn describe(&self, base_path: &str) -> String {
            format!("[Recorder] {base_path}")
        }
    }

    impl FsWrite for Recorder {
        fn is_feature_supported(&self, feature: Feature) -> bool {
            match feature {
                Feature::Write => self.writable,
            }
        }
        fn open_output(&self, path: &str, _: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
            self.saw(path);
            Ok(Box::new(MemoryChannel::owned(Vec::new())))
        }
        fn make_directory(&self, path: &str, _: bool) -> Result<(), FsError> {
            self.saw(path);
            Ok(())
        }
    }

    impl FsDir for Recorder {
        fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
            self.saw(path);
            if path == "/game" {
                Ok(vec![DirEntry::new("Save", FileType::Directory)])
            } else {
                Err(FsError::NotADirectory { path: path.into() })
            }
        }
    }

    fn recorder(writable: bool) -> Arc<Recorder> {
        let mut files = BTreeMap::new();
        files.insert("/game/Save/file1.sav".to_string(), b"LcfSaveData".to_vec());
        Arc::new(Recorder {
            files,
            writable,
            ..Recorder::default()
        })
    }

    #[test]
    fn resolves_through_chain() {
        let root = FilesystemNode::new(recorder(true), "/game");
        let save = root.subtree("Save");
        let slot = save.subtree("Slot1");
        assert_eq!(root.resolve("RPG_RT.ldb"), "/game/RPG_RT.ldb");
        assert_eq!(save.resolve("file1.sav"), "/game/Save/file1.sav");
        assert_eq!(slot.resolve("a"), "/game/Save/Slot1/a");
        assert_eq!(save.resolve(""), "/game/Save");
        assert_eq!(slot.parent().unwrap().base_path(), "Save");
        assert!(root.parent().is_none());
    }

    #[test]
    fn operations_receive_resolved_paths() {
        let backend = recorder(true);
        let root = FilesystemNode::new(backend.clone(), "/game");
        let save = root.subtree("Save");

        assert!(save.is_file("file1.sav"));
        assert_eq!(save.file_size("file1.sav"), 11);
        assert!(save.open_output("file2.sav", OpenMode::BINARY).is_some());
        assert!(save.make_directory("Backup", false));

        assert_eq!(backend.seen(), vec![
            "/game/Save/file1.sav",
            "/game/Save/file1.sav",
            "/game/Save/file2.sav",
            "/game/Save/Backup",
        ]);
    }

    #[test]
    fn open_input_names_stream_after_logical_path() {
        let root = FilesystemNode::new(recorder(true), "/game");
        let save = root.subtree("Save");
        let mut stream = save.open_input("file1.sav", OpenMode::BINARY).unwrap();
        assert_eq!(stream.name(), "file1.sav");
        assert_eq!(stream.size(), 11);
        assert_eq!(stream.read_string(11).as_deref(), Some("LcfSaveData"));
    }

    #[test]
    fn failures_become_sentinels() {
        let root = FilesystemNode::new(recorder(true), "/game");
        assert!(root.open_input("missing.lmu", OpenMode::BINARY).is_none());
        assert_eq!(root.file_size("missing.lmu"), -1);
        assert!(root.list_directory("Save").is_none());
        assert_eq!(
            root.list_directory("").unwrap(),
            vec![DirEntry::new("Save", FileType::Directory)]
        );
        assert!(root.read_all("missing.lmu").is_none());
    }

    #[test]
    fn read_only_backend_is_never_asked_to_write() {
        let backend = recorder(false);
        let root = FilesystemNode::new(backend.clone(), "/game");
        assert!(root.open_output("Save/file1.sav", OpenMode::BINARY).is_none());
        assert!(!root.make_directory("Save", false));
        assert!(!root.write_all("Save/file1.sav", b"x", OpenMode::BINARY));
        assert!(backend.seen().is_empty());
    }

    #[test]
    fn describe_uses_resolved_base() {
        let root = FilesystemNode::new(recorder(true), "/game");
        assert_eq!(root.describe(), "[Recorder] /game");
        assert_eq!(root.subtree("Music").describe(), "[Recorder] /game/Music");
    }

    #[test]
    fn debug_shows_chain() {
        let root = FilesystemNode::new(recorder(true), "/game");
        let save = root.subtree("Save");
        let text = format!("{save:?}");
        assert!(text.contains("\"Save\""));
        assert!(text.contains("\"/game\""));
    }
}
