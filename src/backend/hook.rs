//! Per-game resource hooks.
//!
//! Some games ship with one of their data files obfuscated. A hook detects
//! the obfuscation by probing a known file and, if found, layers a
//! [`HookBackend`] over the game's backend that undoes it on read.

use std::sync::Arc;

use tracing::debug;

use crate::{
    Backend, ByteChannel, CaesarChannel, DirEntry, Feature, FilesystemNode, FsDir, FsError,
    FsRead, FsWrite, Layer, LayerExt, OpenMode,
};

/// Known game hooks.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Sacred Tears: the map tree is Caesar-shifted by one.
    SacredTears,
}

impl Hook {
    /// Every known hook, in detection order.
    pub const ALL: &'static [Hook] = &[Hook::SacredTears];

    /// Name of the file the hook inspects and transforms.
    pub const fn target_name(self) -> &'static str {
        match self {
            Hook::SacredTears => "RPG_RT.lmt",
        }
    }

    /// Leading bytes of the transformed file.
    pub const fn magic(self) -> &'static [u8] {
        match self {
            Hook::SacredTears => b"\x0bMdgNbqUsff",
        }
    }

    /// Human readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Hook::SacredTears => "Sacred Tears",
        }
    }

    fn wrap(self, channel: Box<dyn ByteChannel>) -> Box<dyn ByteChannel> {
        match self {
            Hook::SacredTears => Box::new(CaesarChannel::new(channel, 1)),
        }
    }
}

/// [`Layer`] that installs a [`Hook`] on one fully resolved path.
#[derive(Debug, Clone)]
pub struct HookLayer {
    hook: Hook,
    target: String,
}

impl HookLayer {
    /// Hook `target`, a path as the wrapped backend sees it.
    pub fn new(hook: Hook, target: impl Into<String>) -> Self {
        Self {
            hook,
            target: target.into(),
        }
    }
}

impl<B: Backend> Layer<B> for HookLayer {
    type Backend = HookBackend<B>;

    fn layer(self, backend: B) -> Self::Backend {
        HookBackend {
            inner: backend,
            hook: self.hook,
            target: self.target,
        }
    }
}

/// Backend that forwards to `inner` and transforms reads of one file.
#[derive(Debug)]
pub struct HookBackend<B> {
    inner: B,
    hook: Hook,
    target: String,
}

impl<B> HookBackend<B> {
    /// The installed hook.
    pub fn hook(&self) -> Hook {
        self.hook
    }
}

impl<B: FsRead> FsRead for HookBackend<B> {
    fn is_file(&self, path: &str) -> bool {
        self.inner.is_file(path)
    }

    fn is_directory(&self, path: &str, follow_symlinks: bool) -> bool {
        self.inner.is_directory(path, follow_symlinks)
    }

    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn file_size(&self, path: &str) -> i64 {
        self.inner.file_size(path)
    }

    fn open_input(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        let channel = self.inner.open_input(path, mode)?;
        if path == self.target {
            return Ok(self.hook.wrap(channel));
        }
        Ok(channel)
    }

    fn describe(&self, _base_path: &str) -> String {
        format!("[Hook] ({})", self.hook.label())
    }
}

impl<B: FsWrite> FsWrite for HookBackend<B> {
    fn is_feature_supported(&self, feature: Feature) -> bool {
        self.inner.is_feature_supported(feature)
    }

    fn open_output(&self, path: &str, mode: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
        self.inner.open_output(path, mode)
    }

    fn make_directory(&self, path: &str, follow_symlinks: bool) -> Result<(), FsError> {
        self.inner.make_directory(path, follow_symlinks)
    }
}

impl<B: FsDir> FsDir for HookBackend<B> {
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        self.inner.list_directory(path)
    }
}

/// Check `node` for a known obfuscation.
///
/// Returns a new root node over the same directory whose backend undoes the
/// obfuscation, or `None` if no hook applies.
///
/// # Example
///
/// ```rust,no_run
/// use assetfs::{hook, FilesystemNode};
///
/// let game = FilesystemNode::native("/games/sacred_tears");
/// let game = hook::detect(&game).unwrap_or(game);
/// println!("{}", game.describe());
/// ```
pub fn detect(node: &FilesystemNode<'_>) -> Option<FilesystemNode<'static>> {
    let hook = Hook::ALL.iter().copied().find(|hook| is_hooked(node, *hook))?;
    debug!(hook = hook.label(), base = %node.resolve(""), "installing resource hook");
    let layer = HookLayer::new(hook, node.resolve(hook.target_name()));
    let backend = node.backend().clone().layer(layer);
    Some(FilesystemNode::new(Arc::new(backend), node.resolve("")))
}

fn is_hooked(node: &FilesystemNode<'_>, hook: Hook) -> bool {
    let Some(mut stream) = node.open_input(hook.target_name(), OpenMode::BINARY) else {
        return false;
    };
    stream
        .read_bytes(hook.magic().len())
        .is_some_and(|head| head == hook.magic())
}
