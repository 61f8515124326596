//! Boundary to a handle-based platform store.
//!
//! The content-provider backend only depends on these traits, never on how
//! the calls reach the platform. Implementations wrapping a foreign runtime
//! must make sure every call happens on a thread attached to that runtime.

use crate::NativeHandle;

/// Entry point of a platform store: hands out one opaque handle per path.
pub trait StorageBridge: Send + Sync {
    /// Look up the handle for a resolved path, or `None` if the store refuses.
    fn handle_for_path(&self, path: &str) -> Option<Box<dyn StorageHandle>>;
}

/// Capability object for one path in a platform store.
pub trait StorageHandle {
    /// Returns `true` if the handle refers to a regular resource.
    fn is_file(&self) -> bool;

    /// Returns `true` if the handle refers to a directory.
    fn is_directory(&self) -> bool;

    /// Returns `true` if the resource exists.
    fn exists(&self) -> bool;

    /// Size in bytes, negative if unknown.
    fn file_size(&self) -> i64;

    /// Open a readable descriptor.
    ///
    /// Stores may return a descriptor even for a missing resource; the
    /// caller validates it.
    fn create_input_descriptor(&self) -> Option<Box<dyn NativeHandle>>;

    /// Open a writable descriptor, appending or truncating.
    fn create_output_descriptor(&self, append: bool) -> Option<Box<dyn NativeHandle>>;

    /// Names of the children with a parallel array of directory flags.
    ///
    /// `None` if the handle cannot be listed.
    fn list_directory(&self) -> Option<DirectoryListing>;
}

/// Directory content as reported by a platform store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Child names.
    pub names: Vec<String>,
    /// `is_directory[i]` classifies `names[i]`.
    pub is_directory: Vec<bool>,
}
