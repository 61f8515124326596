//! # Backend Traits
//!
//! The capability contract every storage backend implements.
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`FsRead`] | `is_file`, `is_directory`, `exists`, `file_size`, `open_input`, `describe` |
//! | [`FsWrite`] | `is_feature_supported`, `open_output`, `make_directory` |
//! | [`FsDir`] | `list_directory` |
//!
//! [`Backend`] combines the three and has a blanket implementation: implement
//! the components and the composite comes for free. There is no deeper
//! hierarchy.
//!
//! ## Object Safety
//!
//! All traits are object-safe. Nodes hold backends as `Arc<dyn Backend>`:
//!
//! ```rust
//! use assetfs::{Backend, Feature, FsWrite};
//!
//! fn can_save(backend: &dyn Backend) -> bool {
//!     backend.is_feature_supported(Feature::Write)
//! }
//! ```

mod fs_dir;
mod fs_read;
mod fs_write;

pub use fs_dir::{normalize_entries, FsDir};
pub use fs_read::FsRead;
pub use fs_write::FsWrite;

/// A complete storage backend.
///
/// Automatically implemented for any type implementing [`FsRead`],
/// [`FsWrite`] and [`FsDir`].
///
/// # Example
///
/// ```rust
/// use assetfs::{Backend, FsError};
///
/// fn count_maps<B: Backend + ?Sized>(backend: &B, dir: &str) -> Result<usize, FsError> {
///     Ok(backend
///         .list_directory(dir)?
///         .iter()
///         .filter(|e| e.is_file() && e.name.ends_with(".lmu"))
///         .count())
/// }
/// ```
pub trait Backend: FsRead + FsWrite + FsDir {}

impl<T: FsRead + FsWrite + FsDir + ?Sized> Backend for T {}
