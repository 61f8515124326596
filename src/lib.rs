//! # assetfs
//!
//! Virtual filesystem core for game asset access.
//!
//! A [`FilesystemNode`] is a view of a storage [`Backend`] rooted at a base
//! path. Nodes chain: a subtree resolves paths against its own base, then
//! against its parent's, down to the backend. Files open as
//! [`InputStream`]/[`OutputStream`] over a [`ByteChannel`], with typed scalar
//! reads in a fixed wire byte order.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use assetfs::{FilesystemNode, OpenMode};
//!
//! let game = FilesystemNode::native("/games/demo");
//! for entry in game.list_directory("").unwrap_or_default() {
//!     println!("{} {:?}", entry.name, entry.file_type);
//! }
//!
//! let maps = game.subtree("Map");
//! if let Some(mut map) = maps.open_input("Map0001.lmu", OpenMode::BINARY) {
//!     let len: Option<u32> = map.read_obj();
//!     println!("{}: {:?}", map.name(), len);
//! }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FilesystemNode`] | Base path plus backend or parent; the user-facing API |
//! | [`Backend`] | Capability contract: [`FsRead`] + [`FsWrite`] + [`FsDir`] |
//! | [`NativeBackend`] | Host file tree |
//! | [`ContentProviderBackend`] | Handle-based platform store behind a [`StorageBridge`] |
//! | [`HookBackend`] | Per-game transform layered over another backend |
//! | [`InputStream`] / [`OutputStream`] | Exclusive stream over one open channel |
//! | [`ByteChannel`] | Buffered descriptor, memory, or platform descriptor |
//! | [`FsError`] | Error type carried by backends |
//!
//! ---
//!
//! ## Error Handling
//!
//! Backends return `Result<T, FsError>`. [`FilesystemNode`] turns failures
//! into sentinels (`None`, `false`, `-1`) and logs the error through
//! [`tracing`](https://docs.rs/tracing) at `debug`.
//!
//! ```rust
//! use assetfs::FsError;
//!
//! let err = FsError::NotFound { path: "/game/missing.lmu".into() };
//! assert_eq!(err.to_string(), "not found: /game/missing.lmu");
//! ```
//!
//! ---
//!
//! ## Thread Safety
//!
//! Backends are `Send + Sync` and shared as `Arc<dyn Backend>`. Streams and
//! channels are `Send` but exclusively owned.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`DirEntry`], [`FileType`], [`OpenMode`], etc., plus `FsExtJson` |

mod channel;
mod error;
mod ext;
mod layer;
mod node;
mod stream;
mod traits;
mod types;

pub mod backend;
pub mod path;

// Public re-exports - error types
pub use error::FsError;

// Public re-exports - core types
pub use types::{
    ByteOrder, DirEntry, Feature, FileType, OpenMode, DEFAULT_BUFFER_SIZE, WIRE_ORDER,
};

// Public re-exports - backend contract
pub use traits::{normalize_entries, Backend, FsDir, FsRead, FsWrite};

// Public re-exports - backends
pub use backend::{
    hook, ContentProviderBackend, DirectoryListing, Hook, HookBackend, HookLayer, NativeBackend,
    StorageBridge, StorageHandle,
};

// Public re-exports - channels and streams
pub use channel::{
    ByteChannel, CaesarChannel, Capabilities, FdChannel, MemoryChannel, NativeHandle,
    PlatformChannel,
};
pub use stream::{InputStream, OutputStream, WireScalar};

#[cfg(unix)]
pub use channel::native_handle_from_fd;

// Public re-exports - node
pub use node::FilesystemNode;

// Public re-exports - infrastructure
pub use ext::FsExt;
pub use layer::{Layer, LayerExt};

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::FsExtJson;
