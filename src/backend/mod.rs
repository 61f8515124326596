//! # Backends
//!
//! Concrete storage providers.
//!
//! | Backend | Storage | Tag |
//! |---------|---------|-----|
//! | [`NativeBackend`] | OS file tree through `std::fs` | `[Native]` |
//! | [`ContentProviderBackend`] | Opaque per-path handles behind a [`StorageBridge`] | `[ContentProvider]` |
//! | [`HookBackend`] | Another backend, with one resource transformed on read | `[Hook]` |

mod bridge;
mod content_provider;
pub mod hook;
mod native;

pub use bridge::{DirectoryListing, StorageBridge, StorageHandle};
pub use content_provider::ContentProviderBackend;
pub use hook::{Hook, HookBackend, HookLayer};
pub use native::NativeBackend;
