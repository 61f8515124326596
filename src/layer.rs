//! # Layer Trait
//!
//! Tower-style composition for backends.
//!
//! ## Overview
//!
//! A [`Layer`] wraps a backend in another backend that changes some of its
//! behavior and forwards the rest. The resource hooks in
//! [`backend::hook`](crate::backend::hook) are built this way.
//!
//! ```text
//! Backend ──▶ Layer::layer() ──▶ Wrapped Backend
//! ```
//!
//! ## Fluent Composition
//!
//! ```rust
//! use assetfs::{Backend, HookLayer, Hook, LayerExt, NativeBackend};
//!
//! let hooked = NativeBackend::new().layer(HookLayer::new(Hook::SacredTears, "/game/RPG_RT.lmt"));
//! fn takes_backend<B: Backend>(_: &B) {}
//! takes_backend(&hooked);
//! ```

use crate::Backend;

/// A layer that wraps a backend to change part of its behavior.
///
/// `layer(self, backend)` consumes both the layer configuration and the
/// backend. Layers are composed at compile time; there is no object-safe form.
///
/// # Example
///
/// ```rust
/// use assetfs::Layer;
///
/// struct Tagged<B> {
///     inner: B,
///     tag: &'static str,
/// }
///
/// struct TagLayer(&'static str);
///
/// impl<B> Layer<B> for TagLayer {
///     type Backend = Tagged<B>;
///
///     fn layer(self, backend: B) -> Self::Backend {
///         Tagged { inner: backend, tag: self.0 }
///     }
/// }
/// ```
pub trait Layer<B> {
    /// The resulting backend type after applying this layer.
    type Backend;

    /// Wrap `backend` with this layer.
    fn layer(self, backend: B) -> Self::Backend;
}

/// Extension trait for fluent layer composition.
///
/// Provides `.layer()` on every [`Backend`].
pub trait LayerExt: Backend + Sized {
    /// Apply a layer to this backend.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Backend {
        layer.layer(self)
    }
}

impl<B: Backend> LayerExt for B {}
