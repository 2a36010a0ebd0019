//! Pluggable storage backends for persisting the session identity.
//!
//! The identity (credential token plus cached favorites projection) is
//! the only durable state this client owns. This module defines the
//! [`SessionStorage`] (async) and [`BlockingSessionStorage`] (blocking)
//! traits via a shared macro, mirroring the client generation pattern
//! in [`crate::client`].

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileSessionStorage;
pub use memory::InMemorySessionStorage;

/// Generates a storage trait (async or blocking) with all session methods.
///
/// Uses `@methods` to define the method list once, and `@method` to render
/// each method in async (`impl Future + Send`) or blocking (`fn`) style.
macro_rules! define_session_storage {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_session_storage!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_session_storage!(@methods blocking);
        }
    };

    // ── Single method list (shared between both variants) ───────────
    (@methods $mode:ident) => {
        define_session_storage!(@method $mode, load,
            "Returns the persisted identity from the last run.\n\nReturns `Ok(None)` when no identity has been persisted.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Option<Identity>>);
        define_session_storage!(@method $mode, save,
            "Persists the identity, replacing any previous one.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            identity: &Identity, -> Result<()>);
        define_session_storage!(@method $mode, clear,
            "Removes the persisted identity (logout or forced 401 clear).\n\nClearing an already-empty backend is a no-op.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            -> Result<()>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

#[cfg(feature = "async")]
mod async_storage {
    //! Async storage trait definition.

    use crate::error::Result;
    use crate::models::Identity;

    define_session_storage! {
        trait_name: SessionStorage,
        trait_doc: "Async storage backend for persisting the session identity.\n\nAll methods take `&self` — implementations should use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: async_mode,
    }
}

#[cfg(feature = "blocking")]
mod blocking_storage {
    //! Blocking storage trait definition.

    use crate::error::Result;
    use crate::models::Identity;

    define_session_storage! {
        trait_name: BlockingSessionStorage,
        trait_doc: "Blocking storage backend for persisting the session identity.\n\nAll methods take `&self` — implementations should use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: blocking,
    }
}

#[cfg(feature = "async")]
pub use async_storage::SessionStorage;
#[cfg(feature = "blocking")]
pub use blocking_storage::BlockingSessionStorage;
