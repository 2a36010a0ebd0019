//! In-memory storage backend for testing.
//!
//! Provides [`InMemorySessionStorage`], a thread-safe in-memory
//! implementation of the session storage traits. Ideal for unit and
//! integration tests where file I/O is undesirable.

use std::sync::Mutex;

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::error::{Result, TableTopError};
use crate::models::Identity;

/// Thread-safe in-memory session storage for testing.
///
/// This type implements both [`super::SessionStorage`] (async) and
/// [`super::BlockingSessionStorage`] (blocking) traits, providing a
/// zero-setup backend for tests.
///
/// # Example
///
/// ```rust
/// use tabletop_rs::storage::InMemorySessionStorage;
///
/// let storage = InMemorySessionStorage::new();
/// // Use with TableTop or TableTopBlocking builders:
/// // TableTopBlocking::builder().storage(storage).build()
/// ```
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    /// The persisted identity behind a mutex for interior mutability.
    inner: Mutex<Option<Identity>>,
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> TableTopError {
    TableTopError::Storage(err.to_string().into())
}

impl InMemorySessionStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-seeded with an identity, as if a previous
    /// run had persisted it.
    #[inline]
    #[must_use]
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            inner: Mutex::new(Some(identity)),
        }
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut Option<Identity>) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }
}

// ── BlockingSessionStorage implementation ───────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingSessionStorage for InMemorySessionStorage {
    #[inline]
    fn load(&self) -> Result<Option<Identity>> {
        self.with_lock(|inner| inner.clone())
    }

    #[inline]
    fn save(&self, identity: &Identity) -> Result<()> {
        self.with_lock(|inner| *inner = Some(identity.clone()))
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_lock(|inner| *inner = None)
    }
}

// ── SessionStorage (async) implementation ───────────────────────────────

#[cfg(feature = "async")]
impl super::SessionStorage for InMemorySessionStorage {
    #[inline]
    fn load(&self) -> impl Future<Output = Result<Option<Identity>>> + Send {
        future::ready(self.with_lock(|inner| inner.clone()))
    }

    #[inline]
    fn save(&self, identity: &Identity) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = Some(identity.clone())))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RestaurantId, Role, UserId};
    use secrecy::SecretString;

    fn test_identity() -> Identity {
        Identity {
            id: UserId::new(1),
            username: "john_doe".to_owned(),
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            role: Role::User,
            token: SecretString::from("tok-john".to_owned()),
            favorites: vec![RestaurantId::new(1), RestaurantId::new(3)],
        }
    }

    // ── Blocking tests ─────────────────────────────────────────────────

    #[cfg(feature = "blocking")]
    mod blocking {
        use super::*;
        use crate::storage::BlockingSessionStorage;

        #[test]
        fn load_empty() {
            let storage = InMemorySessionStorage::new();
            assert!(storage.load().unwrap().is_none());
        }

        #[test]
        fn save_then_load() {
            let storage = InMemorySessionStorage::new();
            storage.save(&test_identity()).unwrap();
            let loaded = storage.load().unwrap().unwrap();
            assert_eq!(loaded, test_identity());
        }

        #[test]
        fn clear_removes_identity() {
            let storage = InMemorySessionStorage::with_identity(test_identity());
            assert!(storage.load().unwrap().is_some());
            storage.clear().unwrap();
            assert!(storage.load().unwrap().is_none());
        }

        #[test]
        fn clear_when_empty_is_noop() {
            let storage = InMemorySessionStorage::new();
            storage.clear().unwrap();
            assert!(storage.load().unwrap().is_none());
        }
    }

    // ── Async tests ────────────────────────────────────────────────────

    #[cfg(feature = "async")]
    mod async_tests {
        use super::*;
        use crate::storage::SessionStorage;

        #[tokio::test]
        async fn save_then_load() {
            let storage = InMemorySessionStorage::new();
            storage.save(&test_identity()).await.unwrap();
            let loaded = storage.load().await.unwrap().unwrap();
            assert_eq!(loaded.username, "john_doe");
        }

        #[tokio::test]
        async fn clear_removes_identity() {
            let storage = InMemorySessionStorage::with_identity(test_identity());
            storage.clear().await.unwrap();
            assert!(storage.load().await.unwrap().is_none());
        }
    }
}
