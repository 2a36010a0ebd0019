//! JSON-file-based session storage backend.
//!
//! Persists the session identity as a single JSON document under a
//! configurable directory (default: `$XDG_DATA_HOME/tabletop-rs/`), so
//! a signed-in session survives restarts.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::error::{Result, TableTopError};
use crate::models::Identity;

/// Application name used for the XDG data directory.
const APP_NAME: &str = "tabletop-rs";

/// File holding the persisted identity.
const SESSION_FILE: &str = "session.json";

/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed storage that persists the session identity as JSON.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]).
///
/// Read operations acquire a shared lock (allowing concurrent readers),
/// while write operations acquire an exclusive lock.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   session.json
/// ```
#[derive(Debug)]
pub struct FileSessionStorage {
    /// Directory containing the session file.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

/// Wraps an I/O error into a storage error.
fn storage_io_error(err: std::io::Error) -> TableTopError {
    TableTopError::Storage(Box::new(err))
}

/// Wraps a mutex poison error.
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> TableTopError {
    TableTopError::Storage(err.to_string().into())
}

impl FileSessionStorage {
    /// Creates a new file storage rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist. Also
    /// opens (or creates) the `storage.lock` sentinel file used for
    /// cross-process advisory locking.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this
    /// application.
    ///
    /// On Linux: `$XDG_DATA_HOME/tabletop-rs/` (typically
    /// `~/.local/share/tabletop-rs/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be
    /// determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                TableTopError::Storage("could not determine platform data directory".into())
            })
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path of the session file.
    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads and deserializes the session file. Returns `None` if the
    /// file does not exist.
    fn read_identity(&self) -> Result<Option<Identity>> {
        match fs::read_to_string(self.session_path()) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(TableTopError::from),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes the session file (write-to-tmp then rename).
    fn write_identity(&self, identity: &Identity) -> Result<()> {
        let path = self.session_path();
        let tmp_path = self.dir.join(format!("{SESSION_FILE}.tmp"));
        let json = serde_json::to_string_pretty(identity).map_err(TableTopError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Removes the session file; missing files are fine.
    fn remove_identity(&self) -> Result<()> {
        match fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_io_error(err)),
        }
    }
}

// ── BlockingSessionStorage implementation ───────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingSessionStorage for FileSessionStorage {
    #[inline]
    fn load(&self) -> Result<Option<Identity>> {
        self.with_shared_lock(|| self.read_identity())
    }

    #[inline]
    fn save(&self, identity: &Identity) -> Result<()> {
        self.with_exclusive_lock(|| self.write_identity(identity))
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_exclusive_lock(|| self.remove_identity())
    }
}

// ── SessionStorage (async) implementation ───────────────────────────────

#[cfg(feature = "async")]
impl super::SessionStorage for FileSessionStorage {
    #[inline]
    fn load(&self) -> impl Future<Output = Result<Option<Identity>>> + Send {
        future::ready(self.with_shared_lock(|| self.read_identity()))
    }

    #[inline]
    fn save(&self, identity: &Identity) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_exclusive_lock(|| self.write_identity(identity)))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_exclusive_lock(|| self.remove_identity()))
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
            favorites: vec![
                RestaurantId::new(1),
                RestaurantId::new(3),
                RestaurantId::new(5),
            ],
        }
    }

    #[cfg(feature = "blocking")]
    mod blocking {
        use super::*;
        use crate::storage::BlockingSessionStorage;

        #[test]
        fn load_from_empty_dir() {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            assert!(storage.load().unwrap().is_none());
        }

        #[test]
        fn save_then_load_roundtrip() {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            storage.save(&test_identity()).unwrap();
            let loaded = storage.load().unwrap().unwrap();
            assert_eq!(loaded, test_identity());
        }

        #[test]
        fn identity_survives_reopen() {
            let dir = tempfile::tempdir().unwrap();
            let first = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            first.save(&test_identity()).unwrap();
            drop(first);

            // A fresh instance on the same directory sees the identity,
            // as across an application restart.
            let second = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            let loaded = second.load().unwrap().unwrap();
            assert_eq!(loaded.username, "john_doe");
            assert_eq!(loaded.favorites.len(), 3);
        }

        #[test]
        fn clear_removes_file() {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            storage.save(&test_identity()).unwrap();
            storage.clear().unwrap();
            assert!(storage.load().unwrap().is_none());
            // Clearing twice is fine.
            storage.clear().unwrap();
        }

        #[test]
        fn corrupted_file_surfaces_error() {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            fs::write(dir.path().join("session.json"), "not json").unwrap();
            assert!(storage.load().is_err());
        }
    }

    #[cfg(feature = "async")]
    mod async_tests {
        use super::*;
        use crate::storage::SessionStorage;

        #[tokio::test]
        async fn save_load_clear() {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            storage.save(&test_identity()).await.unwrap();
            assert!(storage.load().await.unwrap().is_some());
            storage.clear().await.unwrap();
            assert!(storage.load().await.unwrap().is_none());
        }
    }

    #[test]
    fn default_dir_ends_with_app_name() {
        let dir = FileSessionStorage::default_dir().unwrap();
        assert!(dir.ends_with("tabletop-rs"));
    }
}
