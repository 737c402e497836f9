//! Local store adapter.
//!
//! The dashboard keeps everything in a single string key-value store, the
//! way a browser keeps it in `localStorage`. This module owns the typed,
//! JSON-serialized view over that store:
//!
//! - [`LocalStore::get`] fails soft: a missing key or malformed JSON yields
//!   the caller's default and a `warn` log, never an error.
//! - [`LocalStore::set`] serializes and fully overwrites a key.
//! - [`LocalStore::update`] runs a read-modify-write under the store's
//!   mutation lock, so writers sharing one `LocalStore` never lose updates.
//! - [`LocalStore::subscribe`] delivers a [`StoreChange`] after every write.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used by tests
//! - [`FileStore`] - one JSON file on disk, re-read on every access
//!
//! Collections of records are stored as [`Collection`]s, which skip
//! elements they cannot decode instead of discarding the whole array.
//!
//! Separate processes pointed at the same file serialize their writes
//! through a lock file, so a write to one key never loses another
//! process's write to a different key. Two processes doing
//! read-modify-write on the same key are not coordinated: the last writer
//! wins.

mod collection;
mod file;
mod memory;

pub use collection::Collection;
pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::broadcast;

/// Fixed keys of the persisted collections.
pub mod keys {
    /// All user records, as a JSON array.
    pub const USERS: &str = "allUsers";

    /// Rich-text content entries, as a JSON array.
    pub const CONTENT: &str = "userContent";

    /// The signed-in session envelope `{ "user": Session }`.
    pub const AUTH: &str = "auth";

    /// Legacy single rich-text scratch buffer.
    pub const EDITOR: &str = "editorContent";
}

/// Capacity of the change notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Errors raised by store backends and writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing storage itself is unreadable.
    #[error("corrupt storage: {0}")]
    Corrupt(String),
}

/// A raw string key-value store with `localStorage` semantics.
///
/// Implementations must be safe to share between threads. They do not need
/// to provide any atomicity beyond single-key writes.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Notification published after a key is written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// The key that changed.
    pub key: String,
}

/// Outcome of a read-modify-write closure passed to [`LocalStore::update`].
#[derive(Debug)]
pub enum Mutation<R> {
    /// The value was modified and must be written back.
    Changed(R),
    /// Nothing changed; skip the write and the change notification.
    Unchanged(R),
}

/// Typed handle over a [`KeyValueStore`].
///
/// This struct is cheaply cloneable via `Arc`; clones share the backend,
/// the mutation lock and the change channel.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<LocalStoreInner>,
}

struct LocalStoreInner {
    backend: Box<dyn KeyValueStore>,
    changes: broadcast::Sender<StoreChange>,
    write_lock: Mutex<()>,
}

impl fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStore")
            .field("backend", &self.inner.backend)
            .field("subscribers", &self.inner.changes.receiver_count())
            .finish()
    }
}

impl LocalStore {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(LocalStoreInner {
                backend: Box::new(backend),
                changes,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// A store backed by a fresh in-memory map.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read and decode the value under `key`, or `default`.
    ///
    /// Missing keys, unreadable storage and malformed JSON all produce
    /// `default`; the latter two are logged at `warn`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.inner.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "Store read failed, using default");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed stored data, using default");
                default
            }
        }
    }

    /// Read and decode the value under `key`, or `T::default()`.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key, T::default())
    }

    /// Serialize `value` and overwrite `key` with it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the backend write fails.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.write_locked(key, value)
    }

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.inner.backend.remove_item(key)?;
        self.publish(key);
        Ok(())
    }

    /// Read the raw string under `key`, without JSON decoding.
    ///
    /// An unreadable store reads as `None`, logged at `warn`.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.inner.backend.get_item(key).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Store read failed");
            None
        })
    }

    /// Overwrite `key` with `value` as is, without JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn set_text(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.inner.backend.set_item(key, value)?;
        self.publish(key);
        Ok(())
    }

    /// Read-modify-write the value under `key`.
    ///
    /// The current value (or `T::default()`) is handed to `f`. When `f`
    /// returns [`Mutation::Changed`], the value is written back and a change
    /// is published. The whole sequence holds the mutation lock, so
    /// concurrent `update`/`set` calls on clones of this store are applied
    /// one after another.
    ///
    /// # Errors
    ///
    /// Returns the closure's error unchanged, or a `StoreError` (converted
    /// into `E`) if the write fails.
    pub fn update<T, R, E, F>(&self, key: &str, f: F) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned + Default,
        E: From<StoreError>,
        F: FnOnce(&mut T) -> Result<Mutation<R>, E>,
    {
        let _guard = self.lock();
        let mut value: T = self.get_or_default(key);
        match f(&mut value)? {
            Mutation::Changed(result) => {
                self.write_locked(key, &value)?;
                Ok(result)
            }
            Mutation::Unchanged(result) => Ok(result),
        }
    }

    /// Subscribe to change notifications.
    ///
    /// Only writes made through this `LocalStore` (or its clones) are
    /// reported; writes by other processes to a shared file are not.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.changes.subscribe()
    }

    fn write_locked<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.inner.backend.set_item(key, &raw)?;
        self.publish(key);
        Ok(())
    }

    fn publish(&self, key: &str) {
        // No receivers is fine: nobody is watching yet.
        let _ = self.inner.changes.send(StoreChange {
            key: key.to_owned(),
        });
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_returns_default() {
        let store = LocalStore::in_memory();
        let value: Vec<String> = store.get("nothing", vec!["x".to_owned()]);
        assert_eq!(value, vec!["x".to_owned()]);
    }

    #[test]
    fn test_set_then_get() {
        let store = LocalStore::in_memory();
        store.set("numbers", &vec![1, 2, 3]).unwrap();
        let value: Vec<i32> = store.get_or_default("numbers");
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_malformed_json_returns_default() {
        let backend = MemoryStore::new();
        backend.set_item("numbers", "{not json").unwrap();
        let store = LocalStore::new(backend);
        let value: Vec<i32> = store.get_or_default("numbers");
        assert!(value.is_empty());
    }

    #[test]
    fn test_wrong_shape_returns_default() {
        let backend = MemoryStore::new();
        backend.set_item("numbers", "{\"a\": 1}").unwrap();
        let store = LocalStore::new(backend);
        let value: Vec<i32> = store.get("numbers", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_update_writes_changed_value() {
        let store = LocalStore::in_memory();
        let len: usize = store
            .update("numbers", |v: &mut Vec<i32>| {
                v.push(4);
                Ok::<_, StoreError>(Mutation::Changed(v.len()))
            })
            .unwrap();
        assert_eq!(len, 1);
        assert_eq!(store.get_or_default::<Vec<i32>>("numbers"), vec![4]);
    }

    #[test]
    fn test_update_unchanged_skips_write_and_notification() {
        let store = LocalStore::in_memory();
        let mut rx = store.subscribe();
        store
            .update("numbers", |_: &mut Vec<i32>| {
                Ok::<_, StoreError>(Mutation::Unchanged(()))
            })
            .unwrap();
        assert!(rx.try_recv().is_err());
        assert!(store.inner.backend.get_item("numbers").unwrap().is_none());
    }

    #[test]
    fn test_update_error_leaves_value_untouched() {
        let store = LocalStore::in_memory();
        store.set("numbers", &vec![1]).unwrap();
        let result: Result<(), StoreError> = store.update("numbers", |v: &mut Vec<i32>| {
            v.clear();
            Err(StoreError::Corrupt("rejected".to_owned()))
        });
        assert!(result.is_err());
        assert_eq!(store.get_or_default::<Vec<i32>>("numbers"), vec![1]);
    }

    #[test]
    fn test_writes_publish_changes() {
        let store = LocalStore::in_memory();
        let mut rx = store.subscribe();
        store.set(keys::USERS, &Vec::<i32>::new()).unwrap();
        store.remove(keys::USERS).unwrap();
        assert_eq!(rx.try_recv().unwrap().key, keys::USERS);
        assert_eq!(rx.try_recv().unwrap().key, keys::USERS);
    }

    #[test]
    fn test_text_values_are_stored_verbatim() {
        let store = LocalStore::in_memory();
        let mut rx = store.subscribe();
        store.set_text(keys::EDITOR, "<p>hi</p>").unwrap();
        assert_eq!(rx.try_recv().unwrap().key, keys::EDITOR);
        assert_eq!(
            store.inner.backend.get_item(keys::EDITOR).unwrap().as_deref(),
            Some("<p>hi</p>")
        );
        assert_eq!(store.get_text(keys::EDITOR).as_deref(), Some("<p>hi</p>"));
        assert_eq!(store.get_text("missing"), None);
    }

    #[test]
    fn test_clones_share_backend() {
        let store = LocalStore::in_memory();
        let clone = store.clone();
        clone.set("k", "v").unwrap();
        assert_eq!(store.get("k", String::new()), "v");
    }
}
