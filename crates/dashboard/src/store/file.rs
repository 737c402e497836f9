//! File-backed store backend.
//!
//! All keys live in one JSON object (`{ "key": "raw value", ... }`). The
//! file is re-read on every access so that several processes pointed at the
//! same path observe each other's writes, the way browser tabs share
//! `localStorage`.
//!
//! A write rewrites the whole object, so writers take an exclusive lock on
//! a sibling `<file>.lock` for the read-modify-write of the object. The new
//! object goes to a uniquely named temp file in the same directory, which
//! is then renamed over the store file. Readers never see a partial file
//! and never need the lock.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{KeyValueStore, StoreError};

/// Key-value store persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the file at `path`. The file and its parent directories are
    /// created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    /// Apply `edit` to the stored map while holding the writer lock. The
    /// file is rewritten only when `edit` returns `true`. An unreadable
    /// file is replaced rather than blocking every future write.
    fn modify(
        &self,
        edit: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StoreError> {
        fs::create_dir_all(self.dir())?;
        let _lock = self.lock()?;

        let mut map = match self.read_map() {
            Err(StoreError::Corrupt(reason)) => {
                tracing::warn!(%reason, "Discarding corrupt store file");
                BTreeMap::new()
            }
            other => other?,
        };
        if edit(&mut map) {
            self.write_map(&map)?;
        }
        Ok(())
    }

    /// Exclusive lock held until the returned file is dropped.
    fn lock(&self) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        file.lock()?;
        Ok(file)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        serde_json::to_writer_pretty(&mut tmp, map)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|map| {
            map.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|map| map.remove(key).is_some())
    }
}
