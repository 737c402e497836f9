//! Integration tests for userdash.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p userdash-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `user_lifecycle` - Repository behavior over a file-backed store
//! - `view_sync` - Poll and live refreshers against real writes
//! - `session` - Mock sign-in, persistence and content attribution
//!
//! Every test gets its own temporary store file through [`TestContext`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use userdash_dashboard::AppState;
use userdash_dashboard::config::DashboardConfig;
use userdash_dashboard::store::{FileStore, KeyValueStore, LocalStore, StoreError};

/// A dashboard over a store file in a fresh temporary directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// Create a context with a 5 second poll interval and no login delay.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let state = AppState::open(config_for(dir.path()));
        Ok(Self { dir, state })
    }

    /// Path of the store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("local-storage.json")
    }

    /// A second, independent dashboard over the same file, like another
    /// browser tab or process.
    #[must_use]
    pub fn open_another(&self) -> AppState {
        AppState::open(config_for(self.dir.path()))
    }

    /// A second dashboard sharing this one's in-process store handle.
    #[must_use]
    pub fn share_store(&self) -> AppState {
        AppState::with_store(config_for(self.dir.path()), self.state.store().clone())
    }

    /// Write a raw string under `key`, bypassing serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_raw(&self, key: &str, raw: &str) -> Result<(), StoreError> {
        FileStore::new(self.store_path()).set_item(key, raw)
    }

    /// Read the raw string under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        FileStore::new(self.store_path()).get_item(key)
    }
}

fn config_for(dir: &Path) -> DashboardConfig {
    DashboardConfig {
        store_path: dir.join("local-storage.json"),
        poll_interval: Duration::from_secs(5),
        activity_interval: Duration::from_secs(3600),
        login_delay: Duration::ZERO,
    }
}

/// An in-memory store, for tests that need no file.
#[must_use]
pub fn memory_state() -> AppState {
    AppState::with_store(
        config_for(Path::new(".")),
        LocalStore::in_memory(),
    )
}
