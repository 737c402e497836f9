//! Application state shared across views.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::activity::{self, MonthlyPoint};
use crate::config::DashboardConfig;
use crate::db::{ContentRepository, EditorBuffer, UserRepository};
use crate::models::{ContentEntry, User, UserStats};
use crate::services::auth::AuthService;
use crate::store::{FileStore, LocalStore, keys};
use crate::sync::{LiveSync, PollHandle, PollSync, SyncHandle};

/// Application state shared across all views.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// store, the repositories over it and the signed-in session.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: DashboardConfig,
    store: LocalStore,
    auth: AuthService,
}

impl AppState {
    /// Open the file-backed store named by `config` and restore any
    /// persisted session.
    #[must_use]
    pub fn open(config: DashboardConfig) -> Self {
        let store = LocalStore::new(FileStore::new(&config.store_path));
        info!(path = %config.store_path.display(), "Opened local store");
        Self::with_store(config, store)
    }

    /// Build state over an existing store and restore any persisted session.
    #[must_use]
    pub fn with_store(config: DashboardConfig, store: LocalStore) -> Self {
        let auth = AuthService::new(store.clone(), config.login_delay);
        auth.restore();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the local store.
    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.inner.store
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.inner.store)
    }

    #[must_use]
    pub fn content(&self) -> ContentRepository<'_> {
        ContentRepository::new(&self.inner.store)
    }

    #[must_use]
    pub fn editor(&self) -> EditorBuffer<'_> {
        EditorBuffer::new(&self.inner.store)
    }

    // =========================================================================
    // View refreshers
    // =========================================================================

    /// Stats cards, re-read every poll interval.
    #[must_use]
    pub fn poll_stats(&self) -> (PollHandle, watch::Receiver<UserStats>) {
        let store = self.inner.store.clone();
        PollSync::start_named("stats", self.inner.config.poll_interval, move || {
            UserRepository::new(&store).stats()
        })
    }

    /// User table, re-read every poll interval.
    #[must_use]
    pub fn poll_users(&self) -> (PollHandle, watch::Receiver<Vec<User>>) {
        let store = self.inner.store.clone();
        PollSync::start_named("users", self.inner.config.poll_interval, move || {
            UserRepository::new(&store).list()
        })
    }

    /// Activity chart, regenerated every activity interval.
    #[must_use]
    pub fn poll_activity(&self) -> (PollHandle, watch::Receiver<Vec<MonthlyPoint>>) {
        PollSync::start_named("activity", self.inner.config.activity_interval, || {
            activity::monthly(chrono::Utc::now(), &mut rand::rng())
        })
    }

    /// Stats cards, refreshed on every write to the user collection.
    #[must_use]
    pub fn live_stats(&self) -> (SyncHandle, watch::Receiver<UserStats>) {
        let store = self.inner.store.clone();
        LiveSync::start("stats", &self.inner.store, &[keys::USERS], move || {
            UserRepository::new(&store).stats()
        })
    }

    /// Content list, refreshed on every write to the content collection.
    #[must_use]
    pub fn live_content(&self) -> (SyncHandle, watch::Receiver<Vec<ContentEntry>>) {
        let store = self.inner.store.clone();
        LiveSync::start("content", &self.inner.store, &[keys::CONTENT], move || {
            ContentRepository::new(&store).list()
        })
    }
}
