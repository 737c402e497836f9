//! Change-driven refresh.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{Gate, SyncHandle};
use crate::store::LocalStore;

/// Re-reads a data source whenever the store reports a write to one of
/// the watched keys.
///
/// Only writes made through the same [`LocalStore`] (or a clone) are seen.
/// Pair it with [`PollSync`](super::PollSync) to pick up writes from other
/// processes sharing a file store.
pub struct LiveSync;

impl LiveSync {
    /// Subscribe `read` to changes of `keys`.
    ///
    /// The first read runs before this returns. If the change channel
    /// overflows, one catch-up read is issued for the missed notices.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start<T, F>(
        name: &'static str,
        store: &LocalStore,
        keys: &'static [&'static str],
        mut read: F,
    ) -> (SyncHandle, watch::Receiver<T>)
    where
        T: Send + Sync + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        let mut changes = store.subscribe();
        let gate = Arc::new(Gate::default());
        let (tx, rx) = watch::channel(read());
        gate.count_read();

        let task_gate = Arc::clone(&gate);
        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) if keys.contains(&change.key.as_str()) => {
                        debug!(controller = name, key = %change.key, "Store changed");
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(missed)) => {
                        warn!(controller = name, missed, "Change notices dropped, refreshing");
                    }
                    Err(RecvError::Closed) => break,
                }
                let Some(value) = task_gate.read(&mut read) else {
                    break;
                };
                if tx.send(value).is_err() {
                    break;
                }
            }
        });

        debug!(controller = name, ?keys, "Started live controller");
        (SyncHandle::new(name, gate, task), rx)
    }
}
