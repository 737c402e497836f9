//! Timer-driven refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::{Gate, SyncHandle};

/// Handle returned by [`PollSync::start`].
pub type PollHandle = SyncHandle;

/// Re-reads a data source on a fixed interval.
pub struct PollSync;

impl PollSync {
    /// Start polling `read` every `interval`.
    ///
    /// The first read runs before this returns and seeds the receiver; the
    /// next one happens one full interval later. The controller runs on its
    /// own task until the handle is stopped or dropped, or every receiver
    /// is gone.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero or if called outside a Tokio runtime.
    pub fn start<T, F>(interval: Duration, read: F) -> (PollHandle, watch::Receiver<T>)
    where
        T: Send + Sync + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        Self::start_named("poll", interval, read)
    }

    /// [`PollSync::start`] with a label for logs.
    ///
    /// # Panics
    ///
    /// Same as [`PollSync::start`].
    pub fn start_named<T, F>(
        name: &'static str,
        interval: Duration,
        mut read: F,
    ) -> (PollHandle, watch::Receiver<T>)
    where
        T: Send + Sync + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        let gate = Arc::new(Gate::default());
        let (tx, rx) = watch::channel(read());
        gate.count_read();

        let task_gate = Arc::clone(&gate);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(value) = task_gate.read(&mut read) else {
                    break;
                };
                debug!(controller = name, "Poll tick");
                if tx.send(value).is_err() {
                    debug!(controller = name, "No receivers left, polling ends");
                    break;
                }
            }
        });

        debug!(
            controller = name,
            interval_ms = interval.as_millis(),
            "Started poll controller"
        );
        (SyncHandle::new(name, gate, task), rx)
    }
}
