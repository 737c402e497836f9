//! Keeping views fresh.
//!
//! Each view owns a controller that re-reads the store and publishes the
//! result on a `watch` channel:
//!
//! - [`PollSync`] re-reads on a fixed timer, like the dashboard's
//!   5 second refresh.
//! - [`LiveSync`] re-reads when the store reports a write to a key the view
//!   cares about.
//!
//! Both hand back a [`SyncHandle`]. Reads and [`SyncHandle::stop`] take the
//! same gate, so once `stop` returns the read function is never called
//! again, even if a timer tick or change notice is already in flight.

mod live;
mod poll;

pub use live::LiveSync;
pub use poll::{PollHandle, PollSync};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::debug;

/// Stop flag plus read counter shared by a controller task and its handle.
#[derive(Debug, Default)]
struct Gate {
    stopped: Mutex<bool>,
    reads: AtomicU64,
}

impl Gate {
    /// Run `read` unless the gate is closed. Holds the gate while reading.
    fn read<T>(&self, read: impl FnOnce() -> T) -> Option<T> {
        let stopped = self.lock();
        if *stopped {
            return None;
        }
        let value = read();
        self.count_read();
        Some(value)
    }

    fn count_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Close the gate. Waits for a read in progress to finish.
    fn close(&self) -> bool {
        let mut stopped = self.lock();
        !std::mem::replace(&mut *stopped, true)
    }

    fn is_closed(&self) -> bool {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owner of a running sync controller.
///
/// Dropping the handle stops the controller.
#[derive(Debug)]
pub struct SyncHandle {
    name: &'static str,
    gate: Arc<Gate>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    fn new(name: &'static str, gate: Arc<Gate>, task: JoinHandle<()>) -> Self {
        Self { name, gate, task }
    }

    /// Stop the controller.
    ///
    /// After this returns no further reads are issued. Calling it again is
    /// a no-op.
    pub fn stop(&self) {
        if self.gate.close() {
            debug!(controller = self.name, "Stopped sync controller");
        }
        self.task.abort();
    }

    /// Whether [`SyncHandle::stop`] has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.gate.is_closed()
    }

    /// Number of reads issued so far, including the initial one.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.gate.reads.load(Ordering::Relaxed)
    }

    /// Controller label used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_blocks_reads_after_close() {
        let gate = Gate::default();
        assert_eq!(gate.read(|| 1), Some(1));
        assert!(gate.close());
        assert!(!gate.close());
        assert_eq!(gate.read(|| 2), None);
        assert_eq!(gate.reads.load(Ordering::Relaxed), 1);
    }
}
