//! Live stats view.
//!
//! Stands in for the dashboard's stats cards: prints a line every time the
//! refresher publishes a new snapshot.

use userdash_dashboard::AppState;
use userdash_dashboard::models::UserStats;

/// Print stats on every refresh until `ticks` refreshes have been seen or
/// Ctrl-C is pressed.
///
/// With `live`, refreshes follow writes made through this process;
/// otherwise they follow the poll timer, which also sees other processes.
pub async fn run(state: &AppState, ticks: Option<u64>, live: bool) {
    let (handle, mut rx) = if live {
        state.live_stats()
    } else {
        state.poll_stats()
    };
    tracing::info!(
        controller = handle.name(),
        interval_ms = state.config().poll_interval.as_millis(),
        "Watching stats, Ctrl-C to stop"
    );

    print_stats(&rx.borrow_and_update());
    let mut seen = 0u64;
    while ticks.is_none_or(|limit| seen < limit) {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                seen += 1;
                print_stats(&rx.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop();
    tracing::info!(reads = handle.reads(), "Stopped watching");
}

#[allow(clippy::print_stdout)]
fn print_stats(stats: &UserStats) {
    println!(
        "{}  total={} active={} inactive={}",
        stats.last_updated,
        stats.total,
        stats.active,
        stats.inactive()
    );
}
