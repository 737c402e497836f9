//! Command implementations.
//!
//! Each command prints its result on stdout; logs go to stderr.

pub mod activity;
pub mod auth;
pub mod content;
pub mod editor;
pub mod users;
pub mod watch;

use userdash_dashboard::Notice;

/// Print a toast-style notice.
#[allow(clippy::print_stdout)]
pub fn print_notice(notice: &Notice) {
    println!("{notice}");
}
