//! userdash dashboard library.
//!
//! Everything behind the dashboard views: the typed local store, the user
//! and content repositories over it, the timers and change feeds that keep
//! views fresh, and the mock sign-in.
//!
//! # Modules
//!
//! - [`store`] - Typed JSON view over a string key-value store
//! - [`db`] - User, content and editor repositories
//! - [`sync`] - Poll and change-driven view refreshers
//! - [`services`] - Mock authentication
//! - [`activity`] - Synthesized activity chart series
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod activity;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;

pub use error::{AppError, Notice, Result};
pub use state::AppState;
