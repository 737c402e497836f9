//! userdash core - shared domain types.
//!
//! This crate provides the value types used across all userdash components:
//! - `dashboard` - Store adapter, repositories, sync controllers, session stub
//! - `cli` - Command-line frontend standing in for the dashboard views
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no timers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, phone numbers,
//!   statuses and timestamps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
