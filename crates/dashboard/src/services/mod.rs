//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `auth` - Mock sign-in, sign-up and session persistence

pub mod auth;
