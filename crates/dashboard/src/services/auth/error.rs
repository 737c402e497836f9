//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field was left blank.
    #[error("missing credentials")]
    MissingCredentials,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] userdash_core::EmailError),

    /// Persisting or clearing the session failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
