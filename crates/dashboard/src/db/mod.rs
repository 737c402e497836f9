//! Repositories over the local store.
//!
//! # Collections
//!
//! Each repository mediates one key of the [`LocalStore`](crate::store::LocalStore):
//!
//! - `allUsers` - [`UserRepository`]
//! - `userContent` - [`ContentRepository`]
//! - `editorContent` - [`EditorBuffer`] (legacy scratch buffer)
//!
//! Every mutation is a whole-collection read-modify-write run under the
//! store's mutation lock. Reads never fail: a missing or malformed
//! collection reads as empty.

pub mod content;
pub mod editor;
pub mod users;

pub use content::ContentRepository;
pub use editor::EditorBuffer;
pub use users::UserRepository;

use thiserror::Error;

use crate::models::ValidationErrors;
use crate::store::StoreError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Writing to the store failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Input failed form validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,
}
