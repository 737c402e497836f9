//! Legacy single-document scratch buffer under `editorContent`.
//!
//! Unlike the collections, the draft is stored as the bare markup string,
//! not as JSON.

use tracing::{debug, instrument};

use crate::models::content::{strip_tags, word_count};
use crate::store::{LocalStore, StoreError, keys};

/// The editor's autosaved draft.
pub struct EditorBuffer<'a> {
    store: &'a LocalStore,
}

impl<'a> EditorBuffer<'a> {
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// The saved markup, or an empty string.
    #[must_use]
    pub fn load(&self) -> String {
        self.store.get_text(keys::EDITOR).unwrap_or_default()
    }

    /// Overwrite the draft.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    #[instrument(skip(self, markup), fields(len = markup.len()))]
    pub fn save(&self, markup: &str) -> Result<(), StoreError> {
        self.store.set_text(keys::EDITOR, markup)?;
        debug!("Saved editor draft");
        Ok(())
    }

    /// Discard the draft.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::EDITOR)
    }

    /// The draft without markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        strip_tags(&self.load())
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        word_count(&self.load())
    }
}
