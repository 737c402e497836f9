//! Content repository.
//!
//! Rich-text entries under `userContent`. Entries carry their author's ID
//! and name but are not checked against the user collection.

use tracing::{debug, info, instrument};

use userdash_core::{ContentId, Timestamp, UserId};

use super::RepositoryError;
use crate::models::{ContentEntry, Session};
use crate::store::{Collection, LocalStore, Mutation, keys};

/// Author name recorded for entries written without a session.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Repository for content entries.
pub struct ContentRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> ContentRepository<'a> {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// All entries in stored order.
    #[must_use]
    pub fn list(&self) -> Vec<ContentEntry> {
        self.store
            .get_or_default::<Collection<ContentEntry>>(keys::CONTENT)
            .into_records()
    }

    /// Get an entry by ID.
    #[must_use]
    pub fn get(&self, id: &ContentId) -> Option<ContentEntry> {
        self.list().into_iter().find(|c| &c.id == id)
    }

    /// Entries written by `user_id`.
    #[must_use]
    pub fn for_user(&self, user_id: &UserId) -> Vec<ContentEntry> {
        self.list()
            .into_iter()
            .filter(|c| &c.user_id == user_id)
            .collect()
    }

    /// Append a new entry stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    #[instrument(skip(self, author_name, content), fields(author = %author_id))]
    pub fn create(
        &self,
        author_id: UserId,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<ContentEntry, RepositoryError> {
        let mut entry = ContentEntry {
            id: ContentId::generate(),
            user_id: author_id,
            user_name: author_name.into(),
            content: content.into(),
            last_edited: Timestamp::now(),
        };

        let entry = self
            .store
            .update(keys::CONTENT, |entries: &mut Collection<ContentEntry>| {
                while entries.iter().any(|c| c.id == entry.id) {
                    entry.id = ContentId::generate();
                }
                entries.push(entry.clone());
                Ok::<_, RepositoryError>(Mutation::Changed(entry))
            })?;

        info!(content_id = %entry.id, "Created content entry");
        Ok(entry)
    }

    /// Replace an entry's markup and bump `last_edited`.
    ///
    /// The author is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no entry has this ID.
    /// Returns `RepositoryError::Store` if the write fails.
    #[instrument(skip(self, content), fields(content_id = %id))]
    pub fn update(
        &self,
        id: &ContentId,
        content: impl Into<String>,
    ) -> Result<ContentEntry, RepositoryError> {
        let content = content.into();
        let entry = self
            .store
            .update(keys::CONTENT, |entries: &mut Collection<ContentEntry>| {
                let entry = entries
                    .iter_mut()
                    .find(|c| &c.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                entry.content = content;
                entry.last_edited = Timestamp::after(entry.last_edited);
                Ok::<_, RepositoryError>(Mutation::Changed(entry.clone()))
            })?;

        info!("Updated content entry");
        Ok(entry)
    }

    /// Remove an entry. Absent IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    #[instrument(skip(self), fields(content_id = %id))]
    pub fn remove(&self, id: &ContentId) -> Result<bool, RepositoryError> {
        let removed = self
            .store
            .update(keys::CONTENT, |entries: &mut Collection<ContentEntry>| {
                let before = entries.len();
                entries.retain(|c| &c.id != id);
                if entries.len() == before {
                    Ok::<_, RepositoryError>(Mutation::Unchanged(false))
                } else {
                    Ok(Mutation::Changed(true))
                }
            })?;

        if removed {
            info!("Removed content entry");
        } else {
            debug!("Remove skipped, entry not present");
        }
        Ok(removed)
    }

    /// The editor's save action.
    ///
    /// With `editing` set, updates that entry in place. Otherwise creates a
    /// new entry attributed to `author`, or to the anonymous author when
    /// nobody is signed in.
    ///
    /// # Errors
    ///
    /// Same as [`ContentRepository::update`] and [`ContentRepository::create`].
    pub fn save(
        &self,
        editing: Option<&ContentId>,
        author: Option<&Session>,
        content: impl Into<String>,
    ) -> Result<ContentEntry, RepositoryError> {
        match editing {
            Some(id) => self.update(id, content),
            None => {
                let (author_id, author_name) = author.map_or_else(
                    || (UserId::anonymous(), ANONYMOUS_NAME.to_owned()),
                    |s| (s.id.clone(), s.name.clone()),
                );
                self.create(author_id, author_name, content)
            }
        }
    }
}
