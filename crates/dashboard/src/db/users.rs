//! User repository.
//!
//! CRUD and derived aggregates over the `allUsers` collection.

use tracing::{debug, info, instrument};

use userdash_core::{Timestamp, UserId, UserStatus};

use super::RepositoryError;
use crate::models::{NewUser, User, UserPatch, UserStats};
use crate::store::{Collection, LocalStore, Mutation, keys};

/// Repository for user records.
pub struct UserRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// All users in stored (insertion) order.
    ///
    /// A missing or malformed collection reads as empty. Records that do not
    /// decode are left out here but stay in the store across writes.
    #[must_use]
    pub fn list(&self) -> Vec<User> {
        self.store
            .get_or_default::<Collection<User>>(keys::USERS)
            .into_records()
    }

    /// Get a user by ID.
    #[must_use]
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.list().into_iter().find(|u| &u.id == id)
    }

    /// Create a user from form input.
    ///
    /// Assigns a fresh ID, sets `created_at = updated_at = now` and appends
    /// the record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid.
    /// Returns `RepositoryError::Store` if the write fails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub fn create(&self, input: NewUser) -> Result<User, RepositoryError> {
        let mut user = input.into_user(UserId::generate(), Timestamp::now())?;

        let user = self
            .store
            .update(keys::USERS, |users: &mut Collection<User>| {
                while users.iter().any(|u| u.id == user.id) {
                    user.id = UserId::generate();
                }
                users.push(user.clone());
                Ok::<_, RepositoryError>(Mutation::Changed(user))
            })?;

        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Merge `patch` into an existing user and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this ID.
    /// Returns `RepositoryError::Validation` if the patch is invalid.
    /// Returns `RepositoryError::Store` if the write fails.
    #[instrument(skip(self, patch), fields(user_id = %id))]
    pub fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        let user = self.store.update(keys::USERS, |users: &mut Collection<User>| {
            let user = users
                .iter_mut()
                .find(|u| &u.id == id)
                .ok_or(RepositoryError::NotFound)?;
            patch.apply(user)?;
            user.updated_at = Timestamp::after(user.updated_at);
            Ok::<_, RepositoryError>(Mutation::Changed(user.clone()))
        })?;

        info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    /// Activate or deactivate a user.
    ///
    /// # Errors
    ///
    /// Same as [`UserRepository::update`].
    pub fn set_active(&self, id: &UserId, is_active: bool) -> Result<User, RepositoryError> {
        self.update(id, UserPatch::status(is_active))
    }

    /// Remove a user.
    ///
    /// Removing an absent ID is not an error; the return value reports
    /// whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub fn remove(&self, id: &UserId) -> Result<bool, RepositoryError> {
        let removed = self.store.update(keys::USERS, |users: &mut Collection<User>| {
            let before = users.len();
            users.retain(|u| &u.id != id);
            if users.len() == before {
                Ok::<_, RepositoryError>(Mutation::Unchanged(false))
            } else {
                Ok(Mutation::Changed(true))
            }
        })?;

        if removed {
            info!("Removed user");
        } else {
            debug!("Remove skipped, user not present");
        }
        Ok(removed)
    }

    /// Total and active counts, stamped with the time of computation.
    #[must_use]
    pub fn stats(&self) -> UserStats {
        UserStats::from_users(&self.list(), Timestamp::now())
    }

    /// Users whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<User> {
        let query = query.trim().to_lowercase();
        self.list()
            .into_iter()
            .filter(|u| u.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Users with the given status, in stored order.
    #[must_use]
    pub fn with_status(&self, status: UserStatus) -> Vec<User> {
        self.list()
            .into_iter()
            .filter(|u| u.status() == status)
            .collect()
    }

    /// Split the collection into `(active, inactive)`.
    #[must_use]
    pub fn partition_by_status(&self) -> (Vec<User>, Vec<User>) {
        self.list().into_iter().partition(|u| u.is_active)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn input(name: &str, active: bool) -> NewUser {
        NewUser {
            is_active: Some(active),
            ..NewUser::new(name, format!("{}@example.com", name.to_lowercase()))
        }
    }

    #[test]
    fn test_create_then_list_roundtrip() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        let created = repo
            .create(NewUser {
                phone: "555-123-4567".to_owned(),
                address: "1 Main St".to_owned(),
                ..NewUser::new("Ada", "ada@example.com")
            })
            .unwrap();

        let users = repo.list();
        assert_eq!(users, vec![created.clone()]);
        assert_eq!(created.name, "Ada");
        assert_eq!(created.email.as_str(), "ada@example.com");
        assert_eq!(created.address, "1 Main St");
        assert!(created.is_active);
    }

    #[test]
    fn test_create_rejects_invalid_input_without_writing() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        let err = repo.create(NewUser::new("", "nope")).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_update_bumps_updated_at_past_created_at() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        let user = repo.create(input("Ada", true)).unwrap();
        let updated = repo
            .update(
                &user.id,
                UserPatch {
                    address: Some("2 Side St".to_owned()),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert!(updated.updated_at > updated.created_at);
        assert_eq!(updated.created_at, user.created_at);
        assert_eq!(repo.get(&user.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        let err = repo
            .update(&UserId::new("ghost"), UserPatch::status(false))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn test_sequential_disjoint_patches_both_apply() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        let user = repo.create(input("Ada", true)).unwrap();
        repo.update(
            &user.id,
            UserPatch {
                role: Some("admin".to_owned()),
                ..UserPatch::default()
            },
        )
        .unwrap();
        let second = repo
            .update(
                &user.id,
                UserPatch {
                    department: Some("Research".to_owned()),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert_eq!(second.role.as_deref(), Some("admin"));
        assert_eq!(second.department.as_deref(), Some("Research"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        let keep = repo.create(input("Keep", true)).unwrap();
        let gone = repo.create(input("Gone", true)).unwrap();

        assert!(repo.remove(&gone.id).unwrap());
        let after_first = repo.list();
        assert!(!repo.remove(&gone.id).unwrap());
        assert_eq!(repo.list(), after_first);
        assert_eq!(after_first, vec![keep]);
    }

    #[test]
    fn test_stats_counts_active() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        repo.create(input("A", true)).unwrap();
        repo.create(input("B", false)).unwrap();
        let stats = repo.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
    }

    #[test]
    fn test_set_active_toggles_status() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        let user = repo.create(input("Ada", true)).unwrap();
        let user = repo.set_active(&user.id, false).unwrap();
        assert!(!user.is_active);
        assert_eq!(repo.stats().active, 0);
    }

    #[test]
    fn test_malformed_collection_lists_empty() {
        let store = LocalStore::new(MemoryStore::with_items([(keys::USERS, "{oops")]));
        let repo = UserRepository::new(&store);
        assert!(repo.list().is_empty());
        assert_eq!(repo.stats().total, 0);
    }

    #[test]
    fn test_unreadable_record_survives_writes() {
        let store = LocalStore::new(MemoryStore::with_items([(
            keys::USERS,
            r#"[
                {"id": "1", "name": "Ann", "email": "ann@example.com", "phone": "",
                 "address": "", "createdAt": "2024-01-01T00:00:00.000Z",
                 "updatedAt": "2024-01-01T00:00:00.000Z", "isActive": true},
                {"id": "2", "name": "Bob", "email": "bob@example.com"}
            ]"#,
        )]));
        let repo = UserRepository::new(&store);
        assert_eq!(repo.list().len(), 1);

        let cy = repo.create(input("Cy", true)).unwrap();
        repo.set_active(&UserId::new("1"), false).unwrap();
        repo.remove(&cy.id).unwrap();

        let names: Vec<_> = repo.list().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Ann"]);
        let raw: serde_json::Value =
            serde_json::from_str(&store.get_text(keys::USERS).unwrap()).unwrap();
        assert_eq!(raw[1]["name"], "Bob");
        assert_eq!(raw.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        repo.create(input("Ada", true)).unwrap();
        repo.create(input("Grace", true)).unwrap();
        let found = repo.search("aDa");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ada");
        assert_eq!(repo.search("").len(), 2);
    }

    #[test]
    fn test_partition_by_status() {
        let store = LocalStore::in_memory();
        let repo = UserRepository::new(&store);
        repo.create(input("A", true)).unwrap();
        repo.create(input("B", false)).unwrap();
        repo.create(input("C", true)).unwrap();
        let (active, inactive) = repo.partition_by_status();
        assert_eq!(active.len(), 2);
        assert_eq!(inactive.len(), 1);
        assert_eq!(repo.with_status(UserStatus::Inactive)[0].name, "B");
    }
}
