//! User domain types.

use serde::{Deserialize, Serialize};

use userdash_core::{Email, Phone, Timestamp, UserId, UserStatus};

use super::serde_helpers::{self, blank_as_none};
use super::validation::{ValidationErrors, Validator};

/// A managed user record, as stored under `allUsers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Ten-digit phone number, if given.
    #[serde(default, with = "serde_helpers::phone")]
    pub phone: Option<Phone>,
    /// Free-form postal address.
    #[serde(default)]
    pub address: String,
    /// When the user was created. Never changes afterwards.
    pub created_at: Timestamp,
    /// When the user was last modified.
    pub updated_at: Timestamp,
    /// Whether the account is active.
    pub is_active: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub role: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub department: Option<String>,
    /// Avatar URL.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub profile_image: Option<String>,
}

impl User {
    /// Typed view of `is_active`.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        UserStatus::from_active(self.is_active)
    }
}

/// Input for creating a user, as typed into the profile form.
///
/// Generated fields (`id`, timestamps) are not part of the input.
/// `is_active` defaults to `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: Option<bool>,
}

impl NewUser {
    /// Convenience constructor for the two required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Validate the input and build the record to store.
    ///
    /// # Errors
    ///
    /// Returns every failing field: missing name, missing or malformed email,
    /// phone that does not normalize to ten digits.
    pub fn into_user(self, id: UserId, now: Timestamp) -> Result<User, ValidationErrors> {
        let mut v = Validator::new();
        let name = v.name(&self.name);
        let email = v.email(&self.email);
        let phone = v.phone(&self.phone);

        let (Some(name), Some(email), Some(phone)) = (name, email, phone) else {
            return Err(v.into_errors());
        };

        Ok(User {
            id,
            name,
            email,
            phone,
            address: self.address.trim().to_owned(),
            created_at: now,
            updated_at: now,
            is_active: self.is_active.unwrap_or(true),
            role: non_blank(self.role),
            department: non_blank(self.department),
            profile_image: non_blank(self.profile_image),
        })
    }
}

/// Fields a caller may change on an existing user.
///
/// `None` leaves a field alone. For the optional text fields (`phone`,
/// `role`, `department`, `profile_image`), a blank string clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// A patch that only flips the active flag.
    #[must_use]
    pub fn status(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate the patch, then merge it into `user`.
    ///
    /// Nothing is written to `user` unless every field validates.
    /// Timestamps are left to the caller.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn apply(self, user: &mut User) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        let name = self.name.as_deref().map(|n| v.name(n));
        let email = self.email.as_deref().map(|e| v.email(e));
        let phone = self.phone.as_deref().map(|p| v.phone(p));
        v.finish()?;

        if let Some(Some(name)) = name {
            user.name = name;
        }
        if let Some(Some(email)) = email {
            user.email = email;
        }
        if let Some(Some(phone)) = phone {
            user.phone = phone;
        }
        if let Some(address) = self.address {
            user.address = address.trim().to_owned();
        }
        if let Some(role) = self.role {
            user.role = non_blank(Some(role));
        }
        if let Some(department) = self.department {
            user.department = non_blank(Some(department));
        }
        if let Some(profile_image) = self.profile_image {
            user.profile_image = non_blank(Some(profile_image));
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        Ok(())
    }
}

/// Aggregates shown on the stats cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Number of users in the collection.
    pub total: usize,
    /// Number of users with `is_active`.
    pub active: usize,
    /// When these numbers were computed (not derived from the records).
    pub last_updated: Timestamp,
}

impl UserStats {
    /// Compute stats over a snapshot of the collection.
    #[must_use]
    pub fn from_users(users: &[User], now: Timestamp) -> Self {
        Self {
            total: users.len(),
            active: users.iter().filter(|u| u.is_active).count(),
            last_updated: now,
        }
    }

    /// Number of inactive users.
    #[must_use]
    pub const fn inactive(&self) -> usize {
        self.total.saturating_sub(self.active)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
