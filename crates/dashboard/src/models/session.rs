//! Session-related types.
//!
//! Types held by the auth stub for the signed-in identity.

use serde::{Deserialize, Serialize};

use userdash_core::UserId;

/// Avatar used for email/password sign-ins.
pub const DEFAULT_AVATAR: &str = "https://bit.ly/default-avatar";

/// Avatar used for Google-style sign-ins.
pub const GOOGLE_AVATAR: &str = "https://bit.ly/google-avatar";

/// The signed-in identity.
///
/// Minimal data needed to greet the user and attribute content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identity ID (`"1"`, `google_<millis>`, ...).
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email as entered at sign-in.
    pub email: String,
    /// Avatar URL.
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

/// Persisted form of the session, stored under `auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEnvelope {
    pub user: Session,
}
