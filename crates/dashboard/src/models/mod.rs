//! Domain models for the dashboard.
//!
//! These are the record shapes persisted in the local store plus the typed
//! inputs (`NewUser`, `UserPatch`) that are validated before they touch a
//! stored record.

pub mod content;
pub mod session;
pub mod user;
pub mod validation;

mod serde_helpers;

pub use content::ContentEntry;
pub use session::{AuthEnvelope, Session};
pub use user::{NewUser, User, UserPatch, UserStats};
pub use validation::{FieldError, ValidationErrors};
