//! Unified error handling.
//!
//! Provides a unified `AppError` type for callers that drive several
//! services. No error is fatal: [`AppError::notice`] turns any of them into
//! the transient toast the dashboard shows, without leaking internals.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use userdash_core::NoticeLevel;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::store::StoreError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Direct store access failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, description)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.title, self.description)
    }
}

impl AppError {
    /// The toast shown for this error.
    ///
    /// Storage and configuration failures are logged in full but described
    /// generically.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Repository(RepositoryError::Validation(errors)) => {
                let description = errors
                    .fields()
                    .first()
                    .map_or("Please check the form for errors", |e| e.message);
                Notice::new(NoticeLevel::Warning, "Validation Error", description)
            }
            Self::Repository(RepositoryError::NotFound) => Notice::new(
                NoticeLevel::Warning,
                "Not Found",
                "That record no longer exists",
            ),
            Self::Repository(RepositoryError::Store(_)) | Self::Store(_) => {
                tracing::error!(error = %self, "Storage failure");
                Notice::new(
                    NoticeLevel::Error,
                    "Error",
                    "Failed to save changes. Please try again.",
                )
            }
            Self::Auth(err) => match err {
                AuthError::MissingCredentials => Notice::new(
                    NoticeLevel::Error,
                    "Login failed",
                    "Please check your credentials and try again.",
                ),
                AuthError::InvalidEmail(_) => {
                    Notice::new(NoticeLevel::Error, "Login failed", "Invalid email address")
                }
                AuthError::Store(_) => {
                    tracing::error!(error = %self, "Session storage failure");
                    Notice::new(
                        NoticeLevel::Error,
                        "Login failed",
                        "Please try again later.",
                    )
                }
            },
            Self::Config(_) => {
                tracing::error!(error = %self, "Configuration failure");
                Notice::new(
                    NoticeLevel::Error,
                    "Configuration Error",
                    "Check the USERDASH_* environment variables",
                )
            }
            Self::BadRequest(msg) => Notice::new(NoticeLevel::Warning, "Invalid input", msg.clone()),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use userdash_core::{Timestamp, UserId};

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_validation_notice_uses_first_message() {
        let errors = NewUser::new("", "ada@example.com")
            .into_user(UserId::generate(), Timestamp::now())
            .unwrap_err();
        let notice = AppError::from(RepositoryError::from(errors)).notice();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.title, "Validation Error");
        assert_eq!(notice.description, "Name is required");
    }

    #[test]
    fn test_storage_notice_hides_details() {
        let io = std::io::Error::other("disk on fire at /secret/path");
        let notice = AppError::from(StoreError::from(io)).notice();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(!notice.description.contains("/secret/path"));
    }

    #[test]
    fn test_auth_notice() {
        let notice = AppError::from(AuthError::MissingCredentials).notice();
        assert_eq!(notice.title, "Login failed");
    }
}
