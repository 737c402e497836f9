//! Authentication service.
//!
//! A stand-in for a real identity provider. Any non-blank email and
//! password sign in; no password is ever checked or stored. The session
//! lives in memory and is mirrored to the store under `auth` so a later
//! start can restore it.
//!
//! ```text
//! LoggedOut --login/sign_up--> LoggedIn --logout--> LoggedOut
//! ```

mod error;

pub use error::AuthError;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use userdash_core::{Email, Timestamp, UserId};

use crate::models::session::{AuthEnvelope, DEFAULT_AVATAR, GOOGLE_AVATAR, Session};
use crate::store::{LocalStore, keys};

/// Accounts offered by the Google account picker.
pub const GOOGLE_ACCOUNTS: [&str; 3] = [
    "user.work@gmail.com",
    "user.personal@gmail.com",
    "user.business@gmail.com",
];

/// Identity used by the one-click Google sign-up.
const GOOGLE_SIGN_UP_EMAIL: &str = "google.user@example.com";
const GOOGLE_SIGN_UP_ID: &str = "google_123";

/// Fixed ID of every email/password login.
const PASSWORD_LOGIN_ID: &str = "1";

/// Authentication service.
///
/// Holds the in-memory session; the persisted envelope is its backup.
#[derive(Debug)]
pub struct AuthService {
    store: LocalStore,
    session: Mutex<Option<Session>>,
    login_delay: Duration,
}

impl AuthService {
    /// Create a signed-out service. Call [`AuthService::restore`] to pick up
    /// a persisted session.
    #[must_use]
    pub const fn new(store: LocalStore, login_delay: Duration) -> Self {
        Self {
            store,
            session: Mutex::new(None),
            login_delay,
        }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Login with email and password.
    ///
    /// Waits out the mock round-trip first. The session's name is the email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::Store` if the session cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        self.mock_round_trip().await;

        let email = require(email)?;
        require(password.expose_secret())?;

        let session = Session {
            id: UserId::new(PASSWORD_LOGIN_ID),
            name: email.to_owned(),
            email: email.to_owned(),
            photo_url: DEFAULT_AVATAR.to_owned(),
        };
        self.begin(session)
    }

    /// Register and sign in.
    ///
    /// `name` is required on the form but the session is keyed on the email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if any field is blank.
    /// Returns `AuthError::Store` if the session cannot be persisted.
    #[instrument(skip(self, name, password))]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, AuthError> {
        self.mock_round_trip().await;

        require(name)?;
        let email = require(email)?;
        require(password.expose_secret())?;

        let session = Session {
            id: UserId::new(Timestamp::now().timestamp_millis().to_string()),
            name: email.to_owned(),
            email: email.to_owned(),
            photo_url: DEFAULT_AVATAR.to_owned(),
        };
        self.begin(session)
    }

    // =========================================================================
    // Google Authentication
    // =========================================================================

    /// Sign in with an account chosen in the Google picker.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if the display name is blank.
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::Store` if the session cannot be persisted.
    #[instrument(skip(self))]
    pub async fn login_with_google(
        &self,
        email: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        self.mock_round_trip().await;

        let email = Email::parse(email)?;
        let display_name = require(display_name)?;

        let session = Session {
            id: UserId::new(format!("google_{}", Timestamp::now().timestamp_millis())),
            name: display_name.to_owned(),
            email: email.into_inner(),
            photo_url: GOOGLE_AVATAR.to_owned(),
        };
        self.begin(session)
    }

    /// One-click Google sign-up with the canned identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the session cannot be persisted.
    #[instrument(skip(self))]
    pub async fn sign_up_with_google(&self) -> Result<Session, AuthError> {
        self.mock_round_trip().await;

        let session = Session {
            id: UserId::new(GOOGLE_SIGN_UP_ID),
            name: GOOGLE_SIGN_UP_EMAIL.to_owned(),
            email: GOOGLE_SIGN_UP_EMAIL.to_owned(),
            photo_url: GOOGLE_AVATAR.to_owned(),
        };
        self.begin(session)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Load the persisted session into memory.
    ///
    /// A missing or malformed envelope leaves the service signed out.
    pub fn restore(&self) -> Option<Session> {
        let envelope: Option<AuthEnvelope> = self.store.get(keys::AUTH, None);
        let session = envelope.map(|e| e.user);
        if let Some(session) = &session {
            info!(user_id = %session.id, "Restored session");
        }
        *self.lock() = session.clone();
        session
    }

    /// Sign out and forget the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the envelope cannot be removed. The
    /// in-memory session is cleared regardless.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        let previous = self.lock().take();
        self.store.remove(keys::AUTH)?;
        if let Some(session) = previous {
            info!(user_id = %session.id, "Logged out");
        }
        Ok(())
    }

    /// The in-memory session, if signed in.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// Whether a session exists in memory or in the store.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        if self.lock().is_some() {
            return true;
        }
        self.store
            .get::<Option<AuthEnvelope>>(keys::AUTH, None)
            .is_some()
    }

    fn begin(&self, session: Session) -> Result<Session, AuthError> {
        self.store.set(
            keys::AUTH,
            &AuthEnvelope {
                user: session.clone(),
            },
        )?;
        *self.lock() = Some(session.clone());
        info!(user_id = %session.id, "Signed in");
        Ok(session)
    }

    async fn mock_round_trip(&self) {
        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Trimmed value of a required field.
fn require(value: &str) -> Result<&str, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AuthError::MissingCredentials)
    } else {
        Ok(value)
    }
}
