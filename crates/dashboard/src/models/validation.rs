//! Form-level validation errors.

use thiserror::Error;

use userdash_core::{Email, EmailError, Phone};

/// A single failing field with the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as it appears on the form (`name`, `email`, `phone`).
    pub field: &'static str,
    /// User-facing message.
    pub message: &'static str,
}

/// Every failing field of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// All failing fields, in form order.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

/// Collects field errors while a form is checked.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub(crate) fn name(&mut self, name: &str) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            self.fail("name", "Name is required");
            None
        } else {
            Some(trimmed.to_owned())
        }
    }

    pub(crate) fn email(&mut self, email: &str) -> Option<Email> {
        match Email::parse(email) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => {
                self.fail("email", "Email is required");
                None
            }
            Err(_) => {
                self.fail("email", "Invalid email format");
                None
            }
        }
    }

    /// Blank input is a valid "no phone"; the outer `Option` is `None` only
    /// on failure.
    pub(crate) fn phone(&mut self, phone: &str) -> Option<Option<Phone>> {
        if let Ok(phone) = Phone::parse_optional(phone) {
            Some(phone)
        } else {
            self.fail("phone", "Invalid phone number format");
            None
        }
    }

    pub(crate) fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.errors)
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}
