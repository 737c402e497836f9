//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Something other than digits and separators was present.
    #[error("phone number may only contain digits, spaces, dashes and parentheses")]
    InvalidCharacter,
    /// Wrong number of digits once separators are stripped.
    #[error("phone number must have exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digits found.
        actual: usize,
    },
}

/// A ten-digit phone number, stored without separators.
///
/// ```
/// use userdash_core::Phone;
///
/// let phone = Phone::parse("(555) 123-4567").unwrap();
/// assert_eq!(phone.as_str(), "5551234567");
/// assert!(Phone::parse("555-1234").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in a normalized phone number.
    pub const DIGITS: usize = 10;

    /// Parse and normalize a phone number.
    ///
    /// Spaces, dashes and parentheses are stripped; what remains must be
    /// exactly ten ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError::InvalidCharacter` for letters or other symbols and
    /// `PhoneError::WrongLength` if the digit count is not ten.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let mut digits = String::with_capacity(Self::DIGITS);
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '-' | '(' | ')' => {}
                c if c.is_whitespace() => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::DIGITS,
                actual: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Parse an optional form value: blank input means "no phone".
    ///
    /// # Errors
    ///
    /// Same as [`Phone::parse`] for non-blank input.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, PhoneError> {
        if s.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(s).map(Some)
        }
    }

    /// The ten digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format as `(555) 123-4567` for display.
    #[must_use]
    pub fn formatted(&self) -> String {
        // Stored values are trusted on load, so guard against odd lengths.
        match (self.0.get(..3), self.0.get(3..6), self.0.get(6..)) {
            (Some(area), Some(prefix), Some(line)) if self.0.len() == Self::DIGITS => {
                format!("({area}) {prefix}-{line}")
            }
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        assert_eq!(Phone::parse("5551234567").unwrap().as_str(), "5551234567");
    }

    #[test]
    fn test_parse_strips_separators() {
        assert_eq!(
            Phone::parse("(555) 123-4567").unwrap().as_str(),
            "5551234567"
        );
        assert_eq!(Phone::parse("555 123 4567").unwrap().as_str(), "5551234567");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            Phone::parse("555-1234"),
            Err(PhoneError::WrongLength {
                expected: 10,
                actual: 7
            })
        );
    }

    #[test]
    fn test_parse_rejects_letters_and_plus() {
        assert_eq!(
            Phone::parse("555-CALL-NOW"),
            Err(PhoneError::InvalidCharacter)
        );
        assert_eq!(
            Phone::parse("+15551234567"),
            Err(PhoneError::InvalidCharacter)
        );
    }

    #[test]
    fn test_parse_optional_blank() {
        assert_eq!(Phone::parse_optional("  ").unwrap(), None);
        assert!(Phone::parse_optional("5551234567").unwrap().is_some());
    }

    #[test]
    fn test_formatted() {
        let phone = Phone::parse("5551234567").unwrap();
        assert_eq!(phone.formatted(), "(555) 123-4567");
    }
}
