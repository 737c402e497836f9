//! Newtype IDs for type-safe record references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different collections.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `generate()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// Stored records may carry IDs that were never generated here (for example
/// `"1"` or `"google_123"` from the mock sign-in flows), so any text is
/// accepted. Fresh IDs are UUID v4 strings.
///
/// # Example
///
/// ```rust
/// # use userdash_core::define_id;
/// define_id!(UserId);
/// define_id!(ContentId);
///
/// let user_id = UserId::generate();
/// let content_id = ContentId::new("c-1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = content_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from existing text.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random (UUID v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Standard record IDs
define_id!(UserId);
define_id!(ContentId);

impl UserId {
    /// Author ID used for content saved without a signed-in session.
    pub const ANONYMOUS: &'static str = "anonymous";

    /// The ID recorded on content written by nobody in particular.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(Self::ANONYMOUS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_accepts_foreign_ids() {
        let id = UserId::new("google_123");
        assert_eq!(id.to_string(), "google_123");
        assert_eq!(String::from(id), "google_123");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ContentId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let parsed: ContentId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_anonymous() {
        assert_eq!(UserId::anonymous().as_str(), "anonymous");
    }
}
