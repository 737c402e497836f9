//! Serde adapters for the loosely-typed fields of stored records.
//!
//! The stored collections write absent optional text as `""`, so blank
//! strings are read back as `None`.

use serde::{Deserialize, Deserializer, Serializer};

use userdash_core::Phone;

/// Blank or missing strings become `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Phone numbers are stored as a plain string, `""` when absent.
pub mod phone {
    use super::{Deserialize, Deserializer, Phone, Serializer};

    #[allow(clippy::ref_option)] // signature fixed by serde's `with`
    pub fn serialize<S: Serializer>(phone: &Option<Phone>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(phone.as_ref().map_or("", Phone::as_str))
    }

    /// Values that do not normalize to ten digits are dropped rather than
    /// failing the whole collection.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Phone>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.and_then(|s| Phone::parse_optional(&s).ok().flatten()))
    }
}
