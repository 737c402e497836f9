//! Record collections stored as JSON arrays.
//!
//! Elements are decoded one at a time. An element that does not decode as
//! a record is skipped on read and logged, but kept verbatim in place, so
//! writing the collection back never drops data another client stored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

/// A JSON array of `T` that tolerates unreadable elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    slots: Vec<Slot<T>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Slot<T> {
    Record(T),
    Unreadable(Value),
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Collection<T> {
    /// Readable records in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Record(record) => Some(record),
            Slot::Unreadable(_) => None,
        })
    }

    /// Readable records in stored order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| match slot {
            Slot::Record(record) => Some(record),
            Slot::Unreadable(_) => None,
        })
    }

    /// Append a record.
    pub fn push(&mut self, record: T) {
        self.slots.push(Slot::Record(record));
    }

    /// Keep the records matching `keep`. Unreadable elements always stay.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.slots.retain(|slot| match slot {
            Slot::Record(record) => keep(record),
            Slot::Unreadable(_) => true,
        });
    }

    /// Number of readable records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements skipped because they did not decode.
    #[must_use]
    pub fn unreadable(&self) -> usize {
        self.slots.len() - self.len()
    }

    /// The readable records, dropping the rest.
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        self.slots
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Record(record) => Some(record),
                Slot::Unreadable(_) => None,
            })
            .collect()
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Slot::Record).collect(),
        }
    }
}

impl<T: Serialize> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::Unreadable(value) => value.serialize(serializer),
        }
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.slots)
    }
}

/// Anything but an array is an error; bad elements inside an array are not.
impl<'de, T: DeserializeOwned> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Value>::deserialize(deserializer)?;
        let slots = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match T::deserialize(&value) {
                Ok(record) => Slot::Record(record),
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable record");
                    Slot::Unreadable(value)
                }
            })
            .collect();
        Ok(Self { slots })
    }
}
