//! Millisecond-precision record timestamps.

use core::fmt;

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC instant with millisecond precision.
///
/// Serialized as an RFC 3339 string with exactly three fractional digits and
/// a `Z` suffix (`2024-05-01T12:00:00.000Z`), the format the stored
/// collections already use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant, truncated to milliseconds.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap an instant, truncating to milliseconds.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(3))
    }

    /// A timestamp strictly later than `previous`.
    ///
    /// Uses the current time when the clock has moved past `previous`;
    /// otherwise returns `previous` plus one millisecond so that successive
    /// mutations always produce increasing `updatedAt` values.
    #[must_use]
    pub fn after(previous: Self) -> Self {
        Self::next_from(previous, Self::now())
    }

    fn next_from(previous: Self, now: Self) -> Self {
        if now > previous {
            now
        } else {
            Self(previous.0 + Duration::milliseconds(1))
        }
    }

    /// The underlying `chrono` value.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self::from_datetime(dt.with_timezone(&Utc)))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_millis_and_z() {
        let ts: Timestamp = "2024-05-01T12:00:00.123456Z".parse().unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T12:00:00.123Z");
    }

    #[test]
    fn test_after_uses_clock_when_it_moved() {
        let prev: Timestamp = "2024-05-01T12:00:00.000Z".parse().unwrap();
        let now: Timestamp = "2024-05-01T12:00:05.000Z".parse().unwrap();
        assert_eq!(Timestamp::next_from(prev, now), now);
    }

    #[test]
    fn test_after_bumps_when_clock_stalled() {
        let prev: Timestamp = "2024-05-01T12:00:00.000Z".parse().unwrap();
        let next = Timestamp::next_from(prev, prev);
        assert_eq!(next.to_string(), "2024-05-01T12:00:00.001Z");
    }

    #[test]
    fn test_after_is_strictly_greater_even_if_clock_went_back() {
        let prev: Timestamp = "2099-01-01T00:00:00.000Z".parse().unwrap();
        assert!(Timestamp::after(prev) > prev);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts: Timestamp = "2024-05-01T12:00:00.000Z".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-05-01T12:00:00.000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
    }
}
