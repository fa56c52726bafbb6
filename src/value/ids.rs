//! Opaque value types owned by the document store
//!
//! The conversion layer only recognizes these by type. It never looks
//! inside an `ObjectId`, and only reads the millisecond count of a
//! `UtcDateTime`.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Opaque document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse the canonical string form
    pub fn parse_str(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

/// Canonical stored datetime: milliseconds since the Unix epoch, UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtcDateTime(i64);

impl UtcDateTime {
    /// Wrap a millisecond count
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Capture a date-time, truncating to millisecond precision
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Milliseconds since the epoch
    pub fn millis(&self) -> i64 {
        self.0
    }

    /// The UTC date-time this wrapper denotes, `None` when out of range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_string_round_trip() {
        let id = ObjectId::new();
        let parsed = ObjectId::parse_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(ObjectId::parse_str("not-an-id").is_none());
    }

    #[test]
    fn test_utc_datetime_truncates_to_millis() {
        let dt = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let wrapped = UtcDateTime::from_datetime(&dt);
        assert_eq!(wrapped.millis(), 1_700_000_000_123);
        assert_eq!(
            wrapped.to_datetime().unwrap(),
            Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap()
        );
    }

    #[test]
    fn test_utc_datetime_out_of_range() {
        assert!(UtcDateTime::from_millis(i64::MAX).to_datetime().is_none());
    }
}
