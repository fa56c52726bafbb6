//! Strongly-typed values produced by the caster

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use indexmap::IndexMap;

use super::ids::{ObjectId, UtcDateTime};
use super::raw::RawValue;
use crate::record::RecordView;

/// The in-memory counterpart of a `RawValue` after casting.
///
/// Untyped passthrough fields lift their raw value into the closest
/// variant, so the stored-datetime and object-id variants only appear
/// for fields without a schema entry.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    ObjectId(ObjectId),
    StoredDateTime(UtcDateTime),
    DateTime(DateTime<FixedOffset>),
    Record(Box<RecordView>),
    /// Positional sequence
    List(Vec<TypedValue>),
    /// Key-indexed sequence; keys are never renumbered
    Keyed(IndexMap<String, TypedValue>),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            TypedValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordView> {
        match self {
            TypedValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_keyed(&self) -> Option<&IndexMap<String, TypedValue>> {
        match self {
            TypedValue::Keyed(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<RawValue> for TypedValue {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Null => TypedValue::Null,
            RawValue::Int(i) => TypedValue::Int(i),
            RawValue::Float(f) => TypedValue::Float(f),
            RawValue::Bool(b) => TypedValue::Bool(b),
            RawValue::String(s) => TypedValue::String(s),
            RawValue::ObjectId(id) => TypedValue::ObjectId(id),
            RawValue::UtcDateTime(w) => TypedValue::StoredDateTime(w),
            RawValue::DateTime(dt) => TypedValue::DateTime(dt),
            RawValue::NaiveDateTime(naive) => TypedValue::DateTime(Utc.from_utc_datetime(&naive).into()),
            RawValue::Record(record) => TypedValue::Record(record),
            RawValue::List(items) => TypedValue::List(items.into_iter().map(Into::into).collect()),
            RawValue::Map(entries) => TypedValue::Keyed(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Int(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Bool(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(value: DateTime<Utc>) -> Self {
        TypedValue::DateTime(value.into())
    }
}
