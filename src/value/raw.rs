//! Loosely-typed values as they arrive from storage or user input

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use indexmap::IndexMap;

use super::ids::{ObjectId, UtcDateTime};
use super::typed::TypedValue;
use crate::record::RecordView;

/// An untyped attribute value.
///
/// This is also what a record stores per field, so it can hold a
/// materialized nested record or a rich date-time once one has been
/// assigned through the attribute setters.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    /// Opaque identifier issued by the store
    ObjectId(ObjectId),
    /// Canonical stored datetime wrapper
    UtcDateTime(UtcDateTime),
    /// Rich date-time with an offset
    DateTime(DateTime<FixedOffset>),
    /// Wall-clock date-time without a zone, read as UTC
    NaiveDateTime(NaiveDateTime),
    /// Positional sequence
    List(Vec<RawValue>),
    /// String-keyed mapping, insertion ordered
    Map(IndexMap<String, RawValue>),
    /// A nested record assigned as a value
    Record(Box<RecordView>),
}

impl RawValue {
    /// Whether this is the explicit null value
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Returns the type name for log and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Bool(_) => "bool",
            RawValue::String(_) => "string",
            RawValue::ObjectId(_) => "objectid",
            RawValue::UtcDateTime(_) => "utcdatetime",
            RawValue::DateTime(_) => "datetime",
            RawValue::NaiveDateTime(_) => "naivedatetime",
            RawValue::List(_) => "list",
            RawValue::Map(_) => "map",
            RawValue::Record(_) => "record",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, RawValue>> {
        match self {
            RawValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short description used in date parse errors
    pub(crate) fn describe(&self) -> String {
        match self {
            RawValue::String(s) => format!("string \"{}\"", s),
            RawValue::Int(i) => format!("int {}", i),
            RawValue::Float(f) => format!("float {}", f),
            RawValue::UtcDateTime(w) => format!("utcdatetime {}", w),
            other => other.type_name().to_string(),
        }
    }
}

impl From<TypedValue> for RawValue {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Null => RawValue::Null,
            TypedValue::Int(i) => RawValue::Int(i),
            TypedValue::Float(f) => RawValue::Float(f),
            TypedValue::Bool(b) => RawValue::Bool(b),
            TypedValue::String(s) => RawValue::String(s),
            TypedValue::ObjectId(id) => RawValue::ObjectId(id),
            TypedValue::StoredDateTime(w) => RawValue::UtcDateTime(w),
            TypedValue::DateTime(dt) => RawValue::DateTime(dt),
            TypedValue::Record(record) => RawValue::Record(record),
            TypedValue::List(items) => RawValue::List(items.into_iter().map(Into::into).collect()),
            TypedValue::Keyed(entries) => RawValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(value as i64)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<ObjectId> for RawValue {
    fn from(value: ObjectId) -> Self {
        RawValue::ObjectId(value)
    }
}

impl From<UtcDateTime> for RawValue {
    fn from(value: UtcDateTime) -> Self {
        RawValue::UtcDateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for RawValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        RawValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        RawValue::DateTime(value.into())
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(value: NaiveDateTime) -> Self {
        RawValue::NaiveDateTime(value)
    }
}

impl From<RecordView> for RawValue {
    fn from(value: RecordView) -> Self {
        RawValue::Record(Box::new(value))
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(value: Vec<RawValue>) -> Self {
        RawValue::List(value)
    }
}

impl From<IndexMap<String, RawValue>> for RawValue {
    fn from(value: IndexMap<String, RawValue>) -> Self {
        RawValue::Map(value)
    }
}
