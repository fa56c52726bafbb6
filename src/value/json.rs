//! Bridge between attribute values and `serde_json::Value`

use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Number, Value};

use super::raw::RawValue;
use super::typed::TypedValue;
use crate::errors::CastResult;

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => RawValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => RawValue::String(s),
            Value::Array(items) => RawValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => RawValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

fn float_to_json(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

impl RawValue {
    /// Renders the stored form as JSON.
    ///
    /// Stored datetime wrappers become their millisecond count.
    pub fn to_json(&self) -> CastResult<Value> {
        Ok(match self {
            RawValue::Null => Value::Null,
            RawValue::Int(i) => Value::from(*i),
            RawValue::Float(f) => float_to_json(*f),
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::String(s) => Value::String(s.clone()),
            RawValue::ObjectId(id) => Value::String(id.to_string()),
            RawValue::UtcDateTime(w) => Value::from(w.millis()),
            RawValue::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            RawValue::NaiveDateTime(naive) => {
                Value::String(
                    Utc.from_utc_datetime(naive)
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                )
            }
            RawValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(RawValue::to_json)
                    .collect::<CastResult<Vec<_>>>()?,
            ),
            RawValue::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                Value::Object(map)
            }
            RawValue::Record(record) => record.to_json()?,
        })
    }
}

impl TypedValue {
    /// Renders the value as JSON.
    ///
    /// Nested records render through their own visibility rules.
    pub fn to_json(&self) -> CastResult<Value> {
        Ok(match self {
            TypedValue::Null => Value::Null,
            TypedValue::Int(i) => Value::from(*i),
            TypedValue::Float(f) => float_to_json(*f),
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::ObjectId(id) => Value::String(id.to_string()),
            TypedValue::StoredDateTime(w) => Value::from(w.millis()),
            TypedValue::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TypedValue::Record(record) => record.to_json()?,
            TypedValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(TypedValue::to_json)
                    .collect::<CastResult<Vec<_>>>()?,
            ),
            TypedValue::Keyed(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                Value::Object(map)
            }
        })
    }
}
