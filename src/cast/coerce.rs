//! Loose scalar coercion
//!
//! Non-numeric strings become zero, numeric prefixes are honored
//! ("30abc" -> 30), floats truncate toward zero with saturation, and
//! truthiness follows the empty/zero rule. Date-times of every form
//! become Unix seconds.

use std::sync::OnceLock;

use chrono::{TimeZone, Utc};
use regex::Regex;

use crate::value::RawValue;

/// Leading numeric portion of a string, after optional whitespace
static NUMERIC_PREFIX: OnceLock<Regex> = OnceLock::new();

/// A string that is numeric in its entirety
static NUMERIC: OnceLock<Regex> = OnceLock::new();

const NUMBER: &str = r"[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?";

fn numeric_prefix_re() -> &'static Regex {
    NUMERIC_PREFIX.get_or_init(|| {
        Regex::new(&format!(r"^\s*({})", NUMBER)).expect("numeric prefix pattern is valid")
    })
}

fn numeric_re() -> &'static Regex {
    NUMERIC.get_or_init(|| {
        Regex::new(&format!(r"^\s*{}\s*$", NUMBER)).expect("numeric pattern is valid")
    })
}

/// The numeric prefix of `s`, if any
fn leading_number(s: &str) -> Option<&str> {
    numeric_prefix_re()
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether the whole string reads as a number
pub fn is_numeric_str(s: &str) -> bool {
    numeric_re().is_match(s)
}

fn is_integral(number: &str) -> bool {
    !number.contains(['.', 'e', 'E'])
}

/// Truncating, saturating float to int
fn float_to_int(f: f64) -> i64 {
    f as i64
}

fn str_to_int(s: &str) -> i64 {
    match leading_number(s) {
        Some(number) if is_integral(number) => number.parse::<i64>().unwrap_or_else(|_| {
            if number.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }),
        Some(number) => float_to_int(number.parse::<f64>().unwrap_or(0.0)),
        None => 0,
    }
}

fn str_to_float(s: &str) -> f64 {
    leading_number(s)
        .and_then(|number| number.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn bool_number(b: bool) -> i64 {
    if b {
        1
    } else {
        0
    }
}

pub fn to_int(value: &RawValue) -> i64 {
    match value {
        RawValue::Null => 0,
        RawValue::Int(i) => *i,
        RawValue::Float(f) => float_to_int(*f),
        RawValue::Bool(b) => bool_number(*b),
        RawValue::String(s) => str_to_int(s),
        RawValue::List(items) => bool_number(!items.is_empty()),
        RawValue::Map(entries) => bool_number(!entries.is_empty()),
        RawValue::UtcDateTime(w) => w.millis().div_euclid(1000),
        RawValue::DateTime(dt) => dt.timestamp(),
        RawValue::NaiveDateTime(naive) => Utc.from_utc_datetime(naive).timestamp(),
        RawValue::ObjectId(_) | RawValue::Record(_) => 1,
    }
}

pub fn to_float(value: &RawValue) -> f64 {
    match value {
        RawValue::Float(f) => *f,
        RawValue::String(s) => str_to_float(s),
        other => to_int(other) as f64,
    }
}

pub fn to_bool(value: &RawValue) -> bool {
    match value {
        RawValue::Null => false,
        RawValue::Int(i) => *i != 0,
        RawValue::Float(f) => *f != 0.0,
        RawValue::Bool(b) => *b,
        RawValue::String(s) => !(s.is_empty() || s == "0"),
        RawValue::List(items) => !items.is_empty(),
        RawValue::Map(entries) => !entries.is_empty(),
        _ => true,
    }
}

/// String form. Object ids render canonically, date-times as
/// `YYYY-MM-DD HH:MM:SS`, stored datetime wrappers as their millisecond
/// count and nested records as their stored JSON.
pub fn to_string(value: &RawValue) -> String {
    match value {
        RawValue::Null => String::new(),
        RawValue::Int(i) => i.to_string(),
        RawValue::Float(f) => f.to_string(),
        RawValue::Bool(b) => if *b { "1" } else { "" }.to_string(),
        RawValue::String(s) => s.clone(),
        RawValue::ObjectId(id) => id.to_string(),
        RawValue::UtcDateTime(w) => w.to_string(),
        RawValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        RawValue::NaiveDateTime(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
        RawValue::List(_) | RawValue::Map(_) => "Array".to_string(),
        RawValue::Record(record) => record
            .attributes_json()
            .map(|json| json.to_string())
            .unwrap_or_default(),
    }
}
