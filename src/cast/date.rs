//! Date resolution for date, datetime and timestamp fields
//!
//! First match wins:
//! 1. stored datetime wrapper -> that UTC instant
//! 2. rich date-time -> unchanged
//! 3. wall-clock date-time -> same wall clock in UTC, sub-second kept
//! 4. number (or numeric string) -> Unix seconds
//! 5. `YYYY-M-D` -> midnight UTC
//! 6. `YYYY-MM-DD HH:MM:SS` -> that instant in UTC
//!
//! Anything else is a `DateParseError`.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use super::coerce::is_numeric_str;
use crate::errors::{CastError, CastResult};
use crate::observability::{log_event_with_fields, Event};
use crate::value::RawValue;

/// Fixed layout of the final fallback parse
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static DATE_ONLY: OnceLock<Regex> = OnceLock::new();

fn date_only_re() -> &'static Regex {
    DATE_ONLY.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("date pattern is valid")
    })
}

/// Resolves a raw value to a date-time.
pub fn resolve(value: &RawValue) -> CastResult<DateTime<FixedOffset>> {
    resolve_inner(value).ok_or_else(|| {
        let input = value.describe();
        log_event_with_fields(Event::DateParseFailed, &[("input", input.as_str())]);
        CastError::date_parse(input)
    })
}

fn resolve_inner(value: &RawValue) -> Option<DateTime<FixedOffset>> {
    match value {
        RawValue::UtcDateTime(wrapper) => wrapper.to_datetime().map(Into::into),
        RawValue::DateTime(dt) => Some(*dt),
        RawValue::NaiveDateTime(naive) => Some(Utc.from_utc_datetime(naive).into()),
        RawValue::Int(secs) => from_unix_seconds(*secs, 0),
        RawValue::Float(secs) => from_fractional_seconds(*secs),
        RawValue::String(s) => resolve_str(s),
        _ => None,
    }
}

fn resolve_str(s: &str) -> Option<DateTime<FixedOffset>> {
    if is_numeric_str(s) {
        let trimmed = s.trim();
        return match trimmed.parse::<i64>() {
            Ok(secs) => from_unix_seconds(secs, 0),
            Err(_) => trimmed.parse::<f64>().ok().and_then(from_fractional_seconds),
        };
    }

    if let Some(caps) = date_only_re().captures(s) {
        let year = caps[1].parse::<i32>().ok()?;
        let month = caps[2].parse::<u32>().ok()?;
        let day = caps[3].parse::<u32>().ok()?;
        let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).into());
    }

    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).into())
}

fn from_unix_seconds(secs: i64, nanos: u32) -> Option<DateTime<FixedOffset>> {
    Utc.timestamp_opt(secs, nanos).single().map(Into::into)
}

fn from_fractional_seconds(secs: f64) -> Option<DateTime<FixedOffset>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    from_unix_seconds(whole as i64, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::UtcDateTime;
    use chrono::Timelike;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap().into()
    }

    #[test]
    fn test_stored_wrapper_is_utc_instant() {
        let resolved = resolve(&RawValue::UtcDateTime(UtcDateTime::from_millis(1_500))).unwrap();
        assert_eq!(resolved.timestamp(), 1);
        assert_eq!(resolved.timestamp_subsec_millis(), 500);
        assert_eq!(resolved.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_rich_datetime_passthrough_keeps_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2022, 6, 1, 10, 0, 0).unwrap();
        let resolved = resolve(&RawValue::DateTime(dt)).unwrap();
        assert_eq!(resolved, dt);
        assert_eq!(resolved.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_naive_keeps_subsecond() {
        let naive = NaiveDate::from_ymd_opt(2022, 6, 1)
            .unwrap()
            .and_hms_micro_opt(10, 0, 0, 123_456)
            .unwrap();
        let resolved = resolve(&RawValue::NaiveDateTime(naive)).unwrap();
        assert_eq!(resolved.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_numeric_is_unix_seconds() {
        assert_eq!(resolve(&RawValue::Int(0)).unwrap(), utc(1970, 1, 1, 0, 0, 0));
        assert_eq!(
            resolve(&"1600000000".into()).unwrap(),
            utc(2020, 9, 13, 12, 26, 40)
        );
        let fractional = resolve(&RawValue::Float(1.25)).unwrap();
        assert_eq!(fractional.timestamp(), 1);
        assert_eq!(fractional.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        assert_eq!(resolve(&"2021-3-7".into()).unwrap(), utc(2021, 3, 7, 0, 0, 0));
        assert_eq!(resolve(&"2021-03-07".into()).unwrap(), utc(2021, 3, 7, 0, 0, 0));
    }

    #[test]
    fn test_fixed_format_fallback() {
        assert_eq!(
            resolve(&"2021-03-07 08:09:10".into()).unwrap(),
            utc(2021, 3, 7, 8, 9, 10)
        );
    }

    #[test]
    fn test_unparseable_fails() {
        for bad in ["yesterday", "2021-13-40", "07/03/2021", ""] {
            let err = resolve(&bad.into()).unwrap_err();
            assert_eq!(err.code(), "DOC_DATE_PARSE_FAILED", "input {:?}", bad);
        }
        assert!(resolve(&RawValue::Bool(true)).is_err());
        assert!(resolve(&RawValue::List(vec![])).is_err());
    }
}
