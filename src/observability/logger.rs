//! Structured JSON logger
//!
//! One line per event: `event`, then `severity`, then fields sorted by
//! key, all as JSON strings. Failures go to stderr, everything else to
//! stdout. Nothing is written until `set_enabled(true)`.

use std::fmt;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn log output on or off for the whole process
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-value detail
    Trace,
    Info,
    /// A declaration or value was rejected
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes cast events as JSON lines
pub struct Logger;

impl Logger {
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !is_enabled() {
            return;
        }
        let line = render_line(severity, event, fields);
        // a failed log write never fails the conversion
        let _ = if severity >= Severity::Error {
            io::stderr().lock().write_all(line.as_bytes())
        } else {
            io::stdout().lock().write_all(line.as_bytes())
        };
    }
}

/// Renders one newline-terminated JSON object
pub(crate) fn render_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);

    let mut line = String::with_capacity(64 + fields.len() * 24);
    push_pair(&mut line, "event", event, '{');
    push_pair(&mut line, "severity", severity.as_str(), ',');
    for (key, value) in sorted {
        push_pair(&mut line, key, value, ',');
    }
    line.push_str("}\n");
    line
}

fn push_pair(line: &mut String, key: &str, value: &str, separator: char) {
    line.push(separator);
    push_quoted(line, key);
    line.push(':');
    push_quoted(line, value);
}

fn push_quoted(line: &mut String, s: &str) {
    line.push('"');
    for c in s.chars() {
        match c {
            '"' => line.push_str("\\\""),
            '\\' => line.push_str("\\\\"),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(line, "\\u{:04x}", c as u32);
            }
            c => line.push(c),
        }
    }
    line.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
        assert_eq!(Severity::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_line_is_json() {
        let line = render_line(Severity::Warn, "DATE_PARSE_FAILED", &[("input", "string \"x\"")]);

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "DATE_PARSE_FAILED");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["input"], "string \"x\"");
        assert!(line.ends_with("}\n"));
    }

    #[test]
    fn test_fields_sorted_after_event() {
        let a = render_line(Severity::Info, "SCHEMA_REGISTERED", &[("kind", "User"), ("fields", "3")]);
        let b = render_line(Severity::Info, "SCHEMA_REGISTERED", &[("fields", "3"), ("kind", "User")]);
        assert_eq!(a, b);
        assert_eq!(
            a,
            "{\"event\":\"SCHEMA_REGISTERED\",\"severity\":\"INFO\",\"fields\":\"3\",\"kind\":\"User\"}\n"
        );
    }

    #[test]
    fn test_control_chars_escaped() {
        let line = render_line(Severity::Trace, "FIELD_DROPPED_ON_FORMAT", &[("field", "a\nb\u{1}")]);
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains("a\\nb\\u0001"));
    }
}
