//! Observable events of the conversion layer
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema lifecycle
    /// A record kind was resolved into the registry
    SchemaRegistered,
    /// A schema declaration file was read
    SchemaLoaded,
    /// A declaration failed to resolve
    SchemaRejected,

    // Conversions
    /// A value could not be resolved to a date
    DateParseFailed,
    /// The formatter produced no storage form for a field
    FieldDroppedOnFormat,
    /// Recursion hit the configured depth bound
    DepthExceeded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::DateParseFailed => "DATE_PARSE_FAILED",
            Event::FieldDroppedOnFormat => "FIELD_DROPPED_ON_FORMAT",
            Event::DepthExceeded => "DEPTH_EXCEEDED",
        }
    }

    /// Whether this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::SchemaRejected | Event::DateParseFailed | Event::DepthExceeded
        )
    }

    /// Whether this event fires on every conversion rather than once per schema
    pub fn is_hot_path(&self) -> bool {
        matches!(self, Event::FieldDroppedOnFormat)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
