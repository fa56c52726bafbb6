//! Error types for schema definition and value conversion
//!
//! Error codes:
//! - DOC_INVALID_SCHEMA_TYPE (FATAL)
//! - DOC_MISSING_FIELD_TYPE (FATAL)
//! - DOC_UNKNOWN_KIND (REJECT)
//! - DOC_DUPLICATE_KIND (FATAL)
//! - DOC_CYCLIC_SCHEMA (FATAL)
//! - DOC_MALFORMED_SCHEMA (FATAL)
//! - DOC_DATE_PARSE_FAILED (REJECT)
//! - DOC_DEPTH_EXCEEDED (REJECT)
//!
//! A value that cannot be given a storage representation is not an error.
//! The formatter reports it as `None` and the field is dropped.

use std::fmt;

use thiserror::Error;

/// Result type for casting, formatting and schema operations
pub type CastResult<T> = Result<T, CastError>;

/// Severity levels for conversion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The offending value or call is rejected, the schema stays usable
    Reject,
    /// The schema declaration itself is unusable
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Errors raised while declaring schemas or converting values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    // Schema definition errors
    #[error("Invalid schema type: '{descriptor}'")]
    InvalidSchemaType { descriptor: String },

    #[error("Field '{kind}.{field}' does not declare a type")]
    MissingFieldType { kind: String, field: String },

    #[error("Unknown record kind: {0}")]
    UnknownKind(String),

    #[error("Record kind already declared: {0}")]
    DuplicateKind(String),

    #[error("Record kinds nest each other: {path}")]
    CyclicSchema { path: String },

    #[error("Malformed schema file '{path}': {reason}")]
    MalformedSchema { path: String, reason: String },

    // Conversion errors
    #[error("Could not resolve a date from {input}")]
    DateParseError { input: String },

    #[error("Nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

impl CastError {
    /// Create an invalid schema type error
    pub fn invalid_type(descriptor: impl Into<String>) -> Self {
        Self::InvalidSchemaType {
            descriptor: descriptor.into(),
        }
    }

    /// Create a date parse error
    pub fn date_parse(input: impl Into<String>) -> Self {
        Self::DateParseError {
            input: input.into(),
        }
    }

    /// Create a malformed schema file error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSchemaType { .. } => "DOC_INVALID_SCHEMA_TYPE",
            Self::MissingFieldType { .. } => "DOC_MISSING_FIELD_TYPE",
            Self::UnknownKind(_) => "DOC_UNKNOWN_KIND",
            Self::DuplicateKind(_) => "DOC_DUPLICATE_KIND",
            Self::CyclicSchema { .. } => "DOC_CYCLIC_SCHEMA",
            Self::MalformedSchema { .. } => "DOC_MALFORMED_SCHEMA",
            Self::DateParseError { .. } => "DOC_DATE_PARSE_FAILED",
            Self::DepthExceeded { .. } => "DOC_DEPTH_EXCEEDED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownKind(_) | Self::DateParseError { .. } | Self::DepthExceeded { .. } => {
                Severity::Reject
            }
            _ => Severity::Fatal,
        }
    }

    /// Returns whether the schema declaration itself is at fault
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CastError::invalid_type("array(").code(), "DOC_INVALID_SCHEMA_TYPE");
        assert_eq!(CastError::date_parse("\"x\"").code(), "DOC_DATE_PARSE_FAILED");
        assert_eq!(CastError::UnknownKind("User".into()).code(), "DOC_UNKNOWN_KIND");
    }

    #[test]
    fn test_severity_levels() {
        assert!(CastError::invalid_type("nope").is_fatal());
        assert!(CastError::CyclicSchema { path: "A -> A".into() }.is_fatal());
        assert_eq!(CastError::date_parse("x").severity(), Severity::Reject);
        assert_eq!(CastError::DepthExceeded { limit: 4 }.severity(), Severity::Reject);
    }

    #[test]
    fn test_display_includes_context() {
        let err = CastError::MissingFieldType {
            kind: "User".into(),
            field: "age".into(),
        };
        assert_eq!(err.to_string(), "Field 'User.age' does not declare a type");
        assert!(CastError::invalid_type("arr(int)").to_string().contains("arr(int)"));
    }
}
