//! Field type descriptors
//!
//! Supported descriptors:
//! - primitives: int, float, string, bool, date, datetime, timestamp, objectid
//! - a declared record kind name, for nested documents
//! - array(<descriptor>), nestable to any depth

use std::fmt;

use crate::errors::{CastError, CastResult};

/// Scalar field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
    /// Calendar date, held as a date-time
    Date,
    /// Date-time with offset
    DateTime,
    /// Unix seconds
    Timestamp,
    /// Opaque store identifier, held as its string form
    ObjectId,
}

impl Primitive {
    /// Resolves a primitive from its descriptor name or alias
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int" | "integer" => Primitive::Int,
            "float" | "double" => Primitive::Float,
            "string" => Primitive::String,
            "bool" | "boolean" => Primitive::Bool,
            "date" => Primitive::Date,
            "datetime" => Primitive::DateTime,
            "timestamp" => Primitive::Timestamp,
            "objectid" => Primitive::ObjectId,
            _ => return None,
        })
    }

    /// Returns the canonical descriptor name
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::String => "string",
            Primitive::Bool => "bool",
            Primitive::Date => "date",
            Primitive::DateTime => "datetime",
            Primitive::Timestamp => "timestamp",
            Primitive::ObjectId => "objectid",
        }
    }

    /// Whether values of this type resolve through date parsing
    pub fn is_temporal(&self) -> bool {
        matches!(self, Primitive::Date | Primitive::DateTime | Primitive::Timestamp)
    }
}

/// A parsed field type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    Primitive(Primitive),
    /// Reference to another record kind by name
    Nested(String),
    /// Homogeneous sequence (boxed to allow recursive types)
    Array(Box<TypeSpec>),
}

impl TypeSpec {
    /// Parses a descriptor.
    ///
    /// `is_kind` answers whether a name is a declared record kind. Primitive
    /// names win over kind names.
    ///
    /// # Errors
    ///
    /// `InvalidSchemaType` when the descriptor is neither a primitive, a
    /// known kind, nor `array(<valid descriptor>)`.
    pub fn parse<F>(descriptor: &str, is_kind: &F) -> CastResult<Self>
    where
        F: Fn(&str) -> bool,
    {
        let trimmed = descriptor.trim();

        if let Some(primitive) = Primitive::from_name(trimmed) {
            return Ok(TypeSpec::Primitive(primitive));
        }

        if let Some(inner) = trimmed
            .strip_prefix("array(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let element = TypeSpec::parse(inner, is_kind)
                .map_err(|_| CastError::invalid_type(descriptor))?;
            return Ok(TypeSpec::Array(Box::new(element)));
        }

        if !trimmed.is_empty() && is_kind(trimmed) {
            return Ok(TypeSpec::Nested(trimmed.to_string()));
        }

        Err(CastError::invalid_type(descriptor))
    }

    /// Parses a descriptor that may not reference record kinds
    pub fn parse_primitive(descriptor: &str) -> CastResult<Self> {
        Self::parse(descriptor, &|_: &str| false)
    }

    /// The record kind reached through any number of array wrappers
    pub fn nested_kind(&self) -> Option<&str> {
        match self {
            TypeSpec::Primitive(_) => None,
            TypeSpec::Nested(kind) => Some(kind),
            TypeSpec::Array(element) => element.nested_kind(),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Primitive(p) => write!(f, "{}", p.name()),
            TypeSpec::Nested(kind) => write!(f, "{}", kind),
            TypeSpec::Array(element) => write!(f, "array({})", element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(name: &str) -> bool {
        matches!(name, "Avatar" | "Address")
    }

    #[test]
    fn test_parse_primitives() {
        assert_eq!(
            TypeSpec::parse_primitive("int").unwrap(),
            TypeSpec::Primitive(Primitive::Int)
        );
        assert_eq!(
            TypeSpec::parse_primitive(" boolean ").unwrap(),
            TypeSpec::Primitive(Primitive::Bool)
        );
        assert_eq!(
            TypeSpec::parse_primitive("objectid").unwrap(),
            TypeSpec::Primitive(Primitive::ObjectId)
        );
    }

    #[test]
    fn test_parse_nested_array() {
        let spec = TypeSpec::parse("array(array(int))", &kinds).unwrap();
        assert_eq!(
            spec,
            TypeSpec::Array(Box::new(TypeSpec::Array(Box::new(TypeSpec::Primitive(
                Primitive::Int
            )))))
        );
        assert_eq!(spec.to_string(), "array(array(int))");
    }

    #[test]
    fn test_parse_kind_reference() {
        let spec = TypeSpec::parse("array(Avatar)", &kinds).unwrap();
        assert_eq!(spec.nested_kind(), Some("Avatar"));
        assert_eq!(TypeSpec::parse("Address", &kinds).unwrap().to_string(), "Address");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for bad in ["", "Unknown", "array(", "array()", "array(Unknown)", "arrays(int)", "int)"] {
            let err = TypeSpec::parse(bad, &kinds).unwrap_err();
            assert_eq!(err, CastError::invalid_type(bad), "descriptor {:?}", bad);
        }
    }

    #[test]
    fn test_primitive_names_round_trip() {
        for p in [
            Primitive::Int,
            Primitive::Float,
            Primitive::String,
            Primitive::Bool,
            Primitive::Date,
            Primitive::DateTime,
            Primitive::Timestamp,
            Primitive::ObjectId,
        ] {
            assert_eq!(Primitive::from_name(p.name()), Some(p));
        }
        assert!(Primitive::Timestamp.is_temporal());
        assert!(!Primitive::ObjectId.is_temporal());
    }
}
