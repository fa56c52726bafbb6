//! Field declarations and their normalized schema entries

use super::config::SchemaConfig;
use super::types::TypeSpec;
use crate::errors::{CastError, CastResult};
use crate::value::RawValue;

/// A field as written by the declarer. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDecl {
    /// Type descriptor, e.g. `"int"` or `"array(Avatar)"`
    pub type_name: Option<String>,
    /// Literal default, cast on record construction
    pub default: Option<RawValue>,
    pub allow_null: Option<bool>,
}

impl FieldDecl {
    /// Declaration with nothing filled in
    pub fn new() -> Self {
        Self::default()
    }

    /// Declaration of the given type
    pub fn of(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    pub fn default_value(mut self, value: impl Into<RawValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn nullable(mut self, allow_null: bool) -> Self {
        self.allow_null = Some(allow_null);
        self
    }
}

/// A fully resolved field schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub type_spec: TypeSpec,
    pub default: Option<RawValue>,
    /// Carried for the storage layer; conversions do not consult it.
    pub allow_null: bool,
}

impl SchemaEntry {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Fills omitted parts of a declaration from the policy and parses its type.
///
/// # Errors
///
/// - `MissingFieldType` when the policy requires a type and none is given
/// - `InvalidSchemaType` when the descriptor does not parse
pub fn normalize<F>(
    kind: &str,
    field: &str,
    decl: &FieldDecl,
    config: &SchemaConfig,
    is_kind: &F,
) -> CastResult<SchemaEntry>
where
    F: Fn(&str) -> bool,
{
    let descriptor = match (&decl.type_name, config.require_type) {
        (Some(name), _) => name.as_str(),
        (None, true) => {
            return Err(CastError::MissingFieldType {
                kind: kind.to_string(),
                field: field.to_string(),
            })
        }
        (None, false) => config.default_type.as_str(),
    };

    Ok(SchemaEntry {
        type_spec: TypeSpec::parse(descriptor, is_kind)?,
        default: decl.default.clone(),
        allow_null: decl.allow_null.unwrap_or(config.default_allow_null),
    })
}
