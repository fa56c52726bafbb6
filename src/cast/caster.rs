//! Read path: raw value -> typed value
//!
//! Null always casts to null. Arrays and nested records yield `None`
//! (absent) when the input has the wrong shape; scalars never do.

use std::sync::Arc;

use super::coerce;
use super::date;
use crate::errors::{CastError, CastResult};
use crate::observability::{log_event_with_fields, Event};
use crate::record::RecordView;
use crate::schema::{Primitive, SchemaRegistry, TypeSpec};
use crate::value::{RawValue, TypedValue};

/// Casts raw values according to a `TypeSpec`.
///
/// Nested records are materialized against the given registry.
pub struct Caster<'a> {
    registry: &'a Arc<SchemaRegistry>,
}

impl<'a> Caster<'a> {
    pub fn new(registry: &'a Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Casts `value` to `type_spec`. `Ok(None)` means the field is absent.
    ///
    /// # Errors
    ///
    /// - `DateParseError` for unresolvable date, datetime or timestamp input
    /// - `DepthExceeded` past the configured nesting bound
    pub fn cast(&self, type_spec: &TypeSpec, value: &RawValue) -> CastResult<Option<TypedValue>> {
        self.cast_at(type_spec, value, 0)
    }

    fn cast_at(
        &self,
        type_spec: &TypeSpec,
        value: &RawValue,
        depth: usize,
    ) -> CastResult<Option<TypedValue>> {
        if value.is_null() {
            return Ok(Some(TypedValue::Null));
        }
        check_depth(self.registry, depth)?;

        match type_spec {
            TypeSpec::Primitive(primitive) => cast_primitive(*primitive, value).map(Some),
            TypeSpec::Array(element) => self.cast_array(element, value, depth),
            TypeSpec::Nested(kind) => self.cast_nested(kind, value),
        }
    }

    fn cast_array(
        &self,
        element: &TypeSpec,
        value: &RawValue,
        depth: usize,
    ) -> CastResult<Option<TypedValue>> {
        match value {
            RawValue::List(items) => {
                let mut cast = Vec::with_capacity(items.len());
                for item in items {
                    cast.push(
                        self.cast_at(element, item, depth + 1)?
                            .unwrap_or(TypedValue::Null),
                    );
                }
                Ok(Some(TypedValue::List(cast)))
            }
            RawValue::Map(entries) => {
                let mut cast = indexmap::IndexMap::with_capacity(entries.len());
                for (key, item) in entries {
                    let typed = self
                        .cast_at(element, item, depth + 1)?
                        .unwrap_or(TypedValue::Null);
                    cast.insert(key.clone(), typed);
                }
                Ok(Some(TypedValue::Keyed(cast)))
            }
            _ => Ok(None),
        }
    }

    fn cast_nested(&self, kind: &str, value: &RawValue) -> CastResult<Option<TypedValue>> {
        match value {
            RawValue::Record(record) if record.kind() == kind => {
                Ok(Some(TypedValue::Record(record.clone())))
            }
            RawValue::Map(entries) => {
                let record = RecordView::materialize(Arc::clone(self.registry), kind, entries)?;
                Ok(Some(TypedValue::Record(Box::new(record))))
            }
            _ => Ok(None),
        }
    }
}

/// Scalar coercion shared by the read and write paths
pub(crate) fn cast_primitive(primitive: Primitive, value: &RawValue) -> CastResult<TypedValue> {
    Ok(match primitive {
        Primitive::Int => TypedValue::Int(coerce::to_int(value)),
        Primitive::Float => TypedValue::Float(coerce::to_float(value)),
        Primitive::String | Primitive::ObjectId => TypedValue::String(coerce::to_string(value)),
        Primitive::Bool => TypedValue::Bool(coerce::to_bool(value)),
        Primitive::Date | Primitive::DateTime => TypedValue::DateTime(date::resolve(value)?),
        Primitive::Timestamp => TypedValue::Int(date::resolve(value)?.timestamp()),
    })
}

pub(crate) fn check_depth(registry: &SchemaRegistry, depth: usize) -> CastResult<()> {
    let limit = registry.config().max_depth;
    if depth > limit {
        let limit_str = limit.to_string();
        log_event_with_fields(Event::DepthExceeded, &[("limit", limit_str.as_str())]);
        return Err(CastError::DepthExceeded { limit });
    }
    Ok(())
}
