//! Write path: typed or raw value -> canonical storage form
//!
//! `None` means "omit the field", never "write null". Null input, an
//! array field holding a non-sequence and a nested field holding neither a
//! matching record nor a map all format to `None`.

use std::sync::Arc;

use indexmap::IndexMap;

use super::caster::{cast_primitive, check_depth};
use super::date;
use crate::errors::CastResult;
use crate::observability::{log_event_with_fields, Event};
use crate::record::RecordView;
use crate::schema::{Primitive, SchemaRegistry, TypeSpec};
use crate::value::{RawValue, UtcDateTime};

/// Formats values for storage according to a `TypeSpec`.
pub struct Formatter<'a> {
    registry: &'a Arc<SchemaRegistry>,
}

impl<'a> Formatter<'a> {
    pub fn new(registry: &'a Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Formats `value` as `type_spec`. `Ok(None)` drops the field.
    ///
    /// # Errors
    ///
    /// - `DateParseError` when a temporal value cannot be resolved
    /// - `DepthExceeded` past the configured nesting bound
    pub fn format(&self, type_spec: &TypeSpec, value: &RawValue) -> CastResult<Option<RawValue>> {
        self.format_at(type_spec, value, 0)
    }

    /// Formats every schema field of `kind` present in `attributes`.
    ///
    /// Fields without a schema entry are left out, as are fields whose
    /// formatted value is absent. Attribute order is kept.
    pub fn formatted_attributes(
        &self,
        kind: &str,
        attributes: &IndexMap<String, RawValue>,
    ) -> CastResult<IndexMap<String, RawValue>> {
        self.formatted_attributes_at(kind, attributes, 0)
    }

    fn formatted_attributes_at(
        &self,
        kind: &str,
        attributes: &IndexMap<String, RawValue>,
        depth: usize,
    ) -> CastResult<IndexMap<String, RawValue>> {
        let schema = self.registry.schema_of(kind)?;
        let mut formatted = IndexMap::with_capacity(attributes.len());

        for (field, value) in attributes {
            let Some(entry) = schema.get(field) else {
                continue;
            };
            match self.format_at(&entry.type_spec, value, depth)? {
                Some(stored) => {
                    formatted.insert(field.clone(), stored);
                }
                None => log_event_with_fields(
                    Event::FieldDroppedOnFormat,
                    &[("field", field.as_str()), ("kind", kind)],
                ),
            }
        }

        Ok(formatted)
    }

    fn format_at(
        &self,
        type_spec: &TypeSpec,
        value: &RawValue,
        depth: usize,
    ) -> CastResult<Option<RawValue>> {
        if value.is_null() {
            return Ok(None);
        }
        check_depth(self.registry, depth)?;

        match type_spec {
            TypeSpec::Primitive(primitive) => format_primitive(*primitive, value).map(Some),
            TypeSpec::Array(element) => self.format_array(element, value, depth),
            TypeSpec::Nested(kind) => self.format_nested(kind, value, depth),
        }
    }

    fn format_array(
        &self,
        element: &TypeSpec,
        value: &RawValue,
        depth: usize,
    ) -> CastResult<Option<RawValue>> {
        match value {
            RawValue::List(items) => {
                let mut stored = Vec::with_capacity(items.len());
                for item in items {
                    stored.push(
                        self.format_at(element, item, depth + 1)?
                            .unwrap_or(RawValue::Null),
                    );
                }
                Ok(Some(RawValue::List(stored)))
            }
            RawValue::Map(entries) => {
                let mut stored = IndexMap::with_capacity(entries.len());
                for (key, item) in entries {
                    let formatted = self
                        .format_at(element, item, depth + 1)?
                        .unwrap_or(RawValue::Null);
                    stored.insert(key.clone(), formatted);
                }
                Ok(Some(RawValue::Map(stored)))
            }
            _ => Ok(None),
        }
    }

    fn format_nested(
        &self,
        kind: &str,
        value: &RawValue,
        depth: usize,
    ) -> CastResult<Option<RawValue>> {
        let materialized;
        let record = match value {
            RawValue::Record(record) if record.kind() == kind => &**record,
            RawValue::Map(entries) => {
                materialized = RecordView::materialize(Arc::clone(self.registry), kind, entries)?;
                &materialized
            }
            _ => return Ok(None),
        };

        let stored = self.formatted_attributes_at(kind, record.attributes(), depth + 1)?;
        Ok(Some(RawValue::Map(stored)))
    }
}

fn format_primitive(primitive: Primitive, value: &RawValue) -> CastResult<RawValue> {
    match (primitive, value) {
        (Primitive::Date | Primitive::DateTime, RawValue::UtcDateTime(wrapper)) => {
            Ok(RawValue::UtcDateTime(*wrapper))
        }
        (Primitive::Date | Primitive::DateTime, other) => {
            let resolved = date::resolve(other)?;
            Ok(RawValue::UtcDateTime(UtcDateTime::from_datetime(&resolved)))
        }
        (other, value) => cast_primitive(other, value).map(RawValue::from),
    }
}
