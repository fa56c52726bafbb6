//! Default attribute materialization
//!
//! Each declared default literal goes through the caster once and the
//! typed result is stored as the initial attribute value as-is. There is
//! no second formatting pass; the write path formats it like any other
//! attribute.

use std::sync::Arc;

use indexmap::IndexMap;

use super::caster::Caster;
use crate::errors::CastResult;
use crate::schema::SchemaRegistry;
use crate::value::RawValue;

/// Computes the default attribute set of a record kind
pub struct DefaultsProvider<'a> {
    registry: &'a Arc<SchemaRegistry>,
}

impl<'a> DefaultsProvider<'a> {
    pub fn new(registry: &'a Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Default values keyed by field, in schema order.
    ///
    /// Fields without a declared default have no key. So do defaults whose
    /// cast is absent (e.g. a non-sequence default on an array field).
    pub fn default_attributes(&self, kind: &str) -> CastResult<IndexMap<String, RawValue>> {
        let caster = Caster::new(self.registry);
        let mut defaults = IndexMap::new();

        for (field, entry) in self.registry.schema_of(kind)? {
            let Some(literal) = &entry.default else {
                continue;
            };
            if let Some(typed) = caster.cast(&entry.type_spec, literal)? {
                defaults.insert(field.clone(), RawValue::from(typed));
            }
        }

        Ok(defaults)
    }
}
