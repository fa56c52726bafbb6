//! Schema-aware record over a raw attribute map
//!
//! The attribute map is the only persisted state. Typed values are
//! produced on every read and nested records are rebuilt from their raw
//! sub-map each time; nothing is cached.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::cast::{Caster, DefaultsProvider, Formatter};
use crate::errors::CastResult;
use crate::schema::{RecordKind, SchemaRegistry};
use crate::value::{RawValue, TypedValue};

/// A record of one kind.
///
/// Visibility and appends start from the kind's declaration and can be
/// adjusted per instance; they are never persisted.
#[derive(Clone)]
pub struct RecordView {
    registry: Arc<SchemaRegistry>,
    kind: Arc<RecordKind>,
    attributes: IndexMap<String, RawValue>,
    pub(super) visible: IndexSet<String>,
    pub(super) hidden: IndexSet<String>,
    pub(super) appends: Vec<String>,
}

impl RecordView {
    fn blank(registry: Arc<SchemaRegistry>, kind: &str) -> CastResult<Self> {
        let kind = Arc::clone(registry.kind(kind)?);
        Ok(Self {
            visible: kind.visible().clone(),
            hidden: kind.hidden().clone(),
            appends: kind.appends().to_vec(),
            registry,
            kind,
            attributes: IndexMap::new(),
        })
    }

    /// An empty record holding only its kind's defaults.
    pub fn new(registry: Arc<SchemaRegistry>, kind: &str) -> CastResult<Self> {
        let mut record = Self::blank(registry, kind)?;
        record.merge_defaults()?;
        Ok(record)
    }

    /// A record built from external input.
    ///
    /// Only fillable keys are assigned. Defaults then fill the gaps; an
    /// assigned value always wins over a default.
    pub fn from_input<I, K, V>(registry: Arc<SchemaRegistry>, kind: &str, input: I) -> CastResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        let mut record = Self::blank(registry, kind)?;
        record.fill(input);
        record.merge_defaults()?;
        Ok(record)
    }

    /// A record built from a trusted nested map: every entry is assigned,
    /// fillable is not consulted.
    pub fn materialize(
        registry: Arc<SchemaRegistry>,
        kind: &str,
        entries: &IndexMap<String, RawValue>,
    ) -> CastResult<Self> {
        let mut record = Self::new(registry, kind)?;
        record.force_fill(entries.iter().map(|(key, value)| (key.clone(), value.clone())));
        Ok(record)
    }

    fn merge_defaults(&mut self) -> CastResult<()> {
        let defaults = DefaultsProvider::new(&self.registry).default_attributes(self.kind.name())?;
        for (field, value) in defaults {
            self.attributes.entry(field).or_insert(value);
        }
        Ok(())
    }

    pub fn kind(&self) -> &str {
        self.kind.name()
    }

    pub fn record_kind(&self) -> &RecordKind {
        &self.kind
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// The raw attribute map
    pub fn attributes(&self) -> &IndexMap<String, RawValue> {
        &self.attributes
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn raw_attribute(&self, key: &str) -> Option<&RawValue> {
        self.attributes.get(key)
    }

    /// Assigns fillable keys only
    pub fn fill<I, K, V>(&mut self, input: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        for (key, value) in input {
            let key = key.into();
            if self.kind.is_fillable(&key) {
                self.set_attribute(key, value);
            }
        }
    }

    /// Assigns every key
    pub fn force_fill<I, K, V>(&mut self, input: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        for (key, value) in input {
            self.set_attribute(key, value);
        }
    }

    /// Assigns an attribute.
    ///
    /// A registered setter takes over entirely. Otherwise the raw value is
    /// stored unchecked; a bad value surfaces on the next cast or format.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let setter = self.kind.mutators().setter(&key);
        match setter {
            Some(setter) => setter(self, value.into()),
            None => self.set_raw_attribute(key, value),
        }
    }

    /// Stores a raw value, bypassing setters. Setters use this to persist.
    pub fn set_raw_attribute(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Reads an attribute.
    ///
    /// `Ok(None)` when the key is neither stored nor backed by a getter. A
    /// getter wins over the schema; schema fields are cast; anything else
    /// is returned untyped.
    pub fn get_attribute(&self, key: &str) -> CastResult<Option<TypedValue>> {
        let raw = self.attributes.get(key);

        if let Some(getter) = self.kind.mutators().getter(key) {
            return getter(self, raw);
        }

        let Some(raw) = raw else {
            return Ok(None);
        };

        match self.kind.field(key) {
            Some(entry) => Caster::new(&self.registry).cast(&entry.type_spec, raw),
            None => Ok(Some(TypedValue::from(raw.clone()))),
        }
    }

    /// This record's own attributes in storage form
    pub fn formatted(&self) -> CastResult<IndexMap<String, RawValue>> {
        Formatter::new(&self.registry).formatted_attributes(self.kind.name(), &self.attributes)
    }
}

impl fmt::Debug for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordView")
            .field("kind", &self.kind.name())
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Records are equal when they are of the same kind and hold the same
/// attributes.
impl PartialEq for RecordView {
    fn eq(&self, other: &Self) -> bool {
        self.kind.name() == other.kind.name() && self.attributes == other.attributes
    }
}
