//! Per-field accessor overrides
//!
//! A record kind may register a getter and/or a setter for a field name.
//! Lookups are a table probe keyed by field name, fixed when the kind is
//! declared.

use std::collections::HashMap;
use std::fmt;

use super::view::RecordView;
use crate::errors::CastResult;
use crate::value::{RawValue, TypedValue};

/// Read override. Receives the stored value, if any, and replaces schema
/// casting entirely. `Ok(None)` means the attribute is absent.
pub type GetMutator = fn(&RecordView, Option<&RawValue>) -> CastResult<Option<TypedValue>>;

/// Write override. Owns the assignment; it may store nothing at all.
pub type SetMutator = fn(&mut RecordView, RawValue);

/// Getter and setter tables for one record kind
#[derive(Clone, Default)]
pub struct MutatorTable {
    getters: HashMap<String, GetMutator>,
    setters: HashMap<String, SetMutator>,
}

impl MutatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_getter(&mut self, field: impl Into<String>, getter: GetMutator) {
        self.getters.insert(field.into(), getter);
    }

    pub fn set_setter(&mut self, field: impl Into<String>, setter: SetMutator) {
        self.setters.insert(field.into(), setter);
    }

    pub fn getter(&self, field: &str) -> Option<GetMutator> {
        self.getters.get(field).copied()
    }

    pub fn setter(&self, field: &str) -> Option<SetMutator> {
        self.setters.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty() && self.setters.is_empty()
    }
}

impl fmt::Debug for MutatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutatorTable")
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .finish()
    }
}
