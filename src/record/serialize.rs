//! Read-only projection of a record for external exposure
//!
//! Key set: stored keys, narrowed to `visible` when that is non-empty,
//! minus `hidden`, then every appended key. Appended keys are included
//! whatever `visible` and `hidden` say.

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use super::view::RecordView;
use crate::errors::CastResult;
use crate::value::TypedValue;

impl RecordView {
    /// Keys that serialize, in order
    pub fn visible_keys(&self) -> Vec<String> {
        let mut keys: IndexSet<String> = self
            .attributes()
            .keys()
            .filter(|key| self.visible.is_empty() || self.visible.contains(*key))
            .filter(|key| !self.hidden.contains(*key))
            .cloned()
            .collect();
        keys.extend(self.appends.iter().cloned());
        keys.into_iter().collect()
    }

    /// Typed values of every visible key.
    ///
    /// A key that reads as absent serializes as null.
    pub fn serialize(&self) -> CastResult<IndexMap<String, TypedValue>> {
        let mut output = IndexMap::new();
        for key in self.visible_keys() {
            let value = self.get_attribute(&key)?.unwrap_or(TypedValue::Null);
            output.insert(key, value);
        }
        Ok(output)
    }

    /// `serialize()` rendered as a JSON object
    pub fn to_json(&self) -> CastResult<Value> {
        let mut map = Map::new();
        for (key, value) in self.serialize()? {
            map.insert(key, value.to_json()?);
        }
        Ok(Value::Object(map))
    }

    /// The stored attribute map as JSON, without casting or visibility
    pub fn attributes_json(&self) -> CastResult<Value> {
        let mut map = Map::new();
        for (key, value) in self.attributes() {
            map.insert(key.clone(), value.to_json()?);
        }
        Ok(Value::Object(map))
    }

    /// Un-hide keys for this instance, and admit them when a visible list is set
    pub fn make_visible<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            self.hidden.shift_remove(&key);
            if !self.visible.is_empty() {
                self.visible.insert(key);
            }
        }
    }

    /// Hide keys for this instance
    pub fn make_hidden<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden.extend(keys.into_iter().map(Into::into));
    }

    /// Add computed keys for this instance
    pub fn append<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if !self.appends.contains(&key) {
                self.appends.push(key);
            }
        }
    }
}
