//! Record kind declarations read from disk
//!
//! One kind per `*.json` file:
//!
//! ```json
//! {
//!   "kind": "User",
//!   "fields": {
//!     "age": { "type": "int" },
//!     "role": { "type": "int", "default": 1 },
//!     "avatar": { "type": "Avatar", "allow_null": true }
//!   },
//!   "fillable": ["age"],
//!   "visible": [],
//!   "hidden": ["role"],
//!   "appends": []
//! }
//! ```
//!
//! Files are read in name order. Other extensions are skipped. Mutators
//! cannot be declared in a file; add them to the returned `KindDecl`.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use super::entry::FieldDecl;
use super::registry::{KindDecl, SchemaRegistryBuilder};
use crate::errors::{CastError, CastResult};
use crate::observability::{log_event_with_fields, Event};
use crate::value::RawValue;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KindFileRaw {
    kind: String,
    #[serde(default)]
    fields: IndexMap<String, FieldRaw>,
    #[serde(default)]
    fillable: Vec<String>,
    #[serde(default)]
    visible: Vec<String>,
    #[serde(default)]
    hidden: Vec<String>,
    #[serde(default)]
    appends: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldRaw {
    #[serde(rename = "type", default)]
    ty: Option<String>,
    /// A `null` default reads the same as no default.
    #[serde(default)]
    default: Option<serde_json::Value>,
    #[serde(default)]
    allow_null: Option<bool>,
}

impl From<KindFileRaw> for KindDecl {
    fn from(raw: KindFileRaw) -> Self {
        let mut decl = KindDecl::new(raw.kind)
            .fillable(raw.fillable)
            .visible(raw.visible)
            .hidden(raw.hidden)
            .appends(raw.appends);
        for (name, field) in raw.fields {
            decl = decl.field(
                name,
                FieldDecl {
                    type_name: field.ty,
                    default: field.default.map(RawValue::from),
                    allow_null: field.allow_null,
                },
            );
        }
        decl
    }
}

/// Reads kind declarations from a directory.
pub struct SchemaLoader {
    schema_dir: PathBuf,
}

impl SchemaLoader {
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Registers every declaration in the directory on `builder`.
    ///
    /// Returns the number of kinds loaded.
    ///
    /// # Errors
    ///
    /// - `MalformedSchema` when the directory or a file cannot be read or parsed
    /// - `DuplicateKind` when a kind is already declared
    pub fn load_into(&self, builder: &mut SchemaRegistryBuilder) -> CastResult<usize> {
        let dir = self.schema_dir.display().to_string();
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            CastError::malformed(&dir, format!("Failed to read schema directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                CastError::malformed(&dir, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            builder.register(Self::load_file(path)?)?;
        }
        Ok(paths.len())
    }

    /// Reads a single declaration file.
    pub fn load_file(path: &Path) -> CastResult<KindDecl> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| CastError::malformed(&source, format!("Failed to read file: {}", e)))?;
        let decl = Self::parse(&content, &source)?;

        let field_count = decl.fields.len().to_string();
        log_event_with_fields(
            Event::SchemaLoaded,
            &[
                ("fields", field_count.as_str()),
                ("kind", decl.name.as_str()),
                ("path", source.as_str()),
            ],
        );
        Ok(decl)
    }

    /// Parses a declaration from JSON text. `source` names it in errors.
    pub fn parse(content: &str, source: &str) -> CastResult<KindDecl> {
        let raw: KindFileRaw = serde_json::from_str(content)
            .map_err(|e| CastError::malformed(source, format!("Invalid JSON: {}", e)))?;
        if raw.kind.trim().is_empty() {
            return Err(CastError::malformed(source, "Kind name is empty"));
        }
        Ok(raw.into())
    }
}
