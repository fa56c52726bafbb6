//! Record kind declarations and the registry they are resolved into
//!
//! Kinds are declared up front on a `SchemaRegistryBuilder`. `build()`
//! parses every descriptor, rejects nesting cycles and freezes the result.
//! There is no runtime schema mutation after that.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::config::SchemaConfig;
use super::entry::{normalize, FieldDecl, SchemaEntry};
use crate::errors::{CastError, CastResult};
use crate::observability::{log_event_with_fields, Event};
use crate::record::{GetMutator, MutatorTable, SetMutator};

/// A record kind as declared, before descriptors are resolved
#[derive(Debug, Clone)]
pub struct KindDecl {
    pub name: String,
    pub fields: IndexMap<String, FieldDecl>,
    /// Fields accepted from external input on construction
    pub fillable: Vec<String>,
    /// When non-empty, only these fields serialize
    pub visible: Vec<String>,
    /// Fields never serialized
    pub hidden: Vec<String>,
    /// Computed fields always serialized, resolved through getters
    pub appends: Vec<String>,
    pub mutators: MutatorTable,
}

impl KindDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            fillable: Vec::new(),
            visible: Vec::new(),
            hidden: Vec::new(),
            appends: Vec::new(),
            mutators: MutatorTable::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, decl: FieldDecl) -> Self {
        self.fields.insert(name.into(), decl);
        self
    }

    pub fn fillable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fillable.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn visible<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn hidden<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn appends<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.appends.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn getter(mut self, field: impl Into<String>, getter: GetMutator) -> Self {
        self.mutators.set_getter(field, getter);
        self
    }

    pub fn setter(mut self, field: impl Into<String>, setter: SetMutator) -> Self {
        self.mutators.set_setter(field, setter);
        self
    }
}

/// A resolved, immutable record kind
#[derive(Debug)]
pub struct RecordKind {
    name: String,
    fields: IndexMap<String, SchemaEntry>,
    fillable: IndexSet<String>,
    visible: IndexSet<String>,
    hidden: IndexSet<String>,
    appends: Vec<String>,
    mutators: MutatorTable,
}

impl RecordKind {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field schemas in declaration order
    pub fn fields(&self) -> &IndexMap<String, SchemaEntry> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SchemaEntry> {
        self.fields.get(name)
    }

    pub fn is_fillable(&self, field: &str) -> bool {
        self.fillable.contains(field)
    }

    pub fn visible(&self) -> &IndexSet<String> {
        &self.visible
    }

    pub fn hidden(&self) -> &IndexSet<String> {
        &self.hidden
    }

    pub fn appends(&self) -> &[String] {
        &self.appends
    }

    pub fn mutators(&self) -> &MutatorTable {
        &self.mutators
    }
}

/// Collects kind declarations until `build()`
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    config: SchemaConfig,
    decls: IndexMap<String, KindDecl>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            config,
            decls: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Adds a declaration. Kind names are unique.
    pub fn register(&mut self, decl: KindDecl) -> CastResult<()> {
        if self.decls.contains_key(&decl.name) {
            return Err(CastError::DuplicateKind(decl.name));
        }
        self.decls.insert(decl.name.clone(), decl);
        Ok(())
    }

    /// Chaining form of `register`
    pub fn declare(mut self, decl: KindDecl) -> CastResult<Self> {
        self.register(decl)?;
        Ok(self)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Resolves every declaration.
    ///
    /// # Errors
    ///
    /// - `InvalidSchemaType` / `MissingFieldType` for a bad field
    /// - `CyclicSchema` when a kind nests itself, directly or transitively
    pub fn build(self) -> CastResult<Arc<SchemaRegistry>> {
        let is_kind = |name: &str| self.decls.contains_key(name);
        let mut kinds = IndexMap::with_capacity(self.decls.len());

        for decl in self.decls.values() {
            let mut fields = IndexMap::with_capacity(decl.fields.len());
            for (field, field_decl) in &decl.fields {
                let entry = normalize(&decl.name, field, field_decl, &self.config, &is_kind)
                    .map_err(|err| {
                        log_event_with_fields(
                            Event::SchemaRejected,
                            &[
                                ("code", err.code()),
                                ("field", field.as_str()),
                                ("kind", decl.name.as_str()),
                            ],
                        );
                        err
                    })?;
                fields.insert(field.clone(), entry);
            }

            let kind = RecordKind {
                name: decl.name.clone(),
                fields,
                fillable: decl.fillable.iter().cloned().collect(),
                visible: decl.visible.iter().cloned().collect(),
                hidden: decl.hidden.iter().cloned().collect(),
                appends: decl.appends.clone(),
                mutators: decl.mutators.clone(),
            };
            kinds.insert(decl.name.clone(), Arc::new(kind));
        }

        check_acyclic(&kinds).map_err(|err| {
            log_event_with_fields(Event::SchemaRejected, &[("code", err.code())]);
            err
        })?;

        for kind in kinds.values() {
            let field_count = kind.fields.len().to_string();
            log_event_with_fields(
                Event::SchemaRegistered,
                &[("fields", field_count.as_str()), ("kind", kind.name.as_str())],
            );
        }

        Ok(Arc::new(SchemaRegistry {
            config: self.config,
            kinds,
        }))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

fn check_acyclic(kinds: &IndexMap<String, Arc<RecordKind>>) -> CastResult<()> {
    let mut marks = HashMap::new();
    let mut stack = Vec::new();
    for name in kinds.keys() {
        visit(name, kinds, &mut marks, &mut stack)?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a str,
    kinds: &'a IndexMap<String, Arc<RecordKind>>,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
) -> CastResult<()> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|k| *k == name).unwrap_or(0);
            let mut path: Vec<&str> = stack[start..].to_vec();
            path.push(name);
            return Err(CastError::CyclicSchema {
                path: path.join(" -> "),
            });
        }
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    stack.push(name);

    if let Some(kind) = kinds.get(name) {
        for entry in kind.fields.values() {
            if let Some(child) = entry.type_spec.nested_kind() {
                visit(child, kinds, marks, stack)?;
            }
        }
    }

    stack.pop();
    marks.insert(name, Mark::Done);
    Ok(())
}

/// Resolved record kinds keyed by name
#[derive(Debug)]
pub struct SchemaRegistry {
    config: SchemaConfig,
    kinds: IndexMap<String, Arc<RecordKind>>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Looks up a kind by name.
    pub fn kind(&self, name: &str) -> CastResult<&Arc<RecordKind>> {
        self.kinds
            .get(name)
            .ok_or_else(|| CastError::UnknownKind(name.to_string()))
    }

    /// Field schemas of a kind. Empty when the kind declares no fields.
    pub fn schema_of(&self, name: &str) -> CastResult<&IndexMap<String, SchemaEntry>> {
        self.kind(name).map(|kind| kind.fields())
    }

    pub fn field(&self, kind: &str, field: &str) -> Option<&SchemaEntry> {
        self.kinds.get(kind).and_then(|k| k.field(field))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Kind names in declaration order
    pub fn kind_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{Primitive, TypeSpec};

    fn avatar() -> KindDecl {
        KindDecl::new("Avatar")
            .field("url", FieldDecl::of("string"))
            .field("width", FieldDecl::of("int"))
            .field("height", FieldDecl::of("int"))
    }

    #[test]
    fn test_build_resolves_nested_references() {
        let registry = SchemaRegistry::builder()
            .declare(KindDecl::new("User").field("avatars", FieldDecl::of("array(Avatar)")))
            .unwrap()
            .declare(avatar())
            .unwrap()
            .build()
            .unwrap();

        let entry = registry.field("User", "avatars").unwrap();
        assert_eq!(
            entry.type_spec,
            TypeSpec::Array(Box::new(TypeSpec::Nested("Avatar".into())))
        );
        assert_eq!(registry.kind_names().collect::<Vec<_>>(), vec!["User", "Avatar"]);
    }

    #[test]
    fn test_schema_of_empty_and_unknown() {
        let registry = SchemaRegistry::builder()
            .declare(KindDecl::new("Empty"))
            .unwrap()
            .build()
            .unwrap();

        assert!(registry.schema_of("Empty").unwrap().is_empty());
        assert_eq!(
            registry.schema_of("Missing").unwrap_err(),
            CastError::UnknownKind("Missing".into())
        );
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut builder = SchemaRegistry::builder();
        builder.register(avatar()).unwrap();
        let err = builder.register(avatar()).unwrap_err();
        assert_eq!(err, CastError::DuplicateKind("Avatar".into()));
    }

    #[test]
    fn test_unknown_reference_fails_at_build() {
        let err = SchemaRegistry::builder()
            .declare(KindDecl::new("User").field("avatar", FieldDecl::of("Avatar")))
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err, CastError::invalid_type("Avatar"));
    }

    #[test]
    fn test_direct_cycle_rejected() {
        let err = SchemaRegistry::builder()
            .declare(KindDecl::new("Node").field("children", FieldDecl::of("array(Node)")))
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CastError::CyclicSchema {
                path: "Node -> Node".into()
            }
        );
    }

    #[test]
    fn test_transitive_cycle_rejected() {
        let err = SchemaRegistry::builder()
            .declare(KindDecl::new("A").field("b", FieldDecl::of("B")))
            .unwrap()
            .declare(KindDecl::new("B").field("c", FieldDecl::of("array(array(C))")))
            .unwrap()
            .declare(KindDecl::new("C").field("a", FieldDecl::of("A")))
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CastError::CyclicSchema {
                path: "A -> B -> C -> A".into()
            }
        );
    }

    #[test]
    fn test_shared_child_is_not_a_cycle() {
        let registry = SchemaRegistry::builder()
            .declare(
                KindDecl::new("Profile")
                    .field("small", FieldDecl::of("Avatar"))
                    .field("large", FieldDecl::of("Avatar")),
            )
            .unwrap()
            .declare(avatar())
            .unwrap()
            .build();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_kind_visibility_config() {
        let registry = SchemaRegistry::builder()
            .declare(
                KindDecl::new("User")
                    .field("age", FieldDecl::new())
                    .fillable(["age"])
                    .hidden(["password"])
                    .appends(["label"]),
            )
            .unwrap()
            .build()
            .unwrap();

        let kind = registry.kind("User").unwrap();
        assert!(kind.is_fillable("age"));
        assert!(!kind.is_fillable("password"));
        assert!(kind.hidden().contains("password"));
        assert_eq!(kind.appends(), ["label".to_string()]);
        assert_eq!(
            kind.field("age").unwrap().type_spec,
            TypeSpec::Primitive(Primitive::Int)
        );
    }
}
