//! Schema declarations for record kinds
//!
//! # Design Principles
//!
//! - Descriptors are parsed once, when the registry is built
//! - A nested kind must be declared, and kinds never nest themselves
//! - The registry is immutable once built
//! - Omitted field parts are filled from `SchemaConfig`

mod config;
mod entry;
mod loader;
mod registry;
mod types;

pub use config::SchemaConfig;
pub use entry::{normalize, FieldDecl, SchemaEntry};
pub use loader::SchemaLoader;
pub use registry::{KindDecl, RecordKind, SchemaRegistry, SchemaRegistryBuilder};
pub use types::{Primitive, TypeSpec};
