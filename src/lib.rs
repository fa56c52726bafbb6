//! doccast - Schema-driven attribute casting for document records
//!
//! Records keep a raw attribute map. Reads cast values to the declared
//! field type, writes format them to their storage form, and
//! serialization projects the visible attributes.

pub mod cast;
pub mod errors;
pub mod observability;
pub mod record;
pub mod schema;
pub mod value;

pub use cast::{Caster, DefaultsProvider, Formatter};
pub use errors::{CastError, CastResult};
pub use record::RecordView;
pub use schema::{FieldDecl, KindDecl, SchemaConfig, SchemaLoader, SchemaRegistry, TypeSpec};
pub use value::{ObjectId, RawValue, TypedValue, UtcDateTime};
