//! Schema-aware records
//!
//! A `RecordView` owns a raw attribute map. Reads cast through the schema
//! (or a registered getter), writes store raw (or go through a registered
//! setter), and serialization projects visible keys plus appends.

mod mutators;
mod serialize;
mod view;

pub use mutators::{GetMutator, MutatorTable, SetMutator};
pub use view::RecordView;
