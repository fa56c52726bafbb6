//! Attribute values on both sides of the conversion layer
//!
//! - `RawValue`: loosely-typed, as read from storage or user input
//! - `TypedValue`: what the caster hands to application code
//! - `ObjectId`, `UtcDateTime`: opaque store-owned value types

mod ids;
mod json;
mod raw;
mod typed;

pub use ids::{ObjectId, UtcDateTime};
pub use raw::RawValue;
pub use typed::TypedValue;
