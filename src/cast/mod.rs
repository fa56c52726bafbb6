//! Type casting and formatting engine
//!
//! - `Caster`: raw -> typed (read path)
//! - `Formatter`: typed or raw -> storage form (write path)
//! - `DefaultsProvider`: declared defaults, cast once at construction
//!
//! Null casts to an explicit null but formats to an absent field.

mod caster;
mod coerce;
mod date;
mod defaults;
mod formatter;

pub use caster::Caster;
pub use coerce::is_numeric_str;
pub use date::{resolve as resolve_date, DATETIME_FORMAT};
pub use defaults::DefaultsProvider;
pub use formatter::Formatter;
