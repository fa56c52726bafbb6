//! Schema declaration policy
//!
//! The default policy is permissive: a field that omits its type is an
//! `int` field and does not allow null. That is easy to trip over, so
//! `SchemaConfig::strict()` turns a missing type into a declaration error.

/// Policy applied when normalizing field declarations.
///
/// Fixed once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Descriptor used when a field omits its type.
    pub default_type: String,
    /// Nullability used when a field omits `allow_null`.
    pub default_allow_null: bool,
    /// Reject fields without a type instead of applying `default_type`.
    pub require_type: bool,
    /// Maximum nesting depth walked by cast, format and defaults.
    pub max_depth: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            default_type: "int".to_string(),
            default_allow_null: false,
            require_type: false,
            max_depth: 64,
        }
    }
}

impl SchemaConfig {
    /// Permissive policy (the default).
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Every field must declare its type.
    pub fn strict() -> Self {
        Self {
            require_type: true,
            ..Self::default()
        }
    }

    /// Override the recursion bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
