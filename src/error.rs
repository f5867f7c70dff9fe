//! Error types for registry management and configuration loading.
//!
//! Geometry and detection never fail; degenerate input simply reports no collision.

use crate::collision::Aabb;

/// Errors raised by the collision engine's registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// An entity with this id is already registered
    #[error("entity id `{0}` is already registered")]
    DuplicateId(String),

    /// Bounds with non-finite coordinates or negative size
    #[error("entity `{id}` has invalid bounds {bounds:?}")]
    InvalidBounds { id: String, bounds: Aabb },

    /// The handle does not refer to a registered entity
    #[error("unknown entity handle")]
    UnknownEntity,
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value outside its allowed range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
