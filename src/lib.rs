//! Collision core for a 2D side-scrolling arcade game.
//!
//! Entities are registered with a [`CollisionEngine`], mirrored into a uniform
//! [`SpatialHash`](collision::SpatialHash) for broad-phase culling, and tested pairwise with
//! exact rectangle, circle and segment predicates. Results come back as prioritized
//! [`CollisionEvent`]s; overlapping bodies can be pushed apart through a [`PositionSink`].

pub mod collision;
pub mod config;
pub mod error;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{Aabb, CollisionEvent, CollisionInfo, EventKind, Priority};
pub use config::CollisionConfig;
pub use error::{CollisionError, ConfigError};
pub use math::vec2::Vec2;
pub use objects::{CollisionEntity, EntityHandle, EntityKind, ObstacleKind, ShapeKind};
pub use shapes::{Circle, LineSegment, ShapeData};
pub use world::{CollisionEngine, CollisionResolver, PositionSink};
