pub mod aabb;
pub mod detection;
pub mod manifold;
pub mod priority;
pub mod spatial_hash;
pub mod swept;

// Re-export key types
pub use aabb::Aabb;
pub use detection::*;
pub use manifold::{CollisionInfo, PairKey};
pub use priority::{
    dedup_events, dispatch_events, highest_priority, sort_by_priority, CollisionEvent, CollisionResponder, EventKind,
    Priority,
};
pub use spatial_hash::{CellKey, CellRange, SpatialHash, SpatialHashStats};
pub use swept::{ray_aabb, swept_aabb, SweptHit};
