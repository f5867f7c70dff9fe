pub mod collision_engine;
pub mod resolver;

pub use collision_engine::{CollisionEngine, RaycastHit, DEFAULT_SIGHT_IGNORE};
pub use resolver::{CollisionResolver, PositionSink};
