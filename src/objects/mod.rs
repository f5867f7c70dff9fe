pub mod entity;
pub mod properties;

pub use entity::{CollisionEntity, EntityHandle, EntityKind, LineGeometry, ShapeKind};
pub use properties::{EntityProperties, ObstacleKind, PropertyValue};
