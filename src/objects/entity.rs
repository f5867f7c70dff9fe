use serde::{Deserialize, Serialize};

use super::properties::{EntityProperties, ObstacleKind};
use crate::collision::Aabb;
use crate::config::CollisionConfig;
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, LineSegment, ShapeData};

slotmap::new_key_type! {
    /// Stable handle to an entity registered with the collision engine.
    pub struct EntityHandle;
}

/// Category tag used for filtering and event priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Obstacle,
    PowerUp,
    Particle,
    Projectile,
}

/// How a line-shaped obstacle places its segment inside its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LineGeometry {
    /// A beam from the box center out to `center + (cos, sin)(angle) * length`,
    /// cut off where it leaves the box.
    RotatingBeam { angle: f64, length: f64 },
    /// A fixed segment given as offsets from the box's top-left corner, clamped into the box.
    Slanted { start_offset: Vec2, end_offset: Vec2 },
}

/// Narrow-phase geometry an entity uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    /// Polygons are tested as their bounding rectangle.
    Polygon,
    Line(LineGeometry),
}

/// The collision view of one game object.
///
/// The bounding box is always axis-aligned, even for rotated visuals; line obstacles
/// compute their segment inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEntity {
    pub id: String,
    pub kind: EntityKind,
    pub shape: ShapeKind,
    pub bounds: Aabb,
    pub velocity: Vec2,
    pub properties: EntityProperties,
}

impl CollisionEntity {
    pub fn new(id: impl Into<String>, kind: EntityKind, shape: ShapeKind, bounds: Aabb) -> Self {
        Self {
            id: id.into(),
            kind,
            shape,
            bounds,
            velocity: Vec2::ZERO,
            properties: EntityProperties::default(),
        }
    }

    pub fn player(id: impl Into<String>, bounds: Aabb) -> Self {
        Self::new(id, EntityKind::Player, ShapeKind::Rectangle, bounds)
    }

    pub fn obstacle(id: impl Into<String>, obstacle: ObstacleKind, shape: ShapeKind, bounds: Aabb) -> Self {
        let mut entity = Self::new(id, EntityKind::Obstacle, shape, bounds);
        entity.properties.obstacle = Some(obstacle);
        entity
    }

    pub fn power_up(id: impl Into<String>, bounds: Aabb) -> Self {
        Self::new(id, EntityKind::PowerUp, ShapeKind::Circle, bounds)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn obstacle_kind(&self) -> Option<ObstacleKind> {
        match self.kind {
            EntityKind::Obstacle => self.properties.obstacle,
            _ => None,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Default filter: same categories never collide, and particles collide with nothing.
    pub fn can_collide_with(&self, other: &CollisionEntity) -> bool {
        if self.kind == EntityKind::Particle || other.kind == EntityKind::Particle {
            return false;
        }
        self.kind != other.kind
    }

    /// Whether the resolver may move this entity. Players, power-ups and projectiles
    /// always can; obstacles only for a few moving subtypes.
    pub fn is_movable(&self) -> bool {
        match self.kind {
            EntityKind::Player | EntityKind::PowerUp | EntityKind::Projectile => true,
            EntityKind::Obstacle => self.properties.obstacle.is_some_and(ObstacleKind::is_movable),
            EntityKind::Particle => false,
        }
    }

    /// Builds narrow-phase geometry from the current bounds.
    ///
    /// Line segments never leave the bounding box, since the broad phase only knows the box.
    pub fn create_shape_data(&self, config: &CollisionConfig) -> ShapeData {
        match self.shape {
            ShapeKind::Rectangle | ShapeKind::Polygon => ShapeData::Rectangle(self.bounds),
            ShapeKind::Circle => ShapeData::Circle(Circle::from_bounds(
                self.bounds,
                config.circle_radius_fraction,
                config.circle_visual_padding,
            )),
            ShapeKind::Line(LineGeometry::RotatingBeam { angle, length }) => {
                let start = self.bounds.center();
                let direction = Vec2::from_angle(angle);
                let reach = reach_to_edge(&self.bounds, direction).min(length.max(0.0));
                let end = self.bounds.clamp_point(start + direction * reach);
                ShapeData::Line(LineSegment::new(self.bounds, start, end))
            }
            ShapeKind::Line(LineGeometry::Slanted { start_offset, end_offset }) => {
                let origin = self.bounds.min;
                ShapeData::Line(LineSegment::new(
                    self.bounds,
                    self.bounds.clamp_point(origin + start_offset),
                    self.bounds.clamp_point(origin + end_offset),
                ))
            }
        }
    }

    /// Rotates a beam obstacle in place. Other shapes are left untouched.
    pub fn set_beam_angle(&mut self, new_angle: f64) {
        if let ShapeKind::Line(LineGeometry::RotatingBeam { angle, .. }) = &mut self.shape {
            *angle = new_angle;
        }
    }

    /// Bounds with non-finite coordinates or negative size are rejected at registration.
    pub fn has_valid_bounds(&self) -> bool {
        self.bounds.is_well_formed()
    }
}

/// Distance from the center of `bounds` to its edge along the unit `direction`.
fn reach_to_edge(bounds: &Aabb, direction: Vec2) -> f64 {
    if !direction.is_finite() {
        return 0.0;
    }
    let along = |half: f64, d: f64| if d == 0.0 { f64::INFINITY } else { half / d.abs() };
    along(bounds.width() / 2.0, direction.x).min(along(bounds.height() / 2.0, direction.y))
}
