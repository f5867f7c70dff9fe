//! Single-pass positional correction for overlapping entities.
//!
//! Corrections are written to a [`PositionSink`], the durable game-side records the
//! engine's entities mirror. The engine's own copies are refreshed by their owners on
//! the next tick.

use slotmap::SlotMap;

use crate::collision::CollisionInfo;
use crate::math::vec2::Vec2;
use crate::objects::{CollisionEntity, EntityHandle};

/// Durable position storage owned outside the collision core.
pub trait PositionSink {
    /// Moves the durable record backing `entity` by `delta`.
    fn translate(&mut self, entity: &CollisionEntity, delta: Vec2);
}

impl<F> PositionSink for F
where
    F: FnMut(&CollisionEntity, Vec2),
{
    fn translate(&mut self, entity: &CollisionEntity, delta: Vec2) {
        self(entity, delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    /// Extra separation beyond the penetration depth.
    pub separation_epsilon: f64,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self { separation_epsilon: 0.01 }
    }
}

impl CollisionResolver {
    pub fn new(separation_epsilon: f64) -> Self {
        Self { separation_epsilon }
    }

    /// Resolves the deepest overlaps first, each one independently and once.
    /// Three or more mutually overlapping bodies may keep some residual penetration.
    /// Returns how many contacts produced a correction.
    pub fn resolve_collisions<S: PositionSink + ?Sized>(
        &self,
        collisions: &mut [CollisionInfo],
        entities: &SlotMap<EntityHandle, CollisionEntity>,
        sink: &mut S,
    ) -> usize {
        collisions.sort_by(|a, b| b.penetration_depth.total_cmp(&a.penetration_depth));
        let resolved = collisions
            .iter()
            .filter(|info| self.resolve_collision(info, entities, &mut *sink))
            .count();
        log::trace!("Resolved {} of {} collisions", resolved, collisions.len());
        resolved
    }

    /// Pushes the two entities of `info` apart along its normal by the penetration depth
    /// plus epsilon. Both movable: each takes half. One movable: it takes all of it.
    /// Velocities are left alone; bounce response belongs to the owning gameplay system.
    pub fn resolve_collision<S: PositionSink + ?Sized>(
        &self,
        info: &CollisionInfo,
        entities: &SlotMap<EntityHandle, CollisionEntity>,
        sink: &mut S,
    ) -> bool {
        let (Some(a), Some(b)) = (entities.get(info.entity_a), entities.get(info.entity_b)) else {
            return false;
        };
        let (a_movable, b_movable) = (a.is_movable(), b.is_movable());
        if !a_movable && !b_movable {
            return false;
        }

        // Coincident centers have no direction to push along.
        let Some(normal) = info.normal.and_then(Vec2::try_normalize) else {
            log::trace!("Skipping resolution of `{}`/`{}`: no collision normal", a.id, b.id);
            return false;
        };

        let separation = normal * (info.penetration_depth.max(0.0) + self.separation_epsilon);
        match (a_movable, b_movable) {
            (true, true) => {
                sink.translate(a, -separation * 0.5);
                sink.translate(b, separation * 0.5);
            }
            (true, false) => sink.translate(a, -separation),
            _ => sink.translate(b, separation),
        }
        true
    }
}
