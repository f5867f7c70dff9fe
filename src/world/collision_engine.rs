use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::collision::{
    ray_aabb, shapes_intersect, swept_aabb, Aabb, CollisionEvent, CollisionInfo, EventKind, PairKey, Priority,
    SpatialHash, SpatialHashStats,
};
use crate::config::CollisionConfig;
use crate::error::{CollisionError, ConfigError};
use crate::math::vec2::Vec2;
use crate::objects::{CollisionEntity, EntityHandle, EntityKind, EntityProperties};
use crate::shapes::{LineSegment, ShapeData};
use crate::world::resolver::{CollisionResolver, PositionSink};

/// Entity kinds line-of-sight checks look through unless told otherwise.
pub const DEFAULT_SIGHT_IGNORE: &[EntityKind] = &[EntityKind::Particle];

/// Closest entity hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: EntityHandle,
    pub distance: f64,
    pub point: Vec2,
}

/// Registry of live collidable entities plus the broad-phase grid mirroring them.
///
/// All queries run synchronously within the calling tick. Scratch buffers are reused
/// between calls, so detection takes `&mut self`.
pub struct CollisionEngine {
    config: CollisionConfig,
    entities: SlotMap<EntityHandle, CollisionEntity>,
    ids: FxHashMap<String, EntityHandle>,
    spatial_hash: SpatialHash<EntityHandle>,
    resolver: CollisionResolver,

    // Pairs already handled during the current detection call
    processed_pairs: FxHashSet<PairKey>,
    // Temporary storage to avoid allocations during broad-phase queries
    candidates: Vec<EntityHandle>,
}

impl CollisionEngine {
    /// Creates an empty engine after validating `config`.
    pub fn new(config: CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!("Creating CollisionEngine: cell_size={}", config.cell_size);
        Ok(Self::with_validated_config(config))
    }

    fn with_validated_config(config: CollisionConfig) -> Self {
        Self {
            spatial_hash: SpatialHash::new(config.cell_size),
            resolver: CollisionResolver::new(config.separation_epsilon),
            config,
            entities: SlotMap::with_key(),
            ids: FxHashMap::default(),
            processed_pairs: FxHashSet::default(),
            candidates: Vec::new(),
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    // --- Registry ---

    /// Registers an entity and mirrors it into the spatial hash.
    pub fn add_entity(&mut self, entity: CollisionEntity) -> Result<EntityHandle, CollisionError> {
        if !entity.has_valid_bounds() {
            log::warn!("Rejecting entity `{}` with invalid bounds {:?}", entity.id, entity.bounds);
            return Err(CollisionError::InvalidBounds { id: entity.id, bounds: entity.bounds });
        }
        if self.ids.contains_key(&entity.id) {
            return Err(CollisionError::DuplicateId(entity.id));
        }

        let bounds = entity.bounds;
        let id = entity.id.clone();
        let handle = self.entities.insert(entity);
        self.spatial_hash.insert(handle, &bounds);
        log::debug!("Added entity `{}` ({} registered)", id, self.entities.len());
        self.ids.insert(id, handle);
        Ok(handle)
    }

    /// Unregisters an entity. Unknown handles are a no-op returning `None`.
    pub fn remove_entity(&mut self, handle: EntityHandle) -> Option<CollisionEntity> {
        let entity = self.entities.remove(handle)?;
        self.ids.remove(&entity.id);
        self.spatial_hash.remove(handle);
        self.processed_pairs.retain(|pair| !pair.involves(handle));
        log::debug!("Removed entity `{}` ({} registered)", entity.id, self.entities.len());
        Some(entity)
    }

    pub fn remove_entity_by_id(&mut self, id: &str) -> Option<CollisionEntity> {
        let handle = self.handle_of(id)?;
        self.remove_entity(handle)
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.ids.clear();
        self.spatial_hash.clear();
        self.processed_pairs.clear();
        log::debug!("Cleared all entities");
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&CollisionEntity> {
        self.entities.get(handle)
    }

    pub fn handle_of(&self, id: &str) -> Option<EntityHandle> {
        self.ids.get(id).copied()
    }

    pub fn entities(&self) -> &SlotMap<EntityHandle, CollisionEntity> {
        &self.entities
    }

    pub fn get_entities_by_type(&self, kind: EntityKind) -> impl Iterator<Item = (EntityHandle, &CollisionEntity)> + '_ {
        self.entities.iter().filter(move |(_, entity)| entity.kind == kind)
    }

    /// Moves an entity in place. The spatial hash is only touched when the set of
    /// occupied cells changes. Rejected bounds leave the entity where it was.
    pub fn update_entity_bounds(&mut self, handle: EntityHandle, bounds: Aabb) -> Result<(), CollisionError> {
        let entity = self.entities.get_mut(handle).ok_or(CollisionError::UnknownEntity)?;
        if !bounds.is_well_formed() {
            log::warn!("Ignoring invalid bounds {:?} for `{}`", bounds, entity.id);
            return Err(CollisionError::InvalidBounds { id: entity.id.clone(), bounds });
        }
        entity.bounds = bounds;
        self.spatial_hash.update(handle, &bounds);
        Ok(())
    }

    pub fn set_velocity(&mut self, handle: EntityHandle, velocity: Vec2) -> Result<(), CollisionError> {
        let entity = self.entities.get_mut(handle).ok_or(CollisionError::UnknownEntity)?;
        entity.velocity = velocity;
        Ok(())
    }

    /// Rotates a beam obstacle's segment. Has no effect on other shapes.
    pub fn set_beam_angle(&mut self, handle: EntityHandle, angle: f64) -> Result<(), CollisionError> {
        let entity = self.entities.get_mut(handle).ok_or(CollisionError::UnknownEntity)?;
        entity.set_beam_angle(angle);
        Ok(())
    }

    pub fn properties_mut(&mut self, handle: EntityHandle) -> Option<&mut EntityProperties> {
        self.entities.get_mut(handle).map(|entity| &mut entity.properties)
    }

    /// Flags an obstacle as grazed so later grazing passes skip it.
    /// Returns `false` if it was already flagged or the handle is unknown.
    pub fn mark_grazed(&mut self, handle: EntityHandle) -> bool {
        match self.properties_mut(handle) {
            Some(props) if !props.grazed => {
                props.grazed = true;
                true
            }
            _ => false,
        }
    }

    pub fn debug_stats(&self) -> SpatialHashStats {
        self.spatial_hash.stats()
    }

    // --- Detection ---

    /// Finds every overlapping pair that is allowed to collide, once per unordered pair.
    /// Has no side effects on entity state.
    pub fn detect_collisions(&mut self) -> Vec<CollisionEvent> {
        self.run_detection(None)
    }

    /// Runs [`CollisionEngine::detect_collisions`] and pushes overlapping bodies apart,
    /// writing corrections to `sink`.
    pub fn detect_and_resolve_collisions<S: PositionSink + ?Sized>(&mut self, sink: &mut S) -> Vec<CollisionEvent> {
        let mut infos = Vec::new();
        let events = self.run_detection(Some(&mut infos));
        self.resolver.resolve_collisions(&mut infos, &self.entities, sink);
        events
    }

    fn run_detection(&mut self, mut infos: Option<&mut Vec<CollisionInfo>>) -> Vec<CollisionEvent> {
        self.processed_pairs.clear();
        let mut events = Vec::new();
        let mut candidates = std::mem::take(&mut self.candidates);

        for (handle, entity) in &self.entities {
            self.spatial_hash.query_into(&entity.bounds, &mut candidates);
            for &other_handle in &candidates {
                if other_handle == handle || !self.processed_pairs.insert(PairKey::new(handle, other_handle)) {
                    continue;
                }
                let Some(other) = self.entities.get(other_handle) else {
                    continue;
                };
                if !entity.can_collide_with(other) {
                    continue;
                }
                if let Some(info) = overlap_info(&self.config, handle, entity, other_handle, other) {
                    if let Some(infos) = infos.as_deref_mut() {
                        infos.push(info);
                    }
                    events.push(CollisionEvent::new(info, Priority::classify(entity, other), EventKind::Collision));
                }
            }
        }

        self.candidates = candidates;
        log::trace!("detect_collisions: {} entities, {} events", self.entities.len(), events.len());
        events
    }

    /// Continuous detection for moving entities over a step of `dt`.
    ///
    /// Only entities with non-zero velocity drive the search. Each pair is swept with the
    /// relative velocity; pairs moving in lockstep fall back to the static test.
    pub fn detect_swept_collisions(&mut self, dt: f64) -> Vec<CollisionEvent> {
        self.processed_pairs.clear();
        let mut events = Vec::new();
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("detect_swept_collisions called with invalid dt {}", dt);
            return events;
        }

        // Any partner's own travel fits inside this margin.
        let max_travel = self.entities.values().filter_map(|e| travel(e, dt)).fold(0.0, f64::max);

        let mut candidates = std::mem::take(&mut self.candidates);
        for (handle, entity) in &self.entities {
            if entity.velocity.is_zero() {
                continue;
            }
            if travel(entity, dt).is_none() {
                log::warn!("Skipping swept test for `{}`: velocity {:?} overflows over dt {}", entity.id, entity.velocity, dt);
                continue;
            }

            let mut sweep = entity.bounds;
            sweep.merge(&entity.bounds.translated(entity.velocity * dt));
            let query = sweep.expanded(max_travel);
            if !query.is_finite() {
                log::warn!("Skipping swept test for `{}`: sweep leaves the representable range", entity.id);
                continue;
            }
            self.spatial_hash.query_into(&query, &mut candidates);

            for &other_handle in &candidates {
                if other_handle == handle || !self.processed_pairs.insert(PairKey::new(handle, other_handle)) {
                    continue;
                }
                let Some(other) = self.entities.get(other_handle) else {
                    continue;
                };
                if !entity.can_collide_with(other) {
                    continue;
                }

                let relative = entity.velocity - other.velocity;
                let info = if relative.is_zero() {
                    overlap_info(&self.config, handle, entity, other_handle, other)
                } else {
                    swept_aabb(&entity.bounds, relative, &other.bounds, dt).map(|hit| {
                        let center_a = entity.center() + entity.velocity * hit.time;
                        let center_b = other.center() + other.velocity * hit.time;
                        CollisionInfo {
                            entity_a: handle,
                            entity_b: other_handle,
                            contact_point: Some(center_a.midpoint(center_b)),
                            normal: Some(hit.normal),
                            time_of_impact: Some(hit.time / dt),
                            penetration_depth: 0.0,
                        }
                    })
                };

                if let Some(info) = info {
                    events.push(CollisionEvent::new(info, Priority::classify(entity, other), EventKind::Collision));
                }
            }
        }

        self.candidates = candidates;
        log::trace!("detect_swept_collisions: dt={}, {} events", dt, events.len());
        events
    }

    /// Near misses between players and obstacles.
    ///
    /// An obstacle counts as grazed when its center is closer to the player's center than
    /// half its larger side plus `distance`, it is not actually colliding, and its grazed
    /// flag is unset. This pass never sets the flag: callers must call
    /// [`CollisionEngine::mark_grazed`] after scoring, or the same near miss fires again
    /// next tick.
    pub fn detect_grazing(&mut self, distance: f64) -> Vec<CollisionEvent> {
        let colliding: FxHashSet<PairKey> = self.detect_collisions().iter().map(CollisionEvent::pair_key).collect();

        let mut events = Vec::new();
        for (player_handle, player) in self.get_entities_by_type(EntityKind::Player) {
            for (obstacle_handle, obstacle) in self.get_entities_by_type(EntityKind::Obstacle) {
                if obstacle.properties.grazed || colliding.contains(&PairKey::new(player_handle, obstacle_handle)) {
                    continue;
                }
                let (pc, oc) = (player.center(), obstacle.center());
                if pc.distance(oc) < obstacle.bounds.half_max_extent() + distance {
                    let info = CollisionInfo {
                        entity_a: player_handle,
                        entity_b: obstacle_handle,
                        contact_point: Some(pc.midpoint(oc)),
                        normal: Some((oc - pc).normalize()),
                        time_of_impact: None,
                        penetration_depth: 0.0,
                    };
                    events.push(CollisionEvent::new(info, Priority::Low, EventKind::Graze));
                }
            }
        }
        log::trace!("detect_grazing: {} near misses", events.len());
        events
    }

    /// [`CollisionEngine::detect_grazing`] with the configured graze distance.
    pub fn detect_grazing_default(&mut self) -> Vec<CollisionEvent> {
        self.detect_grazing(self.config.graze_distance)
    }

    /// Power-ups within reach of a player. Collection uses a center-distance test larger
    /// than the power-up's own shape, so it is separate from the narrow phase.
    pub fn detect_pickups(&mut self, collection_radius: f64) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        for (player_handle, player) in self.get_entities_by_type(EntityKind::Player) {
            for (power_handle, power_up) in self.get_entities_by_type(EntityKind::PowerUp) {
                if !player.can_collide_with(power_up) {
                    continue;
                }
                let (pc, uc) = (player.center(), power_up.center());
                let reach = power_up.bounds.half_max_extent() + player.bounds.half_min_extent() + collection_radius;
                if pc.distance(uc) < reach {
                    let info = CollisionInfo {
                        entity_a: player_handle,
                        entity_b: power_handle,
                        contact_point: Some(pc.midpoint(uc)),
                        normal: Some((uc - pc).normalize()),
                        time_of_impact: None,
                        penetration_depth: 0.0,
                    };
                    events.push(CollisionEvent::new(info, Priority::Medium, EventKind::Pickup));
                }
            }
        }
        events
    }

    // --- Queries ---

    /// Whether the segment `from`-`to` reaches its end without crossing any entity's
    /// shape. Entities whose kind is in `ignore` (default: particles) are looked through.
    pub fn has_line_of_sight(&mut self, from: Vec2, to: Vec2, ignore: Option<&[EntityKind]>) -> bool {
        let ignore = ignore.unwrap_or(DEFAULT_SIGHT_IGNORE);
        let sight = ShapeData::Line(LineSegment::between(from, to));

        let mut candidates = std::mem::take(&mut self.candidates);
        self.spatial_hash.query_into(&sight.bounds(), &mut candidates);
        let blocked = candidates.iter().filter_map(|h| self.entities.get(*h)).any(|entity| {
            !ignore.contains(&entity.kind) && shapes_intersect(&sight, &entity.create_shape_data(&self.config))
        });
        self.candidates = candidates;
        !blocked
    }

    /// Casts a ray from `origin` along `direction` and returns the nearest entity box it
    /// hits within `max_distance`, optionally only considering `target` kinds.
    pub fn raycast(
        &mut self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f64,
        target: Option<EntityKind>,
    ) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;
        if !origin.is_finite() || !(max_distance.is_finite() && max_distance >= 0.0) {
            return None;
        }
        let ray_bounds = Aabb::new(origin, origin + direction * max_distance);

        let mut candidates = std::mem::take(&mut self.candidates);
        self.spatial_hash.query_into(&ray_bounds, &mut candidates);
        let mut closest: Option<RaycastHit> = None;
        for &handle in &candidates {
            let Some(entity) = self.entities.get(handle) else {
                continue;
            };
            if target.is_some_and(|kind| kind != entity.kind) {
                continue;
            }
            if let Some(distance) = ray_aabb(origin, direction, max_distance, &entity.bounds) {
                if closest.map_or(true, |best| distance < best.distance) {
                    closest = Some(RaycastHit { entity: handle, distance, point: origin + direction * distance });
                }
            }
        }
        self.candidates = candidates;
        closest
    }
}

impl Default for CollisionEngine {
    fn default() -> Self {
        Self::with_validated_config(CollisionConfig::default())
    }
}

/// Distance `entity` covers over `dt`, or `None` when it is not representable.
fn travel(entity: &CollisionEntity, dt: f64) -> Option<f64> {
    let distance = entity.velocity.magnitude() * dt;
    distance.is_finite().then_some(distance)
}

/// Narrow-phase test plus the approximate contact data.
///
/// Penetration treats every shape as having a "radius" of half its smaller box side, and
/// the contact point is the midpoint of the two centers. Both are deliberate approximations.
fn overlap_info(
    config: &CollisionConfig,
    handle_a: EntityHandle,
    a: &CollisionEntity,
    handle_b: EntityHandle,
    b: &CollisionEntity,
) -> Option<CollisionInfo> {
    if !shapes_intersect(&a.create_shape_data(config), &b.create_shape_data(config)) {
        return None;
    }
    let (center_a, center_b) = (a.center(), b.center());
    let distance = center_a.distance(center_b);
    let penetration = (a.bounds.half_min_extent() + b.bounds.half_min_extent() - distance).max(0.0);
    Some(CollisionInfo {
        entity_a: handle_a,
        entity_b: handle_b,
        contact_point: Some(center_a.midpoint(center_b)),
        normal: Some((center_b - center_a).normalize()),
        time_of_impact: None,
        penetration_depth: penetration,
    })
}
