use crate::math::vec2::Vec2;
use crate::objects::EntityHandle;

/// Unordered pair of entities, stored smaller handle first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(EntityHandle, EntityHandle);

impl PairKey {
    pub fn new(a: EntityHandle, b: EntityHandle) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn involves(&self, handle: EntityHandle) -> bool {
        self.0 == handle || self.1 == handle
    }
}

/// Stores information about one confirmed overlap between two entities.
/// Handles are non-owning; the record is only meaningful during the pass that built it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub entity_a: EntityHandle,
    pub entity_b: EntityHandle,
    /// Approximate contact point (midpoint of the two centers).
    pub contact_point: Option<Vec2>,
    /// Unit vector from A's center toward B's center.
    pub normal: Option<Vec2>,
    /// Fraction of the tested interval at which a swept contact begins.
    pub time_of_impact: Option<f64>,
    /// Estimated overlap, zero for swept contacts.
    pub penetration_depth: f64,
}

impl CollisionInfo {
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.entity_a, self.entity_b)
    }

    /// The handle on the other side of the contact from `handle`.
    pub fn other(&self, handle: EntityHandle) -> Option<EntityHandle> {
        if handle == self.entity_a {
            Some(self.entity_b)
        } else if handle == self.entity_b {
            Some(self.entity_a)
        } else {
            None
        }
    }
}
