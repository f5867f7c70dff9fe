//! Event severity and the helpers gameplay code uses to consume event lists.

use std::ops::ControlFlow;
use std::time::Instant;

use rustc_hash::FxHashSet;

use super::manifold::{CollisionInfo, PairKey};
use crate::objects::{CollisionEntity, EntityKind};

/// Coarse severity of a contact. Ordered so that `Critical` compares greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Player against a lethal hazard is critical, against any other obstacle high;
    /// anything involving a power-up is medium; everything else is low.
    pub fn classify(a: &CollisionEntity, b: &CollisionEntity) -> Priority {
        let player_vs_obstacle = match (a.kind, b.kind) {
            (EntityKind::Player, EntityKind::Obstacle) => Some(b),
            (EntityKind::Obstacle, EntityKind::Player) => Some(a),
            _ => None,
        };
        if let Some(obstacle) = player_vs_obstacle {
            return if obstacle.obstacle_kind().is_some_and(|k| k.is_lethal()) {
                Priority::Critical
            } else {
                Priority::High
            };
        }
        if a.kind == EntityKind::PowerUp || b.kind == EntityKind::PowerUp {
            return Priority::Medium;
        }
        Priority::Low
    }
}

/// What produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Geometric overlap, static or swept.
    Collision,
    /// Near miss between the player and an obstacle.
    Graze,
    /// Player within collection range of a power-up.
    Pickup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub info: CollisionInfo,
    pub priority: Priority,
    pub kind: EventKind,
    pub timestamp: Instant,
}

impl CollisionEvent {
    pub fn new(info: CollisionInfo, priority: Priority, kind: EventKind) -> Self {
        Self { info, priority, kind, timestamp: Instant::now() }
    }

    pub fn pair_key(&self) -> PairKey {
        self.info.pair_key()
    }
}

/// Stable sort, most severe first.
pub fn sort_by_priority(events: &mut [CollisionEvent]) {
    events.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Keeps one event per unordered pair, the most severe one. The result is in priority order.
pub fn dedup_events(mut events: Vec<CollisionEvent>) -> Vec<CollisionEvent> {
    sort_by_priority(&mut events);
    let mut seen = FxHashSet::default();
    events.retain(|event| seen.insert(event.pair_key()));
    events
}

pub fn highest_priority(events: &[CollisionEvent]) -> Option<Priority> {
    events.iter().map(|e| e.priority).max()
}

/// Gameplay-side consumer of collision events (damage, scoring, effects).
pub trait CollisionResponder {
    /// Handles one event. Returning `ControlFlow::Break` skips the remaining events,
    /// e.g. after a lethal hit ends the run.
    fn on_event(&mut self, event: &CollisionEvent) -> ControlFlow<()>;
}

impl<F> CollisionResponder for F
where
    F: FnMut(&CollisionEvent) -> ControlFlow<()>,
{
    fn on_event(&mut self, event: &CollisionEvent) -> ControlFlow<()> {
        self(event)
    }
}

/// Sorts `events` by priority and feeds them to `responder` until it breaks.
/// Returns how many events were delivered.
pub fn dispatch_events<R: CollisionResponder + ?Sized>(events: &mut [CollisionEvent], responder: &mut R) -> usize {
    sort_by_priority(events);
    let mut delivered = 0;
    for event in events.iter() {
        delivered += 1;
        if responder.on_event(event).is_break() {
            break;
        }
    }
    delivered
}
