//! Category-specific flags carried by collision entities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Obstacle subtypes the collision core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Spike,
    RotatingLaser,
    HazardZone,
    Ground,
    Wall,
    Platform,
    MovingPlatform,
    MovingAerial,
    FallingDrop,
    SlantedSurface,
}

impl ObstacleKind {
    /// Contact with the player is fatal.
    pub fn is_lethal(self) -> bool {
        matches!(self, ObstacleKind::Spike | ObstacleKind::RotatingLaser | ObstacleKind::HazardZone)
    }

    /// The resolver may push this obstacle around. Everything else is anchored to the level.
    pub fn is_movable(self) -> bool {
        matches!(
            self,
            ObstacleKind::MovingPlatform
                | ObstacleKind::MovingAerial
                | ObstacleKind::HazardZone
                | ObstacleKind::FallingDrop
        )
    }
}

/// A value in the open property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// Flags attached to an entity. The obstacle subtype and grazed flag are typed since
/// the core reads them; anything else gameplay wants to tag lives in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityProperties {
    pub obstacle: Option<ObstacleKind>,
    /// Set by the caller once a near miss with this obstacle has been scored.
    pub grazed: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, PropertyValue>,
}

impl EntityProperties {
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.extra.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.extra.insert(key.into(), value.into())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.extra.get(key) {
            Some(PropertyValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.extra.get(key) {
            Some(PropertyValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}
