//! Tuning values for the collision core, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Collision tuning. Missing fields fall back to [`CollisionConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Side length of a spatial hash cell, in world units.
    pub cell_size: f64,
    /// Extra distance beyond an obstacle's half-size that still counts as a near miss.
    pub graze_distance: f64,
    /// Added to the penetration depth when separating bodies so they end strictly apart.
    pub separation_epsilon: f64,
    /// Circle radius as a fraction of the smaller side of the entity's box.
    pub circle_radius_fraction: f64,
    /// Subtracted from circle radii so contact matches the drawn sprite rather than its box.
    pub circle_visual_padding: f64,
    /// Extra reach used when collecting power-ups.
    pub pickup_radius: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            graze_distance: 30.0,
            separation_epsilon: 0.01,
            circle_radius_fraction: 0.5,
            circle_visual_padding: 2.0,
            pickup_radius: 20.0,
        }
    }
}

impl CollisionConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded collision config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "cell_size",
                reason: format!("must be positive and finite, got {}", self.cell_size),
            });
        }
        let non_negative = [
            ("graze_distance", self.graze_distance),
            ("separation_epsilon", self.separation_epsilon),
            ("circle_radius_fraction", self.circle_radius_fraction),
            ("circle_visual_padding", self.circle_visual_padding),
            ("pickup_radius", self.pickup_radius),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be non-negative and finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CollisionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CollisionConfig::from_toml_str("cell_size = 64.0\ngraze_distance = 12.5\n").unwrap();
        assert_eq!(config.cell_size, 64.0);
        assert_eq!(config.graze_distance, 12.5);
        assert_eq!(config.separation_epsilon, 0.01);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = CollisionConfig::from_toml_str("cell_size = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "cell_size", .. }));
        let err = CollisionConfig::from_toml_str("pickup_radius = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pickup_radius", .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = CollisionConfig::from_toml_str("cell_size = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = CollisionConfig { cell_size: 80.0, ..CollisionConfig::default() };
        let text = config.to_toml_string().unwrap();
        assert_eq!(CollisionConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CollisionConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
