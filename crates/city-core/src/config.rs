//! Layout configuration.
//!
//! All tunable constants are loaded from a TOML file; every field has a
//! compiled-in default so a missing file or a partial file both work.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::grid::GridLayout;

/// Complete layout configuration for one scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Grid geometry
    #[serde(default)]
    pub grid: GridConfig,
    /// Autonomous agent population and kinematics
    #[serde(default)]
    pub traffic: TrafficConfig,
    /// Camera framing and flight settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Progressive disclosure settings
    #[serde(default)]
    pub disclosure: DisclosureConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            traffic: TrafficConfig::default(),
            camera: CameraConfig::default(),
            disclosure: DisclosureConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::TomlError)
    }

    /// The grid layout described by this configuration.
    pub fn grid_layout(&self) -> GridLayout {
        GridLayout::new(
            self.grid.cell_size,
            self.grid.corridor_width,
            self.grid.dimension,
        )
    }
}

/// Errors from loading a layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(std::io::Error),
    #[error("failed to parse config file: {0}")]
    TomlError(toml::de::Error),
}

/// Grid geometry constants. Fixed for the lifetime of a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Side length of one cell's building footprint, in world units
    pub cell_size: f64,
    /// Width of the street corridor between adjacent cells
    pub corridor_width: f64,
    /// Number of cells along each grid axis
    pub dimension: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            corridor_width: 4.0,
            dimension: 9,
        }
    }
}

/// Agent population counts and kinematic constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Number of street-bound vehicles
    pub vehicle_count: usize,
    /// Vehicle speed in segments per second
    pub vehicle_speed: f64,
    /// Step size along a street centerline, in world units
    pub street_step: f64,
    /// Number of sidewalk pedestrians
    pub pedestrian_count: usize,
    /// Pedestrian speed in segments per second
    pub pedestrian_speed: f64,
    /// Inward offset of a sidewalk path from its cell edge
    pub sidewalk_margin: f64,
    /// Waypoints closer than this collapse into one
    pub min_point_spacing: f64,
    /// Number of flier flocks
    pub flock_count: usize,
    /// Members per flock, leader included
    pub flock_size: usize,
    /// Spread of flock members around the leader
    pub flock_spread: f64,
    /// Flier altitude band, low edge
    pub flier_min_height: f64,
    /// Flier altitude band, high edge
    pub flier_max_height: f64,
    /// Flier speed in segments per second
    pub flier_speed: f64,
    /// Number of slow ambient drifters
    pub drifter_count: usize,
    /// Drifter speed in segments per second
    pub drifter_speed: f64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            vehicle_count: 6,
            vehicle_speed: 0.8,
            street_step: 6.0,
            pedestrian_count: 10,
            pedestrian_speed: 0.25,
            sidewalk_margin: 1.2,
            min_point_spacing: 0.5,
            flock_count: 2,
            flock_size: 5,
            flock_spread: 3.0,
            flier_min_height: 18.0,
            flier_max_height: 30.0,
            flier_speed: 0.12,
            drifter_count: 3,
            drifter_speed: 0.04,
        }
    }
}

/// Camera framing and flight constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal azimuth of the framing offset, in degrees
    pub framing_angle_deg: f64,
    /// Camera height as a fraction of the framing distance
    pub height_ratio: f64,
    /// Horizontal distance from the focus point
    pub framing_distance: f64,
    /// Flight duration when the caller does not override it
    pub default_duration_secs: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            framing_angle_deg: 35.0,
            height_ratio: 0.65,
            framing_distance: 26.0,
            default_duration_secs: 1.6,
        }
    }
}

/// Progressive disclosure timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureConfig {
    /// Per-tier activation spacing, in milliseconds
    pub base_step_ms: u64,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self { base_step_ms: 180 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LayoutConfig::default();
        assert_eq!(config.grid.dimension, 9);
        let layout = config.grid_layout();
        assert_eq!(layout.cell_count(), 81);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = LayoutConfig::from_str("").expect("empty config parses");
        assert_eq!(config.grid.cell_size, 10.0);
        assert_eq!(config.disclosure.base_step_ms, 180);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = LayoutConfig::from_str(
            r#"
            [grid]
            dimension = 5

            [traffic]
            vehicle_count = 2
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.grid.dimension, 5);
        // Untouched fields keep their defaults.
        assert_eq!(config.grid.cell_size, 10.0);
        assert_eq!(config.traffic.vehicle_count, 2);
        assert_eq!(config.traffic.pedestrian_count, 10);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(LayoutConfig::from_str("grid = 3").is_err());
    }
}
