//! Scene settings assembled from the command line at startup.

use bevy::prelude::*;
use std::path::PathBuf;

use city_core::LayoutConfig;

/// Immutable per-run settings: layout constants, root seed, input path.
#[derive(Resource, Debug, Clone)]
pub struct SceneSettings {
    /// Layout constants (grid, traffic, camera, disclosure).
    pub layout: LayoutConfig,
    /// Root seed; all in-scene variation derives from it.
    pub seed: u64,
    /// Path to the records JSON file.
    pub records_path: PathBuf,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            seed: 42,
            records_path: PathBuf::from("data/records.json"),
        }
    }
}
