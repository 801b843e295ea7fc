//! Frame Output Types
//!
//! The plain data the simulation core produces for the presentation layer:
//! resolved placements at build time, and agent/camera poses every frame.
//! None of these types know anything about meshes, materials, or rendering.

use serde::{Deserialize, Serialize};

use crate::math::{Rgb, Vec3};
use crate::record::RecordCategory;

/// One record resolved to a grid cell, world position, and color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedRecord {
    /// Category the record came from.
    pub category: RecordCategory,
    /// Stable identifier, unique within the category.
    pub stable_id: String,
    /// Grid row of the assigned cell.
    pub row: usize,
    /// Grid column of the assigned cell.
    pub col: usize,
    /// World-space center of the assigned cell (ground level).
    pub position: Vec3,
    /// Deterministic display color.
    pub color: Rgb,
    /// Building height in world units.
    pub height: f64,
}

/// Live pose of one autonomous agent, rewritten every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentPose {
    /// Fleet-assigned agent id.
    pub agent: u32,
    /// Current world position.
    pub position: Vec3,
    /// Yaw around the vertical axis, in radians (0 = +Z). Orientation only.
    pub facing: f64,
}

/// The shared camera state: where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 60.0, 80.0),
            target: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placed_record_roundtrip() {
        let placed = PlacedRecord {
            category: RecordCategory::Project,
            stable_id: "proj_a".into(),
            row: 2,
            col: 3,
            position: Vec3::new(7.0, 0.0, -7.0),
            color: Rgb::new(0.2, 0.5, 0.8),
            height: 12.5,
        };
        let json = serde_json::to_string(&placed).unwrap();
        let back: PlacedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stable_id, "proj_a");
        assert_eq!(back.position, placed.position);
        assert_eq!(back.height, placed.height);
    }

    #[test]
    fn test_camera_pose_default_looks_at_origin() {
        let pose = CameraPose::default();
        assert_eq!(pose.target, Vec3::ZERO);
        assert!(pose.position.y > 0.0);
    }
}
