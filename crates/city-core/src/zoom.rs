//! Zoom request surface.
//!
//! Maps `(category, stable id)` selection requests onto camera flights.
//! The index is rebuilt from the placement output whenever records reload;
//! a request for an id it does not know is a no-op.

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use tracing::debug;

use city_events::{PlacedRecord, RecordCategory, Vec3};

use crate::camera::CameraRig;

/// Fraction of a building's height where the camera's focus point sits.
/// Ground-level categories override this to zero.
const FOCUS_HEIGHT_RATIO: f64 = 0.6;

#[derive(Debug, Clone)]
struct FocusEntry {
    position: Vec3,
    focus_height: f64,
}

/// Lookup from record identity to camera focus point.
#[derive(Resource, Debug, Default)]
pub struct SceneIndex {
    entries: HashMap<(RecordCategory, String), FocusEntry>,
    /// Insertion order, for UI-driven cycling through records.
    order: Vec<(RecordCategory, String)>,
}

impl SceneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from a fresh placement pass.
    pub fn rebuild(&mut self, placements: &[PlacedRecord]) {
        self.entries.clear();
        self.order.clear();
        for placed in placements {
            let key = (placed.category, placed.stable_id.clone());
            let entry = FocusEntry {
                position: placed.position,
                focus_height: default_focus_height(placed.category, placed.height),
            };
            self.entries.insert(key.clone(), entry);
            self.order.push(key);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Record identities in placement order.
    pub fn keys(&self) -> &[(RecordCategory, String)] {
        &self.order
    }

    /// The camera focus point for a record, if the index knows it.
    pub fn focus_of(
        &self,
        category: RecordCategory,
        id: &str,
        height_override: Option<f64>,
    ) -> Option<Vec3> {
        self.entries.get(&(category, id.to_string())).map(|entry| {
            let height = height_override.unwrap_or(entry.focus_height);
            Vec3::new(entry.position.x, entry.position.y + height, entry.position.z)
        })
    }

    /// Resolve a record and fly the camera to it. Unknown ids are a no-op;
    /// returns whether a flight was issued.
    pub fn zoom_to(
        &self,
        rig: &mut CameraRig,
        category: RecordCategory,
        id: &str,
        height_override: Option<f64>,
    ) -> bool {
        match self.focus_of(category, id, height_override) {
            Some(focus) => {
                rig.request_flight_default(focus);
                true
            }
            None => {
                debug!(?category, id, "zoom_to ignored unknown record");
                false
            }
        }
    }
}

/// Where the camera looks on a record of this category: part-way up the
/// building for built categories, ground level for interests.
fn default_focus_height(category: RecordCategory, height: f64) -> f64 {
    match category {
        RecordCategory::Interest => 0.0,
        _ => height * FOCUS_HEIGHT_RATIO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use city_events::{CameraPose, Rgb};

    fn placements() -> Vec<PlacedRecord> {
        vec![
            PlacedRecord {
                category: RecordCategory::PrimaryTimeline,
                stable_id: "job_a".into(),
                row: 1,
                col: 1,
                position: Vec3::new(-14.0, 0.0, -14.0),
                color: Rgb::new(0.2, 0.4, 0.6),
                height: 20.0,
            },
            PlacedRecord {
                category: RecordCategory::Interest,
                stable_id: "int_a".into(),
                row: 0,
                col: 3,
                position: Vec3::new(14.0, 0.0, -28.0),
                color: Rgb::new(0.3, 0.5, 0.3),
                height: 4.0,
            },
        ]
    }

    fn rig() -> CameraRig {
        CameraRig::new(CameraConfig::default(), CameraPose::default())
    }

    #[test]
    fn test_zoom_to_known_record_starts_flight() {
        let mut index = SceneIndex::new();
        index.rebuild(&placements());
        let mut rig = rig();
        assert!(index.zoom_to(&mut rig, RecordCategory::PrimaryTimeline, "job_a", None));
        assert!(rig.is_animating());
    }

    #[test]
    fn test_zoom_to_unknown_record_is_noop() {
        let mut index = SceneIndex::new();
        index.rebuild(&placements());
        let mut rig = rig();
        assert!(!index.zoom_to(&mut rig, RecordCategory::Project, "nope", None));
        assert!(!rig.is_animating());
    }

    #[test]
    fn test_focus_sits_above_ground_for_buildings() {
        let mut index = SceneIndex::new();
        index.rebuild(&placements());
        let focus = index
            .focus_of(RecordCategory::PrimaryTimeline, "job_a", None)
            .unwrap();
        assert_eq!(focus.y, 12.0); // 20.0 * 0.6
        // Interests focus at ground level.
        let focus = index.focus_of(RecordCategory::Interest, "int_a", None).unwrap();
        assert_eq!(focus.y, 0.0);
    }

    #[test]
    fn test_height_override_wins() {
        let mut index = SceneIndex::new();
        index.rebuild(&placements());
        let focus = index
            .focus_of(RecordCategory::PrimaryTimeline, "job_a", Some(3.0))
            .unwrap();
        assert_eq!(focus.y, 3.0);
    }

    #[test]
    fn test_rebuild_replaces_entries() {
        let mut index = SceneIndex::new();
        index.rebuild(&placements());
        assert_eq!(index.len(), 2);
        index.rebuild(&placements()[..1]);
        assert_eq!(index.len(), 1);
        assert!(index.focus_of(RecordCategory::Interest, "int_a", None).is_none());
    }
}
