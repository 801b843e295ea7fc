//! Selection input: cycling through records and flying the camera.
//!
//! Tab cycles forward through the placed records, Shift+Tab backward;
//! Home returns to the overview. Each selection forwards to the core's
//! zoom surface, which resolves the record and issues the flight.

use bevy::prelude::*;

use city_core::{CameraRig, SceneIndex};

/// Plugin for selection input handling.
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionState>()
            .add_systems(Update, handle_selection_input);
    }
}

/// Which record is currently selected, if any.
#[derive(Resource, Default)]
pub struct SelectionState {
    pub cursor: Option<usize>,
}

/// System to translate keyboard input into zoom requests.
fn handle_selection_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    index: Res<SceneIndex>,
    mut rig: ResMut<CameraRig>,
    mut selection: ResMut<SelectionState>,
) {
    // Home key - overview of the whole city.
    if keyboard.just_pressed(KeyCode::Home) {
        selection.cursor = None;
        rig.request_flight_default(city_events::Vec3::ZERO);
        return;
    }

    if !keyboard.just_pressed(KeyCode::Tab) || index.is_empty() {
        return;
    }

    let len = index.keys().len();
    let backward =
        keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
    let cursor = match selection.cursor {
        // A stale cursor from before a reload is renormalized by the modulo.
        Some(current) if backward => (current + len - 1) % len,
        Some(current) => (current + 1) % len,
        None => 0,
    };
    selection.cursor = Some(cursor);

    let (category, id) = &index.keys()[cursor];
    if !index.zoom_to(&mut rig, *category, id, None) {
        tracing::warn!(?category, id, "selected record vanished from the index");
    }
}
