//! Main scene plugin that ties all systems together.

use bevy::prelude::*;

use crate::camera::CameraScenePlugin;
use crate::disclosure::DisclosurePlugin;
use crate::districts::DistrictsPlugin;
use crate::records::RecordsPlugin;
use crate::selection::SelectionPlugin;
use crate::traffic::TrafficPlugin;

/// Main plugin for the record city scene.
///
/// This plugin sets up the window, adds all sub-plugins, and configures
/// the Bevy app. The `SceneSettings`, `DisclosureScheduler`, and
/// `CameraRig` resources must be inserted before it builds.
pub struct CityScenePlugin;

impl Plugin for CityScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Record City".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            RecordsPlugin,
            DistrictsPlugin,
            TrafficPlugin,
            DisclosurePlugin,
            CameraScenePlugin,
            SelectionPlugin,
        ));
    }
}
