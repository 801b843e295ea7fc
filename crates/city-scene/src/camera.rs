//! Camera systems: rig ticking and transform application.
//!
//! The `CameraRig` resource (owned by the scene root, inserted at startup)
//! is the single writer of the camera pose; these systems advance it each
//! frame and copy the result onto the Bevy camera transform.

use bevy::prelude::*;

use city_core::CameraRig;

use crate::convert::to_render;

/// Plugin for camera control.
pub struct CameraScenePlugin;

impl Plugin for CameraScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, (drive_camera_rig, apply_camera_pose).chain());
    }
}

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// System to spawn the camera at the rig's initial pose.
fn setup_camera(mut commands: Commands, rig: Res<CameraRig>) {
    let pose = rig.pose();
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(to_render(pose.position))
                .looking_at(to_render(pose.target), Vec3::Y),
            ..default()
        },
        MainCamera,
    ));
}

/// System to advance the active flight, if any.
fn drive_camera_rig(time: Res<Time>, mut rig: ResMut<CameraRig>) {
    rig.tick(time.delta_seconds_f64());
}

/// System to apply the rig's pose to the camera transform.
fn apply_camera_pose(
    rig: Res<CameraRig>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let pose = rig.pose();
    for mut transform in camera_query.iter_mut() {
        *transform = Transform::from_translation(to_render(pose.position))
            .looking_at(to_render(pose.target), Vec3::Y);
    }
}
