//! Disclosure scheduling driver.
//!
//! The scheduler itself lives in `city-core`; this system is its only time
//! source. Everything that gates on a task (district spawning) reads the
//! latched state after this system has run.

use bevy::prelude::*;

use city_core::DisclosureScheduler;

/// Plugin advancing the disclosure scheduler.
pub struct DisclosurePlugin;

impl Plugin for DisclosurePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_scheduler);
    }
}

/// System to advance scheduler time by the frame delta.
fn advance_scheduler(time: Res<Time>, mut scheduler: ResMut<DisclosureScheduler>) {
    scheduler.tick(time.delta_seconds_f64());
}
