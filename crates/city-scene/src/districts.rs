//! District rendering: buildings, park, home, ground.
//!
//! Runs the core placement pass whenever records change, then spawns one
//! building entity per placed record. Spawning is gated per category by
//! the disclosure scheduler so the densest districts do not all mount on
//! the same frame.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use city_core::placement::{OverflowPolicies, PlacementAllocator};
use city_core::{Cell, DisclosureScheduler, SceneIndex, TaskId};
use city_events::{PlacedRecord, RecordCategory};

use crate::convert::{to_color, to_render};
use crate::records::{RecordStore, RecordsUpdatedEvent};
use crate::settings::SceneSettings;

/// Fraction of the cell footprint a building occupies.
const BUILDING_FOOTPRINT_RATIO: f32 = 0.82;

/// Plugin for the built city: placement, buildings, ground.
pub struct DistrictsPlugin;

impl Plugin for DistrictsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CityPlacements>()
            .init_resource::<CategoryTasks>()
            .init_resource::<SpawnedCategories>()
            .init_resource::<SceneIndex>()
            .add_systems(Startup, setup_environment)
            .add_systems(Update, (rebuild_city, spawn_disclosed_categories).chain());
    }
}

/// The current placement output, rebuilt on every records change.
#[derive(Resource, Default)]
pub struct CityPlacements {
    pub placements: Vec<PlacedRecord>,
    pub park: Option<Cell>,
    pub home: Option<Cell>,
}

/// Disclosure task handles, one per category.
#[derive(Resource, Default)]
pub struct CategoryTasks {
    pub map: HashMap<RecordCategory, TaskId>,
}

/// Categories whose buildings have been spawned for the current placement.
#[derive(Resource, Default)]
pub struct SpawnedCategories {
    pub categories: HashSet<RecordCategory>,
}

/// Marker for every entity that belongs to the built city and is replaced
/// on re-placement.
#[derive(Component)]
pub struct CityEntity;

/// Component tying a building entity back to its record.
#[derive(Component)]
pub struct Building {
    pub category: RecordCategory,
    pub stable_id: String,
}

/// System to spawn the static environment: ground plane and lighting.
fn setup_environment(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let extent = settings.layout.grid_layout().total_extent() as f32;
    let ground_size = extent * 1.4;

    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(ground_size, ground_size)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.16, 0.17, 0.19),
            perceptual_roughness: 1.0,
            ..default()
        }),
        ..default()
    });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(40.0, 80.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.8, 0.85, 1.0),
        brightness: 120.0,
    });

    tracing::info!(ground_size, "spawned environment");
}

/// System to rerun placement when records change.
///
/// Despawns the previous city, rebuilds the scene index, and reschedules
/// the per-category disclosure tasks. Outstanding tasks are cancelled
/// before rescheduling so no stale activation addresses despawned
/// entities.
#[allow(clippy::too_many_arguments)]
fn rebuild_city(
    mut events: EventReader<RecordsUpdatedEvent>,
    store: Res<RecordStore>,
    settings: Res<SceneSettings>,
    mut placements: ResMut<CityPlacements>,
    mut scene_index: ResMut<SceneIndex>,
    mut scheduler: ResMut<DisclosureScheduler>,
    mut tasks: ResMut<CategoryTasks>,
    mut spawned: ResMut<SpawnedCategories>,
    mut commands: Commands,
    city_entities: Query<Entity, With<CityEntity>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if events.read().next().is_none() {
        return;
    }
    let Some(ref set) = store.set else {
        return;
    };

    let layout = settings.layout.grid_layout();
    let mut allocator = PlacementAllocator::new(layout);
    let placed = match allocator.place_records(set, settings.seed, OverflowPolicies::default()) {
        Ok(placed) => placed,
        Err(e) => {
            tracing::error!("placement failed: {}", e);
            return;
        }
    };

    for entity in city_entities.iter() {
        commands.entity(entity).despawn_recursive();
    }

    scene_index.rebuild(&placed);
    placements.placements = placed;
    placements.park = Some(allocator.park());
    placements.home = allocator.home();

    for (_, task) in tasks.map.drain() {
        scheduler.cancel(task);
    }
    for category in RecordCategory::ALL {
        tasks.map.insert(category, scheduler.schedule(category.tier(), 0));
    }
    spawned.categories.clear();

    spawn_reserved_cells(
        &mut commands,
        &settings,
        &placements,
        &mut meshes,
        &mut materials,
    );

    tracing::info!(count = placements.placements.len(), "city rebuilt");
}

/// Spawn the park lawn and the home marker. Neither is disclosure-gated:
/// both are part of the ground the rest of the city appears around.
fn spawn_reserved_cells(
    commands: &mut Commands,
    settings: &SceneSettings,
    placements: &CityPlacements,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let layout = settings.layout.grid_layout();
    let footprint = (layout.cell_size() as f32) * BUILDING_FOOTPRINT_RATIO;

    if let Some(park) = placements.park {
        let center = to_render(layout.cell_center(park));
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(footprint, 0.2, footprint)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(0.22, 0.45, 0.24),
                    perceptual_roughness: 1.0,
                    ..default()
                }),
                transform: Transform::from_translation(center + Vec3::Y * 0.1),
                ..default()
            },
            CityEntity,
        ));
    }

    if let Some(home) = placements.home {
        let center = to_render(layout.cell_center(home));
        let height = 4.0;
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(footprint * 0.5, height, footprint * 0.5)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(0.85, 0.78, 0.62),
                    perceptual_roughness: 0.8,
                    ..default()
                }),
                transform: Transform::from_translation(center + Vec3::Y * (height * 0.5)),
                ..default()
            },
            CityEntity,
        ));
    }
}

/// System to spawn each category's buildings once its disclosure task
/// activates. Activation is latched, so every category spawns exactly once
/// per placement.
fn spawn_disclosed_categories(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    placements: Res<CityPlacements>,
    scheduler: Res<DisclosureScheduler>,
    tasks: Res<CategoryTasks>,
    mut spawned: ResMut<SpawnedCategories>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if placements.placements.is_empty() {
        return;
    }
    let footprint =
        (settings.layout.grid_layout().cell_size() as f32) * BUILDING_FOOTPRINT_RATIO;

    for category in RecordCategory::ALL {
        if spawned.categories.contains(&category) {
            continue;
        }
        let Some(task) = tasks.map.get(&category) else {
            continue;
        };
        if !scheduler.is_active(*task) {
            continue;
        }
        spawned.categories.insert(category);

        let mut count = 0;
        for placed in placements.placements.iter().filter(|p| p.category == category) {
            spawn_building(
                &mut commands,
                placed,
                footprint,
                &mut meshes,
                &mut materials,
            );
            count += 1;
        }
        tracing::debug!(?category, count, "district disclosed");
    }
}

fn spawn_building(
    commands: &mut Commands,
    placed: &PlacedRecord,
    footprint: f32,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let height = placed.height as f32;
    let base = to_render(placed.position);
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::new(footprint, height, footprint)),
            material: materials.add(StandardMaterial {
                base_color: to_color(placed.color),
                perceptual_roughness: 0.85,
                ..default()
            }),
            transform: Transform::from_translation(base + Vec3::Y * (height * 0.5)),
            ..default()
        },
        Building {
            category: placed.category,
            stable_id: placed.stable_id.clone(),
        },
        CityEntity,
    ));
}
