//! Traffic rendering: vehicles, pedestrians, flier flocks, drifters.
//!
//! Builds the agent fleet once at startup from the layout and root seed,
//! then ticks it every frame and copies the resulting poses into entity
//! transforms. All variation is drawn from the seeded generator, so two
//! runs with the same seed produce the same traffic.

use bevy::prelude::*;
use std::collections::HashMap;

use city_core::agents::paths::{sidewalk_path, street_path};
use city_core::agents::{Agent, AgentFleet, LoopMode, RoamVolume};
use city_core::config::TrafficConfig;
use city_core::{rng, GridLayout};
use city_events::AgentPose;

use crate::convert::to_render;
use crate::settings::SceneSettings;

// Seed salts keeping each population's draws independent.
const VEHICLE_SALT: u64 = 0x01;
const PEDESTRIAN_SALT: u64 = 0x02;
const FLOCK_SALT: u64 = 0x03;
const DRIFTER_SALT: u64 = 0x04;

/// Plugin for autonomous agents.
pub struct TrafficPlugin;

impl Plugin for TrafficPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AgentFleet>()
            .add_systems(Startup, setup_traffic)
            .add_systems(Update, tick_traffic);
    }
}

/// What an agent looks like; purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Vehicle,
    Pedestrian,
    Flier,
    Drifter,
}

impl AgentKind {
    fn dimensions(&self) -> Vec3 {
        match self {
            AgentKind::Vehicle => Vec3::new(1.2, 0.8, 2.4),
            AgentKind::Pedestrian => Vec3::new(0.5, 1.4, 0.5),
            AgentKind::Flier => Vec3::new(0.7, 0.2, 0.7),
            AgentKind::Drifter => Vec3::new(6.0, 1.6, 6.0),
        }
    }

    fn color(&self) -> Color {
        match self {
            AgentKind::Vehicle => Color::srgb(0.75, 0.75, 0.8),
            AgentKind::Pedestrian => Color::srgb(0.9, 0.85, 0.7),
            AgentKind::Flier => Color::srgb(0.25, 0.25, 0.3),
            AgentKind::Drifter => Color::srgb(0.92, 0.92, 0.95),
        }
    }

    /// Ground agents sit on their path; their mesh is lifted by half its
    /// height so it does not sink into the street.
    fn lift(&self) -> f32 {
        match self {
            AgentKind::Vehicle | AgentKind::Pedestrian => self.dimensions().y * 0.5,
            AgentKind::Flier | AgentKind::Drifter => 0.0,
        }
    }
}

/// Component tying an entity to its fleet agent.
#[derive(Component)]
pub struct AgentVisual {
    pub id: u32,
    pub kind: AgentKind,
}

/// Build the complete fleet for a layout. Pure: the same inputs produce
/// the same fleet.
pub fn build_fleet(layout: &GridLayout, traffic: &TrafficConfig, seed: u64) -> AgentFleet {
    let mut fleet = AgentFleet::new();
    let dimension = layout.dimension();

    // Vehicles alternate between the two street axes, on lanes picked from
    // the seeded generator.
    for i in 0..traffic.vehicle_count {
        let key = rng::mix(seed ^ VEHICLE_SALT ^ (i as u64)) as i64;
        let lane = 1 + (rng::unit(key) * (dimension.saturating_sub(1)) as f64) as usize;
        let along_rows = i % 2 == 0;
        let id = fleet.next_id();
        fleet.push(Agent::new(
            id,
            street_path(layout, lane, along_rows, traffic.street_step),
            LoopMode::Closed,
            traffic.vehicle_speed,
        ));
    }

    // Pedestrians walk blocks picked from the seeded generator; the path
    // shape is drawn per agent inside sidewalk_path.
    for i in 0..traffic.pedestrian_count {
        let key = rng::mix(seed ^ PEDESTRIAN_SALT ^ (i as u64));
        let row = (rng::unit(key as i64) * dimension as f64) as usize % dimension.max(1);
        let col = (rng::unit(key.wrapping_add(1) as i64) * dimension as f64) as usize
            % dimension.max(1);
        let (points, mode) = sidewalk_path(
            layout,
            city_core::Cell::new(row, col),
            traffic.sidewalk_margin,
            traffic.min_point_spacing,
            key.wrapping_add(2) as i64,
        );
        if points.len() < 2 {
            continue;
        }
        let id = fleet.next_id();
        fleet.push(Agent::new(id, points, mode, traffic.pedestrian_speed));
    }

    // Flier flocks: one roaming leader each, members at fixed offsets.
    let flier_volume = RoamVolume {
        half_extent: layout.half_extent(),
        min_height: traffic.flier_min_height,
        max_height: traffic.flier_max_height,
    };
    for f in 0..traffic.flock_count {
        let flock_seed = rng::mix(seed ^ FLOCK_SALT ^ (f as u64));
        let leader_id = fleet.next_id();
        let leader = Agent::roaming(leader_id, flier_volume, flock_seed, traffic.flier_speed);
        let mut members = Vec::new();
        for m in 1..traffic.flock_size.max(1) {
            let offset_key = flock_seed.wrapping_add(m as u64) as i64;
            let offset = city_events::Vec3::new(
                (rng::unit(offset_key) - 0.5) * traffic.flock_spread,
                (rng::unit(offset_key.wrapping_add(1)) - 0.5) * traffic.flock_spread * 0.4,
                (rng::unit(offset_key.wrapping_add(2)) - 0.5) * traffic.flock_spread,
            );
            let id = fleet.next_id();
            members.push(Agent::follower(id, &leader, offset));
        }
        fleet.push(leader);
        for member in members {
            fleet.push(member);
        }
    }

    // Drifters: solo, slow, above the flock band.
    let drifter_volume = RoamVolume {
        half_extent: layout.half_extent(),
        min_height: traffic.flier_max_height + 6.0,
        max_height: traffic.flier_max_height + 18.0,
    };
    for d in 0..traffic.drifter_count {
        let id = fleet.next_id();
        fleet.push(Agent::roaming(
            id,
            drifter_volume,
            rng::mix(seed ^ DRIFTER_SALT ^ (d as u64)),
            traffic.drifter_speed,
        ));
    }

    fleet
}

/// The kinds of the fleet's agents, in registration order. Mirrors the
/// population order inside [`build_fleet`].
pub fn fleet_kinds(traffic: &TrafficConfig, fleet_len: usize) -> Vec<AgentKind> {
    let mut kinds = Vec::with_capacity(fleet_len);
    kinds.extend(std::iter::repeat(AgentKind::Vehicle).take(traffic.vehicle_count));
    let pedestrians = fleet_len
        .saturating_sub(traffic.vehicle_count)
        .saturating_sub(traffic.flock_count * traffic.flock_size.max(1))
        .saturating_sub(traffic.drifter_count);
    kinds.extend(std::iter::repeat(AgentKind::Pedestrian).take(pedestrians));
    kinds.extend(
        std::iter::repeat(AgentKind::Flier).take(traffic.flock_count * traffic.flock_size.max(1)),
    );
    kinds.extend(std::iter::repeat(AgentKind::Drifter).take(traffic.drifter_count));
    kinds
}

/// System to build the fleet and spawn one entity per agent.
fn setup_traffic(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    mut fleet: ResMut<AgentFleet>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let layout = settings.layout.grid_layout();
    *fleet = build_fleet(&layout, &settings.layout.traffic, settings.seed);
    let kinds = fleet_kinds(&settings.layout.traffic, fleet.len());

    for (agent, kind) in fleet.iter().zip(kinds) {
        let size = kind.dimensions();
        let pose = agent.pose();
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(size.x, size.y, size.z)),
                material: materials.add(StandardMaterial {
                    base_color: kind.color(),
                    perceptual_roughness: 0.7,
                    ..default()
                }),
                transform: Transform::from_translation(
                    to_render(pose.position) + Vec3::Y * kind.lift(),
                ),
                ..default()
            },
            AgentVisual { id: agent.id, kind },
        ));
    }

    tracing::info!(agents = fleet.len(), "traffic built");
}

/// System to advance the fleet and copy poses into transforms.
fn tick_traffic(
    time: Res<Time>,
    mut fleet: ResMut<AgentFleet>,
    mut visuals: Query<(&mut Transform, &AgentVisual)>,
) {
    fleet.tick(time.delta_seconds_f64());

    let poses: HashMap<u32, AgentPose> = fleet.iter().map(|a| (a.id, a.pose())).collect();
    for (mut transform, visual) in visuals.iter_mut() {
        let Some(pose) = poses.get(&visual.id) else {
            continue;
        };
        transform.translation = to_render(pose.position) + Vec3::Y * visual.kind.lift();
        transform.rotation = Quat::from_rotation_y(pose.facing as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_fleet_population() {
        let layout = GridLayout::new(10.0, 4.0, 9);
        let traffic = TrafficConfig::default();
        let fleet = build_fleet(&layout, &traffic, 42);
        // Pedestrian paths can degenerate at the grid edge, so the total is
        // bounded rather than exact.
        let max = traffic.vehicle_count
            + traffic.pedestrian_count
            + traffic.flock_count * traffic.flock_size
            + traffic.drifter_count;
        assert!(fleet.len() <= max);
        assert!(fleet.len() >= max - traffic.pedestrian_count);
    }

    #[test]
    fn test_build_fleet_is_deterministic() {
        let layout = GridLayout::new(10.0, 4.0, 9);
        let traffic = TrafficConfig::default();
        let mut a = build_fleet(&layout, &traffic, 7);
        let mut b = build_fleet(&layout, &traffic, 7);
        assert_eq!(a.len(), b.len());
        for _ in 0..100 {
            a.tick(1.0 / 60.0);
            b.tick(1.0 / 60.0);
        }
        for (pa, pb) in a.poses().iter().zip(b.poses().iter()) {
            assert_eq!(pa.position, pb.position);
        }
    }

    #[test]
    fn test_fleet_kinds_cover_fleet() {
        let layout = GridLayout::new(10.0, 4.0, 9);
        let traffic = TrafficConfig::default();
        let fleet = build_fleet(&layout, &traffic, 42);
        let kinds = fleet_kinds(&traffic, fleet.len());
        assert_eq!(kinds.len(), fleet.len());
        assert_eq!(kinds[0], AgentKind::Vehicle);
        assert_eq!(*kinds.last().unwrap(), AgentKind::Drifter);
    }
}
