//! Waypoint Agents
//!
//! Autonomous actors that interpolate along waypoint sequences: vehicles on
//! street centerlines, pedestrians on sidewalk loops, flier flocks and slow
//! drifters on regenerating free-roam paths. One fleet tick per frame
//! advances every agent; grouped agents copy their leader's timing so a
//! flock stays visually coherent without per-member timing math.

pub mod paths;

use bevy_ecs::prelude::Resource;
use rand::rngs::SmallRng;
use rand::Rng;

use city_events::{AgentPose, Vec3};

use crate::rng;

/// How an agent behaves when it finishes its current segment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Wrap to the first segment (closed loops, looping streets).
    Closed,
    /// Reverse direction at either end of the path.
    PingPong,
    /// Draw a fresh endpoint and continue from the current position.
    Regenerate,
}

/// The volume free-roaming agents draw their endpoints from.
#[derive(Debug, Clone, Copy)]
pub struct RoamVolume {
    pub half_extent: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl RoamVolume {
    fn draw(&self, stream: &mut SmallRng) -> Vec3 {
        Vec3::new(
            stream.gen_range(-self.half_extent..self.half_extent),
            stream.gen_range(self.min_height..self.max_height),
            stream.gen_range(-self.half_extent..self.half_extent),
        )
    }
}

/// One autonomous agent moving along a waypoint path.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Fleet-assigned id.
    pub id: u32,
    /// The waypoint sequence; closed loops carry the first point again at
    /// the end.
    pub waypoints: Vec<Vec3>,
    pub loop_mode: LoopMode,
    /// Speed in segments per second.
    pub speed: f64,
    /// Position within the current segment, in [0, 1).
    pub progress: f64,
    /// Index of the current segment.
    pub segment: usize,
    /// Traversal direction, only meaningful for `PingPong`.
    direction: i8,
    /// Endpoint source for `Regenerate` agents.
    roam: Option<(RoamVolume, SmallRng)>,
    /// Fixed personal offset from the interpolated position.
    offset: Vec3,
    /// Leader agent id; followers copy the leader's timing each tick.
    group: Option<u32>,
}

impl Agent {
    pub fn new(id: u32, waypoints: Vec<Vec3>, loop_mode: LoopMode, speed: f64) -> Self {
        Self {
            id,
            waypoints,
            loop_mode,
            speed,
            progress: 0.0,
            segment: 0,
            direction: 1,
            roam: None,
            offset: Vec3::ZERO,
            group: None,
        }
    }

    /// A free-roaming agent whose path regenerates from a seeded stream.
    pub fn roaming(id: u32, volume: RoamVolume, seed: u64, speed: f64) -> Self {
        let mut stream = rng::stream(seed);
        let start = volume.draw(&mut stream);
        let end = volume.draw(&mut stream);
        let mut agent = Self::new(id, vec![start, end], LoopMode::Regenerate, speed);
        agent.roam = Some((volume, stream));
        agent
    }

    /// A flock member that mirrors `leader` at a fixed personal offset.
    pub fn follower(id: u32, leader: &Agent, offset: Vec3) -> Self {
        let mut agent = Self::new(id, leader.waypoints.clone(), leader.loop_mode, leader.speed);
        agent.offset = offset;
        agent.group = Some(leader.id);
        agent
    }

    /// The leader this agent follows, if any.
    pub fn leader(&self) -> Option<u32> {
        self.group
    }

    fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Endpoints of the current segment, honoring ping-pong direction.
    fn segment_points(&self) -> (Vec3, Vec3) {
        let segs = self.segment_count();
        let segment = self.segment.min(segs.saturating_sub(1));
        let a = self.waypoints[segment];
        let b = self.waypoints[segment + 1];
        if self.direction < 0 {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Advance the agent by `dt` seconds. A degenerate path (fewer than two
    /// waypoints) is a no-op.
    pub fn tick(&mut self, dt: f64) {
        if self.waypoints.len() < 2 {
            return;
        }
        self.progress += self.speed * dt;
        if self.progress >= 1.0 {
            self.progress = 0.0;
            self.advance_segment();
        }
    }

    fn advance_segment(&mut self) {
        let segs = self.segment_count();
        match self.loop_mode {
            LoopMode::Closed => {
                self.segment = (self.segment + 1) % segs;
            }
            LoopMode::PingPong => {
                if self.direction >= 0 {
                    if self.segment + 1 < segs {
                        self.segment += 1;
                    } else {
                        self.direction = -1;
                    }
                } else if self.segment > 0 {
                    self.segment -= 1;
                } else {
                    self.direction = 1;
                }
            }
            LoopMode::Regenerate => {
                // The reached endpoint becomes the new start, so the path
                // continues without a positional jump.
                let (_, reached) = self.segment_points();
                let next = match self.roam.as_mut() {
                    Some((volume, stream)) => volume.draw(stream),
                    // No endpoint source: hold position at the reached end.
                    None => reached,
                };
                self.waypoints.clear();
                self.waypoints.push(reached);
                self.waypoints.push(next);
                self.segment = 0;
            }
        }
    }

    /// Current interpolated world position, personal offset included.
    pub fn position(&self) -> Vec3 {
        if self.waypoints.len() < 2 {
            return self.waypoints.first().copied().unwrap_or(Vec3::ZERO) + self.offset;
        }
        let (a, b) = self.segment_points();
        a.lerp(b, self.progress) + self.offset
    }

    /// Yaw of the current segment direction, radians around +Y (0 = +Z).
    /// Orientation only; nothing kinematic depends on it.
    pub fn facing(&self) -> f64 {
        if self.waypoints.len() < 2 {
            return 0.0;
        }
        let (a, b) = self.segment_points();
        let dir = (b - a).normalize_or_zero();
        if dir == Vec3::ZERO {
            0.0
        } else {
            dir.x.atan2(dir.z)
        }
    }

    pub fn pose(&self) -> AgentPose {
        AgentPose {
            agent: self.id,
            position: self.position(),
            facing: self.facing(),
        }
    }

    /// Copy the leader's timing and path. Followers call this after the
    /// leader's tick; their own offset stays fixed.
    fn sync_from(&mut self, leader: &Agent) {
        self.progress = leader.progress;
        self.segment = leader.segment;
        self.direction = leader.direction;
        self.waypoints.clone_from(&leader.waypoints);
    }
}

/// All agents of one scene, ticked in registration order.
#[derive(Resource, Debug, Default)]
pub struct AgentFleet {
    agents: Vec<Agent>,
    next_id: u32,
}

impl AgentFleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next agent id.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    pub fn get(&self, id: u32) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Advance every agent by `dt`: leaders and solo agents first in
    /// registration order, then followers copy their leader's timing.
    /// The follower copy reads the leader's post-tick state from this same
    /// tick and writes only the follower, so updates stay independent.
    pub fn tick(&mut self, dt: f64) {
        for agent in &mut self.agents {
            if agent.group.is_none() {
                agent.tick(dt);
            }
        }
        for i in 0..self.agents.len() {
            let Some(leader_id) = self.agents[i].group else {
                continue;
            };
            let Some(li) = self.agents.iter().position(|a| a.id == leader_id) else {
                continue;
            };
            if li == i {
                continue;
            }
            let (leader, follower) = if li < i {
                let (head, tail) = self.agents.split_at_mut(i);
                (&head[li], &mut tail[0])
            } else {
                let (head, tail) = self.agents.split_at_mut(li);
                (&tail[0], &mut head[i])
            };
            follower.sync_from(leader);
        }
    }

    /// Current poses for the presentation layer, in registration order.
    pub fn poses(&self) -> Vec<AgentPose> {
        self.agents.iter().map(Agent::pose).collect()
    }
}
