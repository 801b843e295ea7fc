//! Camera Flight Controller
//!
//! Animates the shared camera pose between view states. The rig is an
//! explicit instance owned by the scene root; it is the only writer of the
//! pose, and at most one flight animates at a time. Requesting a flight
//! while one is animating replaces it, capturing the in-flight pose as the
//! new start so the hand-off never jumps.

use bevy_ecs::prelude::Resource;
use tracing::debug;

use city_events::{CameraPose, Vec3};

use crate::config::CameraConfig;

/// Whether a flight is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Idle,
    Animating,
}

#[derive(Debug, Clone)]
struct Flight {
    start_pos: Vec3,
    start_target: Vec3,
    end_pos: Vec3,
    end_target: Vec3,
    progress: f64,
    duration_secs: f64,
}

/// The scene's single camera controller.
#[derive(Resource, Debug)]
pub struct CameraRig {
    pose: CameraPose,
    flight: Option<Flight>,
    framing: CameraConfig,
}

impl CameraRig {
    pub fn new(framing: CameraConfig, initial: CameraPose) -> Self {
        Self {
            pose: initial,
            flight: None,
            framing,
        }
    }

    /// The shared camera pose. Only this rig writes it.
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn state(&self) -> FlightState {
        if self.flight.is_some() {
            FlightState::Animating
        } else {
            FlightState::Idle
        }
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Request a flight that frames `focus` from the rig's fixed angle and
    /// height ratio, rather than flying to the raw point itself.
    ///
    /// The current pose, mid-flight or not, becomes the new start;
    /// replacing the stored flight before anything else mutates shared
    /// state is what keeps a re-request from fighting the old flight.
    pub fn request_flight(&mut self, focus: Vec3, duration_secs: f64) {
        let end_pos = focus + self.framing_offset();
        debug!(
            x = focus.x,
            y = focus.y,
            z = focus.z,
            duration_secs,
            restart = self.flight.is_some(),
            "camera flight requested"
        );
        self.flight = Some(Flight {
            start_pos: self.pose.position,
            start_target: self.pose.target,
            end_pos,
            end_target: focus,
            progress: 0.0,
            duration_secs,
        });
    }

    /// Request a flight with the configured default duration.
    pub fn request_flight_default(&mut self, focus: Vec3) {
        self.request_flight(focus, self.framing.default_duration_secs);
    }

    /// Stop an in-flight transition, leaving the pose where it is.
    pub fn cancel(&mut self) {
        self.flight = None;
    }

    /// Advance the active flight, if any, and rewrite the shared pose.
    pub fn tick(&mut self, dt_secs: f64) -> CameraPose {
        if let Some(flight) = self.flight.as_mut() {
            flight.progress = if flight.duration_secs <= 0.0 {
                1.0
            } else {
                (flight.progress + dt_secs / flight.duration_secs).min(1.0)
            };
            let eased = ease_in_out_cubic(flight.progress);
            self.pose.position = flight.start_pos.lerp(flight.end_pos, eased);
            self.pose.target = flight.start_target.lerp(flight.end_target, eased);
            if flight.progress >= 1.0 {
                self.flight = None;
            }
        }
        self.pose
    }

    /// The fixed framing offset: a horizontal azimuth plus a height ratio
    /// at the configured distance, so every flight lands looking at its
    /// subject from the same angle.
    fn framing_offset(&self) -> Vec3 {
        let azimuth = self.framing.framing_angle_deg.to_radians();
        let distance = self.framing.framing_distance;
        Vec3::new(
            distance * azimuth.sin(),
            distance * self.framing.height_ratio,
            distance * azimuth.cos(),
        )
    }
}

/// Cubic ease-in-out.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
