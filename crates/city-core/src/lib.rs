//! Core city logic: grid placement, waypoint agents, camera flights,
//! progressive disclosure.
//!
//! Everything in this crate is plain data plus deterministic algorithms.
//! Given the same records, layout constants, and root seed, two runs build
//! bit-identical cities. The presentation layer consumes the output types
//! from `city-events` and contributes no algorithmic behavior of its own.

pub mod agents;
pub mod camera;
pub mod config;
pub mod disclosure;
pub mod grid;
pub mod placement;
pub mod rng;
pub mod zoom;

pub use agents::{Agent, AgentFleet, LoopMode};
pub use camera::CameraRig;
pub use config::LayoutConfig;
pub use disclosure::{DisclosureScheduler, TaskId, TaskState};
pub use grid::{Cell, GridLayout};
pub use placement::{OverflowPolicy, PlacementAllocator, PlacementError};
pub use zoom::SceneIndex;
