//! Shared data types and serialization for the record city.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace: the records
//! that describe the city's content on the way in, and the plain per-frame
//! data the simulation core hands to the presentation layer on the way out.

pub mod frame;
pub mod math;
pub mod record;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export math primitives
pub use math::{Rgb, Vec3};

// Re-export record input types
pub use record::{RecordCategory, RecordEntry, RecordSet};

// Re-export frame output types
pub use frame::{AgentPose, CameraPose, PlacedRecord};
