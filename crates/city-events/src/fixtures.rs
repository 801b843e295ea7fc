//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // city-events = { path = "../city-events", features = ["test-fixtures"] }
//!
//! use city_events::fixtures;
//!
//! let records = fixtures::sample_records();
//! ```

use crate::record::{RecordEntry, RecordSet};

/// Returns the sample record set from the fixtures file.
///
/// Contains 14 records across all four categories:
/// - 3 primary-timeline entries
/// - 2 secondary-timeline entries
/// - 4 projects
/// - 5 interests
pub fn sample_records() -> RecordSet {
    let json = include_str!("../tests/fixtures/sample_records.json");
    serde_json::from_str(json)
        .unwrap_or_else(|e| panic!("Failed to parse sample_records.json: {}", e))
}

/// A minimal record set with one entry per category, for tests that only
/// need the shape rather than realistic volume.
pub fn tiny_records() -> RecordSet {
    RecordSet {
        primary_timeline: vec![RecordEntry::new("job_a", "Job A").with_weight(0.8)],
        secondary_timeline: vec![RecordEntry::new("edu_a", "Degree A")],
        projects: vec![RecordEntry::new("proj_a", "Project A")],
        interests: vec![RecordEntry::new("int_a", "Interest A")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_records_parse() {
        let records = sample_records();
        assert_eq!(records.primary_timeline.len(), 3);
        assert_eq!(records.secondary_timeline.len(), 2);
        assert_eq!(records.projects.len(), 4);
        assert_eq!(records.interests.len(), 5);
        assert_eq!(records.len(), 14);
    }

    #[test]
    fn test_tiny_records_one_per_category() {
        let records = tiny_records();
        assert_eq!(records.len(), 4);
    }
}
