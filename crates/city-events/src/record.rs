//! Record Input Types
//!
//! The structured records the city visualizes: an ordered list per category,
//! each entry carrying a stable identifier. Produced by an external data
//! loader, consumed by the placement pass in `city-core`.

use serde::{Deserialize, Serialize};

/// The category a record belongs to.
///
/// Categories map one-to-one onto placement strategies and disclosure tiers,
/// so their order here is the priority order of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    /// Primary timeline entries (work history). Ring allocation, tier 0.
    PrimaryTimeline,
    /// Secondary timeline entries (education). Spiral allocation, tier 1.
    SecondaryTimeline,
    /// Projects. Spiral allocation, tier 2.
    Project,
    /// Interests. Residual allocation, tier 3.
    Interest,
}

impl RecordCategory {
    /// All categories in priority order.
    pub const ALL: [RecordCategory; 4] = [
        RecordCategory::PrimaryTimeline,
        RecordCategory::SecondaryTimeline,
        RecordCategory::Project,
        RecordCategory::Interest,
    ];

    /// Disclosure tier for this category (0 = mounts immediately).
    pub fn tier(&self) -> u8 {
        match self {
            RecordCategory::PrimaryTimeline => 0,
            RecordCategory::SecondaryTimeline => 1,
            RecordCategory::Project => 2,
            RecordCategory::Interest => 3,
        }
    }
}

/// One record to be represented in the city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Stable identifier, unique within its category.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Secondary line (employer, institution, ...).
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Human-readable time span, if any.
    #[serde(default)]
    pub period: Option<String>,
    /// Relative visual weight in [0, 1]; drives building height.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    0.5
}

impl RecordEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            period: None,
            weight: default_weight(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// The complete record input: one ordered list per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub primary_timeline: Vec<RecordEntry>,
    #[serde(default)]
    pub secondary_timeline: Vec<RecordEntry>,
    #[serde(default)]
    pub projects: Vec<RecordEntry>,
    #[serde(default)]
    pub interests: Vec<RecordEntry>,
}

impl RecordSet {
    /// The records of one category, in input order.
    pub fn of(&self, category: RecordCategory) -> &[RecordEntry] {
        match category {
            RecordCategory::PrimaryTimeline => &self.primary_timeline,
            RecordCategory::SecondaryTimeline => &self.secondary_timeline,
            RecordCategory::Project => &self.projects,
            RecordCategory::Interest => &self.interests,
        }
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        RecordCategory::ALL.iter().map(|c| self.of(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a record by category and stable id.
    pub fn find(&self, category: RecordCategory, id: &str) -> Option<&RecordEntry> {
        self.of(category).iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tiers_are_priority_ordered() {
        let tiers: Vec<u8> = RecordCategory::ALL.iter().map(|c| c.tier()).collect();
        assert_eq!(tiers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_record_set_accessors() {
        let set = RecordSet {
            primary_timeline: vec![RecordEntry::new("job_a", "Job A")],
            projects: vec![
                RecordEntry::new("proj_a", "Project A"),
                RecordEntry::new("proj_b", "Project B"),
            ],
            ..Default::default()
        };
        assert_eq!(set.len(), 3);
        assert_eq!(set.of(RecordCategory::Project).len(), 2);
        assert!(set.find(RecordCategory::Project, "proj_b").is_some());
        assert!(set.find(RecordCategory::Interest, "proj_b").is_none());
    }

    #[test]
    fn test_record_entry_deserializes_with_defaults() {
        let entry: RecordEntry =
            serde_json::from_str(r#"{"id": "x", "title": "X"}"#).expect("minimal entry parses");
        assert_eq!(entry.weight, 0.5);
        assert!(entry.subtitle.is_none());
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&RecordCategory::PrimaryTimeline).unwrap();
        assert_eq!(json, "\"primary_timeline\"");
    }
}
