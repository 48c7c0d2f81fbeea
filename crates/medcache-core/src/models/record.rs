//! Domain models for medical reference records.
//!
//! Field names serialize in camelCase so saved files keep the same JSON shape
//! as the catalog the mobile screens read.

use serde::{Deserialize, Serialize};

/// A full category record from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    pub title: String,
    /// Icon name used by the category grid.
    #[serde(default)]
    pub icon: String,
    pub source: String,
    pub last_updated: String,
    pub content: RecordContent,
}

/// The structured body of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RecordContent {
    pub introduction: String,
    #[serde(default)]
    pub general_principles: Vec<String>,
    #[serde(default)]
    pub sections: Vec<RecordSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecordSection {
    pub title: String,
    pub content: String,
}

impl MedicalRecord {
    /// Project this record into its list-view summary.
    pub fn summary(&self, saved: bool) -> CategorySummary {
        CategorySummary {
            id: self.id.clone(),
            title: self.title.clone(),
            icon: self.icon.clone(),
            source: self.source.clone(),
            last_updated: self.last_updated.clone(),
            saved,
        }
    }

    /// Number of body sections, not counting the introduction.
    pub fn section_count(&self) -> usize {
        self.content.sections.len()
    }
}

/// A catalog entry as the category list shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub source: String,
    pub last_updated: String,
    /// Whether a durable local copy exists.
    pub saved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MedicalRecord {
        MedicalRecord {
            id: "first-aid".to_string(),
            title: "First Aid".to_string(),
            icon: "medkit".to_string(),
            source: "WHO".to_string(),
            last_updated: "2024-01-15".to_string(),
            content: RecordContent {
                introduction: "Basics.".to_string(),
                general_principles: vec!["Stay calm".to_string()],
                sections: vec![RecordSection {
                    title: "Wounds".to_string(),
                    content: "Apply pressure.".to_string(),
                }],
            },
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["lastUpdated"], "2024-01-15");
        assert_eq!(json["content"]["generalPrinciples"][0], "Stay calm");
        assert!(json.get("last_updated").is_none());
    }

    #[test]
    fn test_icon_defaults_when_missing() {
        let json = r#"{
            "id": "burns",
            "title": "Burns",
            "source": "Red Cross",
            "lastUpdated": "2023-11-02",
            "content": { "introduction": "Cool the burn." }
        }"#;
        let record: MedicalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.icon, "");
        assert!(record.content.general_principles.is_empty());
        assert_eq!(record.section_count(), 0);
    }

    #[test]
    fn test_summary_carries_saved_flag() {
        let record = sample();
        let summary = record.summary(true);
        assert_eq!(summary.id, "first-aid");
        assert_eq!(summary.icon, "medkit");
        assert!(summary.saved);
        assert!(!record.summary(false).saved);
    }
}
