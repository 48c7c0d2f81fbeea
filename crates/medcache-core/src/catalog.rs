//! The static medical reference catalog.
//!
//! The catalog is built once at startup, validated, and then shared
//! read-only (typically behind an `Arc`) with the offline cache.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::CatalogError;
use crate::models::MedicalRecord;

/// Catalog bundled with the application.
const BUILTIN_CATALOG: &str = include_str!("../data/medical_information.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<MedicalRecord>,
}

/// An ordered, immutable mapping from category id to record.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    records: Vec<MedicalRecord>,
    positions: HashMap<String, usize>,
}

impl ReferenceCatalog {
    /// Build a catalog, rejecting invalid or duplicate ids.
    pub fn from_records(records: Vec<MedicalRecord>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if !is_valid_category_id(&record.id) {
                return Err(CatalogError::InvalidId(record.id.clone()));
            }
            if positions.insert(record.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records, positions })
    }

    /// Parse a catalog document of the form `{ "categories": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_records(file.categories)
    }

    /// Load a catalog document from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&contents)?;
        debug!(path = %path.display(), count = catalog.len(), "Loaded catalog from disk");
        Ok(catalog)
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn get(&self, id: &str) -> Option<&MedicalRecord> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &MedicalRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Category ids double as file stems, so they are restricted to lowercase
/// ASCII letters, digits, `-` and `_`. Lowercase only keeps `<id>.json`
/// distinct on case-insensitive file systems.
pub fn is_valid_category_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordContent;

    fn record(id: &str) -> MedicalRecord {
        MedicalRecord {
            id: id.to_string(),
            title: id.to_uppercase(),
            icon: String::new(),
            source: "WHO".to_string(),
            last_updated: "2024-01-01".to_string(),
            content: RecordContent::default(),
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ReferenceCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.contains("first-aid"));
        assert!(catalog.contains("nutrition"));
        assert_eq!(catalog.ids().next(), Some("first-aid"));
    }

    #[test]
    fn test_preserves_order() {
        let catalog =
            ReferenceCatalog::from_records(vec![record("b"), record("a"), record("c_2")]).unwrap();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["b", "a", "c_2"]);
        assert_eq!(catalog.get("a").unwrap().title, "A");
        assert!(catalog.get("z").is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = ReferenceCatalog::from_records(vec![record("a"), record("a")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));

        // cpr.json and CPR.json are one file on case-insensitive file systems
        let err = ReferenceCatalog::from_records(vec![record("cpr"), record("CPR")]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidId(id) if id == "CPR"));
    }

    #[test]
    fn test_rejects_ids_that_are_not_file_safe() {
        for bad in ["", "first.aid", "../etc", "a b", "x/y", "First-Aid"] {
            let err = ReferenceCatalog::from_records(vec![record(bad)]).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidId(_)), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let err = ReferenceCatalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReferenceCatalog::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
