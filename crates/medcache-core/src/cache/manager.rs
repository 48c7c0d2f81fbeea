use std::io;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::OfflineIndex;
use crate::catalog::{is_valid_category_id, ReferenceCatalog};
use crate::error::OfflineError;
use crate::models::{CategorySummary, MedicalRecord};
use crate::storage::fs::{TEMP_PREFIX, TEMP_SUFFIX};
use crate::storage::Storage;

/// Extension of record files. The category id is the file stem.
const RECORD_EXTENSION: &str = ".json";

/// File name holding the offline copy of a category.
pub fn record_file_name(id: &str) -> String {
    format!("{}{}", id, RECORD_EXTENSION)
}

/// Recover the category id from a record file name.
/// Returns `None` for anything that is not a record file.
pub fn category_id_from_file_name(name: &str) -> Option<&str> {
    name.strip_suffix(RECORD_EXTENSION)
        .filter(|stem| is_valid_category_id(stem))
}

/// Temp files left by an interrupted write of a record file.
fn is_temp_file(name: &str) -> bool {
    name.strip_prefix(TEMP_PREFIX)
        .and_then(|rest| rest.strip_suffix(TEMP_SUFFIX))
        .and_then(category_id_from_file_name)
        .is_some()
}

/// A record as persisted for offline use: the catalog record's own JSON
/// plus a `savedAt` key. Files without `savedAt` (a bare record) still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecord {
    #[serde(flatten)]
    pub record: MedicalRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedRecord {
    pub fn new(record: MedicalRecord) -> Self {
        Self {
            record,
            saved_at: Some(Utc::now()),
        }
    }

    pub fn age_minutes(&self) -> Option<i64> {
        self.saved_at.map(|at| (Utc::now() - at).num_minutes())
    }

    pub fn age_display(&self) -> String {
        let Some(minutes) = self.age_minutes() else {
            return "at an unknown time".to_string();
        };
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    /// Whether the catalog has changed this record since it was saved.
    pub fn is_outdated(&self, current: &MedicalRecord) -> bool {
        self.record != *current
    }
}

/// Mirrors catalog records into local storage for offline reading.
pub struct OfflineCache<S: Storage> {
    catalog: Arc<ReferenceCatalog>,
    storage: S,
    index: OfflineIndex,
}

impl<S: Storage> OfflineCache<S> {
    /// Create a cache with an empty index. Call `initialize` before use.
    pub fn new(catalog: Arc<ReferenceCatalog>, storage: S) -> Self {
        Self {
            catalog,
            storage,
            index: OfflineIndex::default(),
        }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn index(&self) -> &OfflineIndex {
        &self.index
    }

    /// Rebuild the index from the storage listing.
    ///
    /// On failure the index is left empty and the cache keeps working in
    /// online-only mode.
    pub fn initialize(&mut self) -> Result<&OfflineIndex, OfflineError> {
        match self.scan() {
            Ok(index) => {
                debug!(count = index.len(), "Offline index loaded");
                self.index = index;
                Ok(&self.index)
            }
            Err(source) => {
                warn!(error = %source, "Offline storage unavailable, continuing online-only");
                self.index = OfflineIndex::default();
                Err(OfflineError::StorageUnavailable { source })
            }
        }
    }

    fn scan(&self) -> io::Result<OfflineIndex> {
        if !self.storage.root_exists()? {
            self.storage.ensure_root()?;
            return Ok(OfflineIndex::default());
        }

        let mut index = OfflineIndex::default();
        for name in self.storage.list()? {
            if let Some(id) = category_id_from_file_name(&name) {
                index.insert(id.to_string());
            } else if is_temp_file(&name) {
                // Leftover from an interrupted save
                match self.storage.remove(&name) {
                    Ok(()) => debug!(file = %name, "Removed stale temp file"),
                    Err(e) => debug!(file = %name, error = %e, "Failed to remove stale temp file"),
                }
            }
        }
        Ok(index)
    }

    pub fn is_available_offline(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Persist the catalog record for `id`. Saving an already saved
    /// category overwrites its file.
    pub fn save_for_offline(&mut self, id: &str) -> Result<&OfflineIndex, OfflineError> {
        let record = self
            .catalog
            .get(id)
            .ok_or_else(|| OfflineError::RecordNotFound(id.to_string()))?;

        let persist_failed = |source: io::Error| OfflineError::PersistFailed {
            id: id.to_string(),
            source,
        };

        let contents = serde_json::to_string_pretty(&SavedRecord::new(record.clone()))
            .map_err(|e| persist_failed(e.into()))?;

        self.storage
            .ensure_root()
            .and_then(|()| self.storage.write(&record_file_name(id), &contents))
            .map_err(persist_failed)?;

        self.index.insert(id.to_string());
        info!(category = %id, "Saved category for offline use");
        Ok(&self.index)
    }

    /// Delete the offline copy of `id`. Removing a category that is not
    /// saved is a no-op.
    pub fn remove_offline_content(&mut self, id: &str) -> Result<&OfflineIndex, OfflineError> {
        if !self.index.contains(id) {
            debug!(category = %id, "Category not saved, nothing to remove");
            return Ok(&self.index);
        }

        match self.storage.remove(&record_file_name(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(category = %id, "Offline file already gone");
            }
            Err(source) => {
                return Err(OfflineError::DeleteFailed {
                    id: id.to_string(),
                    source,
                })
            }
        }

        self.index.remove(id);
        info!(category = %id, "Removed offline content");
        Ok(&self.index)
    }

    /// Read back the offline copy of `id`, if one is saved.
    pub fn load_offline(&self, id: &str) -> Result<Option<SavedRecord>, OfflineError> {
        if !self.index.contains(id) {
            return Ok(None);
        }

        let read_failed = |source: io::Error| OfflineError::ReadFailed {
            id: id.to_string(),
            source,
        };

        let contents = self.storage.read(&record_file_name(id)).map_err(read_failed)?;
        let saved: SavedRecord =
            serde_json::from_str(&contents).map_err(|e| read_failed(e.into()))?;
        Ok(Some(saved))
    }

    /// Catalog entries in order, flagged with their offline status.
    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.catalog
            .iter()
            .map(|record| record.summary(self.index.contains(&record.id)))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
