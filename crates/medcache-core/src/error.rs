use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the offline cache.
#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("Offline storage unavailable: {source}")]
    StorageUnavailable {
        #[source]
        source: std::io::Error,
    },

    #[error("Category not found in catalog: {0}")]
    RecordNotFound(String),

    #[error("Failed to save category {id} for offline use: {source}")]
    PersistFailed {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove offline copy of category {id}: {source}")]
    DeleteFailed {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read offline copy of category {id}: {source}")]
    ReadFailed {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

impl OfflineError {
    /// Short notice suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            OfflineError::StorageUnavailable { .. } => {
                "Offline storage is unavailable. Content is only available online."
            }
            OfflineError::RecordNotFound(_) => "Could not find the data for this category.",
            OfflineError::PersistFailed { .. } => "Failed to save content for offline use.",
            OfflineError::DeleteFailed { .. } => "Failed to remove offline content.",
            OfflineError::ReadFailed { .. } => "Failed to open the offline copy.",
        }
    }

    /// Whether retrying the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OfflineError::PersistFailed { .. }
                | OfflineError::DeleteFailed { .. }
                | OfflineError::ReadFailed { .. }
        )
    }
}

/// Errors raised while building the reference catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid category id: {0:?}")]
    InvalidId(String),

    #[error("Duplicate category id: {0}")]
    DuplicateId(String),
}
