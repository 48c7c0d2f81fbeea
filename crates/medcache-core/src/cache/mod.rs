//! Offline copies of reference catalog records.
//!
//! `OfflineCache` mirrors a chosen subset of the catalog into a local
//! `Storage`, one `<id>.json` file per category. The set of saved ids
//! (`OfflineIndex`) is always re-derived from the storage listing at
//! startup, so the files on disk are the source of truth.

pub mod index;
pub mod manager;

pub use index::OfflineIndex;
pub use manager::{category_id_from_file_name, record_file_name, OfflineCache, SavedRecord};
