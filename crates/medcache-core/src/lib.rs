//! Core library for medcache.
//!
//! Provides the medical reference catalog and an offline cache that keeps
//! durable local copies of selected categories:
//!
//! - `catalog`: the immutable, validated reference catalog
//! - `models`: record and summary types
//! - `storage`: the local storage medium (`FsStorage`, `MemoryStorage`)
//! - `cache`: `OfflineCache` with save, remove and availability queries
//! - `config`: configuration file and directory resolution

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod utils;

pub use cache::{OfflineCache, OfflineIndex, SavedRecord};
pub use catalog::ReferenceCatalog;
pub use config::Config;
pub use error::{CatalogError, OfflineError};
pub use models::{CategorySummary, MedicalRecord, RecordContent, RecordSection};
pub use storage::{FsStorage, MemoryStorage, Storage};
