//! Data models for the medical reference catalog.
//!
//! - `MedicalRecord`: one category of the reference catalog, with its full body
//! - `RecordContent`, `RecordSection`: the structured body of a record
//! - `CategorySummary`: list-view projection of a record plus its offline status

pub mod record;

pub use record::{CategorySummary, MedicalRecord, RecordContent, RecordSection};
