//! JSON file storage for the worktime tracker.
//!
//! Three stores share one data directory:
//! - entries: one JSON array per month under `entries/YYYY-MM.json`
//! - absences: one JSON array per year under `absences/<year>.json`
//! - config: a single `config.json` with documented field fallbacks
//!
//! All writes rewrite the affected file in full. Malformed records inside a
//! file are skipped with a warning rather than aborting startup.

mod absences;
mod config;
mod entries;

use thiserror::Error;

pub use absences::JsonAbsenceStore;
pub use config::JsonConfigStore;
pub use entries::JsonEntryStore;

/// Storage layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
