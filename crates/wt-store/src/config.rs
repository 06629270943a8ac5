//! Tracker configuration file.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wt_core::absence::AbsenceRule;
use wt_core::config::{DEFAULT_WORKDAYS, ExpectedMode, TrackerConfig};

use crate::StoreError;

/// Configuration storage: a single `config.json` in the data directory.
///
/// Loading is lenient: a missing file yields the defaults, and individual
/// fields fall back rather than failing the whole load. Older files may use
/// `exceptions` in place of `absences`.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
}

/// On-disk shape. Every field is optional so partial files still load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hours_per_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workdays: Option<Vec<u8>>,
    #[serde(default, alias = "exceptions", skip_serializing_if = "Option::is_none")]
    absences: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary_expected_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_dir: Option<PathBuf>,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the configuration, falling back to defaults field by field.
    pub fn load(&self) -> Result<TrackerConfig, StoreError> {
        if !self.path.exists() {
            return Ok(TrackerConfig::default());
        }
        let file = File::open(&self.path)?;
        let payload: ConfigPayload = serde_json::from_reader(BufReader::new(file))?;
        Ok(resolve_payload(payload))
    }

    /// Writes the configuration. Absence rules are persisted separately and
    /// are not written here.
    pub fn save(&self, config: &TrackerConfig) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = ConfigPayload {
            hours_per_day: Some(config.hours_per_day),
            workdays: Some(config.workdays.iter().copied().collect()),
            absences: None,
            summary_expected_mode: Some(config.expected_mode.as_str().to_string()),
            data_dir: config.data_dir.clone(),
        };
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &payload)?;
        Ok(())
    }
}

fn resolve_payload(payload: ConfigPayload) -> TrackerConfig {
    let defaults = TrackerConfig::default();

    let workdays: BTreeSet<u8> = payload
        .workdays
        .unwrap_or_default()
        .into_iter()
        .filter(|weekday| {
            let valid = *weekday <= 6;
            if !valid {
                tracing::warn!(weekday, "ignoring out-of-range workday index");
            }
            valid
        })
        .collect();
    let workdays = if workdays.is_empty() {
        DEFAULT_WORKDAYS.into_iter().collect()
    } else {
        workdays
    };

    let expected_mode = payload
        .summary_expected_mode
        .map_or(ExpectedMode::default(), |raw| {
            raw.parse().unwrap_or_else(|_| {
                tracing::warn!(mode = %raw, "unknown expected mode, using default");
                ExpectedMode::default()
            })
        });

    let mut absences = Vec::new();
    for item in payload.absences.unwrap_or_default() {
        match serde_json::from_value::<AbsenceRule>(item) {
            Ok(rule) => absences.push(rule),
            Err(error) => {
                tracing::warn!(%error, "skipping malformed absence rule in config");
            }
        }
    }

    TrackerConfig {
        hours_per_day: payload.hours_per_day.unwrap_or(defaults.hours_per_day),
        workdays,
        absences,
        expected_mode,
        data_dir: payload.data_dir,
    }
}
