//! Application context shared by every command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use wt_core::{AbsenceRule, ConfigAbsences, TrackerConfig, TrackerState, sort_rules};
use wt_store::{JsonAbsenceStore, JsonConfigStore, JsonEntryStore};

use crate::CliConfig;

/// Open stores plus the loaded tracker configuration.
///
/// `config.json` lives in the base data directory and may redirect the entry
/// and absence files to another directory via its `data_dir` field. Absence
/// rules found inline in an older `config.json` are migrated into the
/// per-year files on first load.
pub struct App {
    pub config: TrackerConfig,
    pub state: TrackerState<JsonEntryStore>,
    config_store: JsonConfigStore,
    absence_store: JsonAbsenceStore,
}

impl App {
    /// Opens all stores under the configured data directory and runs startup
    /// housekeeping relative to `today`.
    pub fn open(cli_config: &CliConfig, today: NaiveDate) -> Result<Self> {
        let base = &cli_config.data_dir;
        let config_store = JsonConfigStore::new(base.join("config.json"));
        let mut config = config_store
            .load()
            .context("failed to load tracker configuration")?;

        let data_dir: PathBuf = config.data_dir.clone().unwrap_or_else(|| base.clone());
        tracing::debug!(data_dir = %data_dir.display(), "opening data directory");

        let absence_store = JsonAbsenceStore::open(data_dir.join("absences"))
            .context("failed to open absence storage")?;
        let mut rules = absence_store
            .load_all()
            .context("failed to load absence rules")?;
        if rules.is_empty() && !config.absences.is_empty() {
            rules = config.absences.clone();
            sort_rules(&mut rules);
            absence_store
                .save_rules(&rules)
                .context("failed to migrate absence rules")?;
            tracing::info!(count = rules.len(), "migrated inline absence rules");
        }
        config.absences = rules;

        let entry_store =
            JsonEntryStore::open(data_dir.join("entries")).context("failed to open entry storage")?;
        let state = TrackerState::load(entry_store, today).context("failed to load entries")?;

        Ok(Self {
            config,
            state,
            config_store,
            absence_store,
        })
    }

    /// Absence retriever backed by the loaded rules.
    pub fn absences(&self) -> ConfigAbsences<'_> {
        ConfigAbsences::new(&self.config)
    }

    /// Persists the current configuration (absence rules excluded, they have
    /// their own files).
    pub fn save_config(&self) -> Result<()> {
        self.config_store
            .save(&self.config)
            .context("failed to save configuration")
    }

    /// Replaces the absence rule set, persisting it sorted.
    pub fn save_absences(&mut self, mut rules: Vec<AbsenceRule>) -> Result<()> {
        sort_rules(&mut rules);
        self.absence_store
            .save_rules(&rules)
            .context("failed to save absence rules")?;
        self.config.absences = rules;
        Ok(())
    }
}
