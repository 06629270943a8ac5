//! Year-bucketed absence rule files.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use wt_core::absence::{AbsenceRule, sort_rules};

use crate::StoreError;

/// Absence storage: one JSON array per year, bucketed by each rule's start.
#[derive(Debug)]
pub struct JsonAbsenceStore {
    base_dir: PathBuf,
}

impl JsonAbsenceStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn path_for_year(&self, year: i32) -> PathBuf {
        self.base_dir.join(format!("{year}.json"))
    }

    /// Years that currently have a bucket file on disk.
    fn existing_years(&self) -> Result<BTreeSet<i32>, StoreError> {
        let mut years = BTreeSet::new();
        for dir_entry in std::fs::read_dir(&self.base_dir)? {
            let path = dir_entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(year) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<i32>().ok())
            {
                years.insert(year);
            }
        }
        Ok(years)
    }

    /// Loads every rule across all year buckets, sorted by
    /// `(start, effective end, reason)`. Malformed items are skipped.
    pub fn load_all(&self) -> Result<Vec<AbsenceRule>, StoreError> {
        let mut rules = Vec::new();
        for year in self.existing_years()? {
            let file = File::open(self.path_for_year(year))?;
            let items: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))?;
            for item in items {
                match serde_json::from_value::<AbsenceRule>(item) {
                    Ok(rule) => rules.push(rule),
                    Err(error) => {
                        tracing::warn!(year, %error, "skipping malformed absence rule");
                    }
                }
            }
        }
        sort_rules(&mut rules);
        Ok(rules)
    }

    /// Rewrites the full rule set: one sorted file per referenced year,
    /// removing year buckets no longer referenced by any rule.
    pub fn save_rules(&self, rules: &[AbsenceRule]) -> Result<(), StoreError> {
        let mut buckets: BTreeMap<i32, Vec<AbsenceRule>> = BTreeMap::new();
        for rule in rules {
            buckets
                .entry(rule.bucket_year())
                .or_default()
                .push(rule.clone());
        }

        let existing = self.existing_years()?;
        for (year, year_rules) in &mut buckets {
            sort_rules(year_rules);
            let file = File::create(self.path_for_year(*year))?;
            serde_json::to_writer_pretty(BufWriter::new(file), year_rules)?;
        }
        for stale_year in existing {
            if !buckets.contains_key(&stale_year) {
                std::fs::remove_file(self.path_for_year(stale_year))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rule(y: i32, m: u32, d: u32, reason: &str) -> AbsenceRule {
        AbsenceRule {
            start: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            end: None,
            reason: reason.to_string(),
            hours: None,
        }
    }

    #[test]
    fn rules_roundtrip_across_year_buckets() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonAbsenceStore::open(temp.path()).unwrap();

        let rules = vec![
            rule(2025, 7, 1, "summer"),
            rule(2024, 12, 24, "christmas"),
            rule(2025, 1, 1, "new year"),
        ];
        store.save_rules(&rules).unwrap();

        assert!(temp.path().join("2024.json").exists());
        assert!(temp.path().join("2025.json").exists());

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 3);
        // Sorted by start across buckets.
        assert_eq!(loaded[0].reason, "christmas");
        assert_eq!(loaded[1].reason, "new year");
        assert_eq!(loaded[2].reason, "summer");
    }

    #[test]
    fn stale_year_buckets_are_removed_on_save() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonAbsenceStore::open(temp.path()).unwrap();

        store.save_rules(&[rule(2023, 5, 1, "old")]).unwrap();
        assert!(temp.path().join("2023.json").exists());

        store.save_rules(&[rule(2025, 5, 1, "new")]).unwrap();
        assert!(!temp.path().join("2023.json").exists());
        assert!(temp.path().join("2025.json").exists());
    }

    #[test]
    fn malformed_rules_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("2025.json"),
            r#"[
                {"start": "2025-03-03", "reason": "ok"},
                {"start": "yesterday-ish"}
            ]"#,
        )
        .unwrap();
        let store = JsonAbsenceStore::open(temp.path()).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].reason, "ok");
    }

    #[test]
    fn non_year_files_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("backup.json"), "[]").unwrap();
        let store = JsonAbsenceStore::open(temp.path()).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }
}
