//! Month-bucketed entry files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use wt_core::entry::{Entry, MonthKey};
use wt_core::state::EntryPersistence;

/// Entry storage: one pretty-printed JSON array per month bucket.
#[derive(Debug)]
pub struct JsonEntryStore {
    base_dir: PathBuf,
}

impl JsonEntryStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn path_for(&self, key: MonthKey) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Loads one month bucket, skipping malformed items.
    pub fn load_month(&self, key: MonthKey) -> io::Result<Vec<Entry>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_entry_file(&path)
    }
}

impl EntryPersistence for JsonEntryStore {
    fn load_all(&mut self) -> io::Result<BTreeMap<MonthKey, Vec<Entry>>> {
        let mut result = BTreeMap::new();
        for dir_entry in std::fs::read_dir(&self.base_dir)? {
            let path = dir_entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<MonthKey>().ok())
            else {
                tracing::warn!(path = ?path, "skipping entry file with unrecognized name");
                continue;
            };
            result.insert(key, read_entry_file(&path)?);
        }
        Ok(result)
    }

    fn save_month(&mut self, key: MonthKey, entries: &[Entry]) -> io::Result<()> {
        let file = File::create(self.path_for(key))?;
        serde_json::to_writer_pretty(BufWriter::new(file), entries)?;
        Ok(())
    }
}

fn read_entry_file(path: &Path) -> io::Result<Vec<Entry>> {
    let file = File::open(path)?;
    let items: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))?;
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Entry>(item) {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                tracing::warn!(path = ?path, %error, "skipping malformed entry");
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn entry(y: i32, m: u32, d: u32, h: u32) -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap()),
        )
    }

    #[test]
    fn save_and_reload_month_buckets() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = JsonEntryStore::open(temp.path()).unwrap();

        let january = MonthKey { year: 2025, month: 1 };
        let february = MonthKey { year: 2025, month: 2 };
        let jan_entries = vec![entry(2025, 1, 6, 9), entry(2025, 1, 7, 9)];
        let feb_entries = vec![entry(2025, 2, 3, 10)];
        store.save_month(january, &jan_entries).unwrap();
        store.save_month(february, &feb_entries).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&january], jan_entries);
        assert_eq!(loaded[&february], feb_entries);
    }

    #[test]
    fn malformed_items_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("2025-01.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "good", "start": "2025-01-06T09:00", "end": "2025-01-06T10:00"},
                {"id": "bad", "start": "not a timestamp", "end": null},
                {"unrelated": true}
            ]"#,
        )
        .unwrap();

        let mut store = JsonEntryStore::open(temp.path()).unwrap();
        let loaded = store.load_all().unwrap();
        let bucket = &loaded[&MonthKey { year: 2025, month: 1 }];
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].id, "good");
    }

    #[test]
    fn files_with_unrecognized_names_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("notes.json"), "[]").unwrap();
        std::fs::write(temp.path().join("2025-01.txt"), "ignored").unwrap();

        let mut store = JsonEntryStore::open(temp.path()).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn missing_month_loads_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonEntryStore::open(temp.path()).unwrap();
        let key = MonthKey { year: 2030, month: 12 };
        assert!(store.load_month(key).unwrap().is_empty());
    }
}
