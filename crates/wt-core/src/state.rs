//! Entry lifecycle manager: the authoritative in-memory store of entries.
//!
//! Entries are bucketed by [`MonthKey`] and written through to a pluggable
//! persistence collaborator on every mutation, so a completed operation is
//! durably saved before it returns. Invariant violations are rejected before
//! any mutation is applied.

use std::collections::BTreeMap;
use std::io;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::entry::{Entry, MonthKey};
use crate::retrieve::EntryRetriever;

/// Persistence collaborator for month-bucketed entries.
///
/// `load_all` runs once at construction; `save_month` replaces the named
/// bucket's full record.
pub trait EntryPersistence {
    fn load_all(&mut self) -> io::Result<BTreeMap<MonthKey, Vec<Entry>>>;
    fn save_month(&mut self, key: MonthKey, entries: &[Entry]) -> io::Result<()>;
}

/// A rejected entry-store operation.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("cannot clock in while another entry is open")]
    AlreadyClockedIn,
    #[error("no open entry to close")]
    NoOpenEntry,
    #[error("entry end must be after its start")]
    EndBeforeStart,
    #[error("saving this entry would leave two entries open")]
    SecondOpenEntry,
    #[error("failed to persist entries: {0}")]
    Persist(#[from] io::Error),
}

/// Mutable in-memory index of all entries, keyed by month.
pub struct TrackerState<S: EntryPersistence> {
    store: S,
    entries_by_month: BTreeMap<MonthKey, Vec<Entry>>,
}

impl<S: EntryPersistence> TrackerState<S> {
    /// Loads all entries and performs startup housekeeping: entries left open
    /// on a day before `today` are closed at 23:59 of their start date, so a
    /// forgotten clock-out cannot accumulate time across days.
    pub fn load(mut store: S, today: NaiveDate) -> Result<Self, StateError> {
        let entries_by_month = store.load_all()?;
        let mut state = Self {
            store,
            entries_by_month,
        };
        state.close_overnight_entries(today)?;
        Ok(state)
    }

    /// All entries across all buckets, in bucket order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries_by_month.values().flatten()
    }

    /// The single open entry system-wide, if any.
    pub fn open_entry(&self) -> Option<&Entry> {
        self.entries().find(|entry| entry.is_open())
    }

    /// Looks up an entry by id across all buckets.
    pub fn find_entry(&self, id: &str) -> Option<&Entry> {
        self.entries().find(|entry| entry.id == id)
    }

    /// Entries in a month bucket, sorted by start.
    pub fn entries_for_month(&self, key: MonthKey) -> &[Entry] {
        self.entries_by_month
            .get(&key)
            .map_or(&[], Vec::as_slice)
    }

    /// Starts a new open entry at the given time.
    ///
    /// Fails with [`StateError::AlreadyClockedIn`] if an entry is open.
    pub fn clock_in(&mut self, at: NaiveDateTime) -> Result<Entry, StateError> {
        if self.open_entry().is_some() {
            return Err(StateError::AlreadyClockedIn);
        }
        let entry = Entry::new(at);
        self.insert_entry(entry.clone())?;
        Ok(entry)
    }

    /// Closes the open entry at the given time.
    ///
    /// Fails with [`StateError::NoOpenEntry`] when nothing is running, or
    /// [`StateError::EndBeforeStart`] if `at` does not come after the start.
    pub fn clock_out(&mut self, at: NaiveDateTime) -> Result<Entry, StateError> {
        let open = self.open_entry().ok_or(StateError::NoOpenEntry)?;
        if at <= open.start {
            return Err(StateError::EndBeforeStart);
        }
        let updated = open.closed_at(at);
        self.replace_entry(updated.clone())?;
        Ok(updated)
    }

    /// Upserts an entry by id, moving it between month buckets if its start
    /// date changed. Validates invariants before mutating anything.
    pub fn save_entry(&mut self, entry: Entry) -> Result<(), StateError> {
        if let Some(end) = entry.end {
            if end <= entry.start {
                return Err(StateError::EndBeforeStart);
            }
        } else if self
            .open_entry()
            .is_some_and(|open| open.id != entry.id)
        {
            return Err(StateError::SecondOpenEntry);
        }
        self.replace_entry(entry)
    }

    /// Removes an entry by id from whichever buckets contain it. Returns
    /// whether anything was removed.
    pub fn delete_entry(&mut self, id: &str) -> Result<bool, StateError> {
        let mut removed = false;
        let affected: Vec<MonthKey> = self
            .entries_by_month
            .iter()
            .filter(|(_, entries)| entries.iter().any(|entry| entry.id == id))
            .map(|(key, _)| *key)
            .collect();
        for key in affected {
            if let Some(bucket) = self.entries_by_month.get_mut(&key) {
                bucket.retain(|entry| entry.id != id);
                removed = true;
            }
            self.persist_month(key)?;
        }
        Ok(removed)
    }

    /// Removes any existing record with the entry's id, then inserts the new
    /// value into the bucket derived from its (possibly new) start date.
    fn replace_entry(&mut self, entry: Entry) -> Result<(), StateError> {
        let old_key = self
            .entries_by_month
            .iter()
            .find(|(_, entries)| entries.iter().any(|existing| existing.id == entry.id))
            .map(|(key, _)| *key);
        if let Some(key) = old_key {
            if let Some(bucket) = self.entries_by_month.get_mut(&key) {
                bucket.retain(|existing| existing.id != entry.id);
            }
            self.persist_month(key)?;
        }
        self.insert_entry(entry)
    }

    fn insert_entry(&mut self, entry: Entry) -> Result<(), StateError> {
        let key = MonthKey::from_date(entry.start_date());
        let bucket = self.entries_by_month.entry(key).or_default();
        bucket.push(entry);
        bucket.sort_by_key(|entry| entry.start);
        self.persist_month(key)?;
        Ok(())
    }

    fn persist_month(&mut self, key: MonthKey) -> Result<(), StateError> {
        let entries = self.entries_by_month.get(&key).map_or(&[][..], Vec::as_slice);
        self.store.save_month(key, entries)?;
        Ok(())
    }

    fn close_overnight_entries(&mut self, today: NaiveDate) -> Result<(), StateError> {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).expect("valid closing time");
        let mut affected = Vec::new();
        for (key, entries) in &mut self.entries_by_month {
            let mut changed = false;
            for entry in entries.iter_mut() {
                if entry.is_open() && entry.start_date() < today {
                    entry.end = Some(entry.start_date().and_time(end_of_day));
                    changed = true;
                }
            }
            if changed {
                entries.sort_by_key(|entry| entry.start);
                affected.push(*key);
                tracing::warn!(bucket = %key, "closed entries left open overnight");
            }
        }
        for key in affected {
            self.persist_month(key)?;
        }
        Ok(())
    }
}

impl<S: EntryPersistence> EntryRetriever for TrackerState<S> {
    fn entries_for_day(&self, day: NaiveDate) -> Vec<Entry> {
        let key = MonthKey::from_date(day);
        let mut entries: Vec<Entry> = self
            .entries_for_month(key)
            .iter()
            .filter(|entry| entry.start_date() == day)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.start);
        entries
    }
}
