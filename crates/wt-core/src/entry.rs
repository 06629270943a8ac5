//! Tracked time entries and month-key bucketing.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Seconds in an hour, as float for duration math.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// A tracked work period between two timestamps.
///
/// An entry with no `end` is *open* (currently running). At most one entry
/// system-wide may be open at a time; [`crate::TrackerState`] enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, stable across edits.
    pub id: String,
    /// When the period started.
    #[serde(with = "minute_ts")]
    pub start: NaiveDateTime,
    /// When the period ended, or `None` while still running.
    #[serde(default, with = "minute_ts_opt")]
    pub end: Option<NaiveDateTime>,
}

impl Entry {
    /// Creates a new open entry starting at the given time.
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start,
            end: None,
        }
    }

    /// Whether this entry is still running.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Calendar date the entry started on. Entries belong to this date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Hours covered by this entry, floored at zero.
    ///
    /// For an open entry, `now` supplies the reference instant; without one an
    /// open entry contributes no time. Closed entries ignore `now`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_hours(&self, now: Option<NaiveDateTime>) -> f64 {
        let Some(effective_end) = self.end.or(now) else {
            return 0.0;
        };
        let seconds = (effective_end - self.start).num_seconds() as f64;
        (seconds / SECONDS_PER_HOUR).max(0.0)
    }

    /// Returns a copy of this entry closed at the given time.
    #[must_use]
    pub fn closed_at(&self, end: NaiveDateTime) -> Self {
        Self {
            end: Some(end),
            ..self.clone()
        }
    }
}

/// Structured `(year, month)` key for entry buckets.
///
/// Displayed and persisted as `YYYY-MM`; kept structured internally so
/// formatting bugs cannot corrupt bucket lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Derives the bucket key for a calendar date.
    #[must_use]
    pub fn from_date(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error parsing a `YYYY-MM` month key.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month key: {0}")]
pub struct ParseMonthKeyError(pub String);

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMonthKeyError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

/// Minute-precision timestamp serialization (`%Y-%m-%dT%H:%M`).
///
/// Seconds are not persisted; the loader accepts them for compatibility but
/// round-tripping a sub-minute value is lossy.
pub(crate) mod minute_ts {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M";
    const FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(value, FORMAT_WITH_SECONDS))
            .ok()
    }

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid minute timestamp: {value}")))
    }
}

/// Optional variant of [`minute_ts`]; `None` serializes as `null`.
pub(crate) mod minute_ts_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::minute_ts;

    pub fn serialize<S: Serializer>(
        ts: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.collect_str(&ts.format(minute_ts::FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        match value {
            None => Ok(None),
            Some(value) => minute_ts::parse(&value)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid minute timestamp: {value}"))),
        }
    }
}
