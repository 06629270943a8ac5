//! Workday configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::absence::AbsenceRule;

/// How the expected target for a period is chosen when comparing totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedMode {
    /// Compare against the full period's expected hours.
    #[default]
    FullPeriod,
    /// Cap the expected target at today's date within the period.
    ToDate,
}

impl ExpectedMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullPeriod => "full_period",
            Self::ToDate => "to_date",
        }
    }
}

impl std::fmt::Display for ExpectedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExpectedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_period" => Ok(Self::FullPeriod),
            "to_date" => Ok(Self::ToDate),
            _ => Err(format!("invalid expected mode: {s}")),
        }
    }
}

/// Process-wide tracker configuration.
///
/// Loaded once at startup and persisted only through an explicit save.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Target hours on a workday.
    pub hours_per_day: u32,
    /// Weekday indices expected to be worked, 0 = Monday .. 6 = Sunday.
    ///
    /// An empty set makes every day a workday. This fallback is long-standing
    /// behavior; callers that want "no workdays" cannot express it.
    pub workdays: BTreeSet<u8>,
    /// Absence rules crediting hours against the expected total.
    pub absences: Vec<AbsenceRule>,
    /// Comparison mode for period summaries.
    pub expected_mode: ExpectedMode,
    /// Optional override for the data directory.
    pub data_dir: Option<PathBuf>,
}

/// Default workdays: Monday through Friday.
pub const DEFAULT_WORKDAYS: [u8; 5] = [0, 1, 2, 3, 4];

/// Default target hours per workday.
pub const DEFAULT_HOURS_PER_DAY: u32 = 8;

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            workdays: DEFAULT_WORKDAYS.into_iter().collect(),
            absences: Vec::new(),
            expected_mode: ExpectedMode::default(),
            data_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Whether hours are expected on the given date.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn is_workday(&self, day: NaiveDate) -> bool {
        if self.workdays.is_empty() {
            return true;
        }
        self.workdays
            .contains(&(day.weekday().num_days_from_monday() as u8))
    }
}
