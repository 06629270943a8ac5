//! Core domain logic for the worktime tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Entity model: time entries, absence rules, workday configuration
//! - Day summarizer and range aggregator: expected/worked/remaining hours
//! - Period builder: per-day records grouped into weeks, months, years
//! - Entry lifecycle: clock-in/out, edits, and the single-open-entry invariant

pub mod absence;
pub mod config;
pub mod entry;
pub mod period;
pub mod retrieve;
pub mod state;
pub mod summary;

pub use absence::{AbsenceRule, sort_rules};
pub use config::{DEFAULT_HOURS_PER_DAY, DEFAULT_WORKDAYS, ExpectedMode, TrackerConfig};
pub use entry::{Entry, MonthKey, ParseMonthKeyError};
pub use period::{
    DayDetails, MonthDetails, PeriodError, SummaryResult, WeekDetails, YearDetails, day_summary,
    month_summary, week_summary, year_summary,
};
pub use retrieve::{AbsenceRetriever, ConfigAbsences, EntryRetriever};
pub use state::{EntryPersistence, StateError, TrackerState};
pub use summary::{DayWorkSummary, RangeSummary, WORKED_DAY_EPSILON, summarize_day, summarize_range};
