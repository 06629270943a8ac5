//! Day and range summary computation.
//!
//! [`summarize_day`] is the heart of the tracker: given the entries and
//! absence rules for one date plus the workday configuration, it derives how
//! many hours were expected, worked, remaining, and overworked. It is a pure
//! function so it can be tested with ad-hoc entries and absence values.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::absence::AbsenceRule;
use crate::config::TrackerConfig;
use crate::entry::Entry;

/// Float-noise guard for the worked-day flag. Not a business threshold.
pub const WORKED_DAY_EPSILON: f64 = 1e-6;

/// Computed metrics for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayWorkSummary {
    pub day: NaiveDate,
    /// Target hours after absence credit; zero on non-workdays.
    pub expected: f64,
    pub worked: f64,
    /// `max(expected - worked, 0)`.
    pub remaining: f64,
    /// `max(worked - expected, 0)`.
    pub overworked: f64,
    pub is_workday: bool,
    /// Whether any time was logged (above [`WORKED_DAY_EPSILON`]).
    pub worked_day: bool,
    /// Absence credit actually applied; zero on non-workdays.
    pub absence_hours: f64,
}

/// Termwise totals over a sequence of day summaries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RangeSummary {
    pub total_expected: f64,
    pub total_worked: f64,
    pub total_remaining: f64,
    pub total_overworked: f64,
    pub workdays: usize,
    pub worked_days: usize,
}

/// Summarizes one day's worth of entries and absences.
///
/// `now` is a reference instant for still-open entries; callers supply it only
/// when evaluating the live today. Open entries contribute zero without it.
///
/// Absence credit applies only on workdays and stacks additively across rules
/// covering the day. Credit reduces `expected`, never `worked`, so a fully
/// credited day with logged time shows up as overwork.
#[must_use]
pub fn summarize_day(
    day: NaiveDate,
    entries: &[Entry],
    absences: &[AbsenceRule],
    config: &TrackerConfig,
    now: Option<NaiveDateTime>,
) -> DayWorkSummary {
    let is_workday = config.is_workday(day);
    let absence_credit = if is_workday {
        absence_hours(absences, config)
    } else {
        0.0
    };
    let base_expected = if is_workday {
        f64::from(config.hours_per_day)
    } else {
        0.0
    };
    let expected = (base_expected - absence_credit).max(0.0);
    let worked: f64 = entries.iter().map(|entry| entry.duration_hours(now)).sum();
    DayWorkSummary {
        day,
        expected,
        worked,
        remaining: (expected - worked).max(0.0),
        overworked: (worked - expected).max(0.0),
        is_workday,
        worked_day: worked > WORKED_DAY_EPSILON,
        absence_hours: absence_credit,
    }
}

/// Folds day summaries into range totals. Order-independent; empty input
/// yields all zeros.
pub fn summarize_range<'a, I>(days: I) -> RangeSummary
where
    I: IntoIterator<Item = &'a DayWorkSummary>,
{
    let mut totals = RangeSummary::default();
    for day in days {
        totals.total_expected += day.expected;
        totals.total_worked += day.worked;
        totals.total_remaining += day.remaining;
        totals.total_overworked += day.overworked;
        totals.workdays += usize::from(day.is_workday);
        totals.worked_days += usize::from(day.worked_day);
    }
    totals
}

/// Credited hours for the rules covering a day. Rules without explicit hours
/// credit a full configured workday; overlapping rules stack.
fn absence_hours(absences: &[AbsenceRule], config: &TrackerConfig) -> f64 {
    absences
        .iter()
        .map(|rule| rule.hours.unwrap_or(f64::from(config.hours_per_day)))
        .sum()
}
