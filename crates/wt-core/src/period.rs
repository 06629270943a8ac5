//! Period queries: per-day detail records grouped into weeks, months, years.
//!
//! Each query enumerates every calendar date in the range, summarizes it, and
//! returns both the folded [`RangeSummary`] and a hierarchical period record
//! for detailed rendering. The hierarchy is built bottom-up from the flat
//! per-day list: weeks group by ISO calendar `(year, week)`, months by
//! calendar `(year, month)`, and a year decomposes into months into weeks.
//! Group records span only the days actually present in the input range.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::absence::AbsenceRule;
use crate::config::TrackerConfig;
use crate::entry::Entry;
use crate::retrieve::{AbsenceRetriever, EntryRetriever};
use crate::summary::{DayWorkSummary, RangeSummary, summarize_day, summarize_range};

/// A single day's record: inputs plus the computed summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayDetails {
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
    pub absences: Vec<AbsenceRule>,
    pub summary: DayWorkSummary,
}

/// Days sharing one ISO calendar week, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekDetails {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayDetails>,
}

/// A calendar month's days, decomposed into ISO weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthDetails {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weeks: Vec<WeekDetails>,
}

/// A year's days, decomposed into months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearDetails {
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub months: Vec<MonthDetails>,
}

/// Aggregated totals plus the hierarchical period record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult<P> {
    pub summary: RangeSummary,
    pub period: P,
}

/// Invalid input to a period query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("day summaries require matching start and end dates")]
    MismatchedDayRange,
}

/// Summarizes a single day. `start` and `end` must match.
pub fn day_summary<E, A>(
    start: NaiveDate,
    end: NaiveDate,
    entries: &E,
    absences: &A,
    config: &TrackerConfig,
    now: Option<NaiveDateTime>,
) -> Result<SummaryResult<DayDetails>, PeriodError>
where
    E: EntryRetriever + ?Sized,
    A: AbsenceRetriever + ?Sized,
{
    if start != end {
        return Err(PeriodError::MismatchedDayRange);
    }
    let mut days = build_day_details(start, end, entries, absences, config, now);
    let day = days.remove(0);
    Ok(SummaryResult {
        summary: summarize_range([&day.summary]),
        period: day,
    })
}

/// Summarizes a date range as one week record.
pub fn week_summary<E, A>(
    start: NaiveDate,
    end: NaiveDate,
    entries: &E,
    absences: &A,
    config: &TrackerConfig,
    now: Option<NaiveDateTime>,
) -> SummaryResult<WeekDetails>
where
    E: EntryRetriever + ?Sized,
    A: AbsenceRetriever + ?Sized,
{
    let days = build_day_details(start, end, entries, absences, config, now);
    let summary = summarize_range(days.iter().map(|day| &day.summary));
    let week = WeekDetails {
        start: days.first().map_or(start, |day| day.date),
        end: days.last().map_or(end, |day| day.date),
        days,
    };
    SummaryResult {
        summary,
        period: week,
    }
}

/// Summarizes a date range as one month record decomposed into ISO weeks.
pub fn month_summary<E, A>(
    start: NaiveDate,
    end: NaiveDate,
    entries: &E,
    absences: &A,
    config: &TrackerConfig,
    now: Option<NaiveDateTime>,
) -> SummaryResult<MonthDetails>
where
    E: EntryRetriever + ?Sized,
    A: AbsenceRetriever + ?Sized,
{
    let days = build_day_details(start, end, entries, absences, config, now);
    let summary = summarize_range(days.iter().map(|day| &day.summary));
    let month = MonthDetails {
        year: start.year(),
        month: start.month(),
        start: days.first().map_or(start, |day| day.date),
        end: days.last().map_or(end, |day| day.date),
        weeks: group_days_by_week(days),
    };
    SummaryResult {
        summary,
        period: month,
    }
}

/// Summarizes a date range as one year record decomposed into months.
pub fn year_summary<E, A>(
    start: NaiveDate,
    end: NaiveDate,
    entries: &E,
    absences: &A,
    config: &TrackerConfig,
    now: Option<NaiveDateTime>,
) -> SummaryResult<YearDetails>
where
    E: EntryRetriever + ?Sized,
    A: AbsenceRetriever + ?Sized,
{
    let days = build_day_details(start, end, entries, absences, config, now);
    let summary = summarize_range(days.iter().map(|day| &day.summary));
    let year = YearDetails {
        year: start.year(),
        start: days.first().map_or(start, |day| day.date),
        end: days.last().map_or(end, |day| day.date),
        months: group_days_by_month(days),
    };
    SummaryResult {
        summary,
        period: year,
    }
}

/// Builds per-day records for every date in `start..=end`.
///
/// Retrieved entries are defensively re-filtered to the target date and
/// sorted by start. `now` is forwarded to the summarizer only for the date it
/// falls on, so open entries on other days contribute zero.
fn build_day_details<E, A>(
    start: NaiveDate,
    end: NaiveDate,
    entries: &E,
    absences: &A,
    config: &TrackerConfig,
    now: Option<NaiveDateTime>,
) -> Vec<DayDetails>
where
    E: EntryRetriever + ?Sized,
    A: AbsenceRetriever + ?Sized,
{
    let mut results = Vec::new();
    let mut current = start;
    while current <= end {
        let mut day_entries: Vec<Entry> = entries
            .entries_for_day(current)
            .into_iter()
            .filter(|entry| entry.start_date() == current)
            .collect();
        day_entries.sort_by_key(|entry| entry.start);
        let day_absences = absences.absences_for_day(current);
        let reference = now.filter(|instant| instant.date() == current);
        let summary = summarize_day(current, &day_entries, &day_absences, config, reference);
        results.push(DayDetails {
            date: current,
            entries: day_entries,
            absences: day_absences,
            summary,
        });
        let Some(next) = current.succ_opt() else { break };
        current = next;
    }
    results
}

fn group_days_by_week(days: Vec<DayDetails>) -> Vec<WeekDetails> {
    group_runs(days, |day| {
        let iso = day.date.iso_week();
        (iso.year(), iso.week())
    })
    .into_iter()
    .map(make_week)
    .collect()
}

fn group_days_by_month(days: Vec<DayDetails>) -> Vec<MonthDetails> {
    group_runs(days, |day| (day.date.year(), day.date.month()))
        .into_iter()
        .map(|run| MonthDetails {
            year: run[0].date.year(),
            month: run[0].date.month(),
            start: run[0].date,
            end: run[run.len() - 1].date,
            weeks: group_days_by_week(run),
        })
        .collect()
}

fn make_week(days: Vec<DayDetails>) -> WeekDetails {
    WeekDetails {
        start: days[0].date,
        end: days[days.len() - 1].date,
        days,
    }
}

/// Splits days into runs of equal keys, preserving input order.
fn group_runs<K: PartialEq>(
    days: Vec<DayDetails>,
    key: impl Fn(&DayDetails) -> K,
) -> Vec<Vec<DayDetails>> {
    let mut runs: Vec<Vec<DayDetails>> = Vec::new();
    let mut current_key: Option<K> = None;
    for day in days {
        let day_key = key(&day);
        match runs.last_mut() {
            Some(run) if current_key.as_ref() == Some(&day_key) => run.push(day),
            _ => runs.push(vec![day]),
        }
        current_key = Some(day_key);
    }
    runs
}
