//! Report command: day, week, month, and year summaries.

use std::io::Write;

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use wt_core::{
    DayDetails, ExpectedMode, RangeSummary, SummaryResult, WeekDetails, day_summary,
    month_summary, summarize_range, week_summary, year_summary,
};

use crate::app::App;
use crate::commands::util::{DISPLAY_EPSILON, format_hours};

/// Requested report granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Day,
    Week,
    Month,
    Year,
}

/// Calendar range covered by a period containing `date`.
///
/// Weeks run Monday through Sunday; months and years span the full
/// calendar unit.
pub fn period_range(period: ReportPeriod, date: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        ReportPeriod::Day => (date, date),
        ReportPeriod::Week => {
            let monday =
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
            (monday, monday + Duration::days(6))
        }
        ReportPeriod::Month => {
            let first = date.with_day(1).expect("day 1 exists in every month");
            let next_month = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            }
            .expect("first of month is always valid");
            (first, next_month.pred_opt().expect("previous day exists"))
        }
        ReportPeriod::Year => (
            NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("january 1st is always valid"),
            NaiveDate::from_ymd_opt(date.year(), 12, 31).expect("december 31st is always valid"),
        ),
    }
}

/// Report payload for JSON output.
#[derive(Debug, Serialize)]
struct ReportEnvelope<P: Serialize> {
    start: NaiveDate,
    end: NaiveDate,
    expected_target: f64,
    summary: RangeSummary,
    period: P,
}

pub fn run<W: Write>(
    writer: &mut W,
    app: &App,
    period: ReportPeriod,
    date: NaiveDate,
    json: bool,
    now: NaiveDateTime,
) -> Result<()> {
    let (start, end) = period_range(period, date);
    let target = expected_target(app, start, end, now);

    match period {
        ReportPeriod::Day => {
            let result = day_summary(start, end, &app.state, &app.absences(), &app.config, Some(now))
                .expect("matching start and end dates");
            if json {
                write_json(writer, start, end, target, result)?;
            } else {
                write_header(writer, "Day", start, end)?;
                render_days(writer, std::slice::from_ref(&result.period))?;
                render_totals(writer, &result.summary, target)?;
            }
        }
        ReportPeriod::Week => {
            let result =
                week_summary(start, end, &app.state, &app.absences(), &app.config, Some(now));
            if json {
                write_json(writer, start, end, target, result)?;
            } else {
                write_header(writer, "Week", start, end)?;
                render_days(writer, &result.period.days)?;
                render_totals(writer, &result.summary, target)?;
            }
        }
        ReportPeriod::Month => {
            let result =
                month_summary(start, end, &app.state, &app.absences(), &app.config, Some(now));
            if json {
                write_json(writer, start, end, target, result)?;
            } else {
                write_header(writer, "Month", start, end)?;
                render_weeks(writer, &result.period.weeks)?;
                render_totals(writer, &result.summary, target)?;
            }
        }
        ReportPeriod::Year => {
            let result =
                year_summary(start, end, &app.state, &app.absences(), &app.config, Some(now));
            if json {
                write_json(writer, start, end, target, result)?;
            } else {
                write_header(writer, "Year", start, end)?;
                for month in &result.period.months {
                    let summary = summarize_range(
                        month
                            .weeks
                            .iter()
                            .flat_map(|week| &week.days)
                            .map(|day| &day.summary),
                    );
                    writeln!(
                        writer,
                        "  {:04}-{:02}: worked {} of {} expected",
                        month.year,
                        month.month,
                        format_hours(summary.total_worked),
                        format_hours(summary.total_expected)
                    )?;
                }
                render_totals(writer, &result.summary, target)?;
            }
        }
    }
    Ok(())
}

/// Resolves the expected target for the range.
///
/// In `to_date` mode the target only counts days up to today, so a report
/// over a period still in progress compares against what should have been
/// worked so far rather than the full period.
pub fn expected_target(app: &App, start: NaiveDate, end: NaiveDate, now: NaiveDateTime) -> f64 {
    let today = now.date();
    if app.config.expected_mode == ExpectedMode::FullPeriod || today >= end {
        let full = week_summary(start, end, &app.state, &app.absences(), &app.config, Some(now));
        return full.summary.total_expected;
    }
    if today < start {
        return 0.0;
    }
    let clamped = week_summary(start, today, &app.state, &app.absences(), &app.config, Some(now));
    clamped.summary.total_expected
}

fn write_json<W: Write, P: Serialize>(
    writer: &mut W,
    start: NaiveDate,
    end: NaiveDate,
    expected_target: f64,
    result: SummaryResult<P>,
) -> Result<()> {
    let envelope = ReportEnvelope {
        start,
        end,
        expected_target,
        summary: result.summary,
        period: result.period,
    };
    serde_json::to_writer_pretty(&mut *writer, &envelope)?;
    writeln!(writer)?;
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, label: &str, start: NaiveDate, end: NaiveDate) -> Result<()> {
    writeln!(writer, "{label} {start} to {end}")?;
    Ok(())
}

fn render_days<W: Write>(writer: &mut W, days: &[DayDetails]) -> Result<()> {
    for day in days {
        let summary = &day.summary;
        let mut line = format!(
            "  {}  worked {} of {}",
            day.date.format("%a %Y-%m-%d"),
            format_hours(summary.worked),
            format_hours(summary.expected)
        );
        if summary.absence_hours > DISPLAY_EPSILON {
            line.push_str(&format!(
                " (absence credit {})",
                format_hours(summary.absence_hours)
            ));
        }
        if !summary.is_workday {
            line.push_str(" (off)");
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

fn render_weeks<W: Write>(writer: &mut W, weeks: &[WeekDetails]) -> Result<()> {
    for week in weeks {
        let summary = summarize_range(week.days.iter().map(|day| &day.summary));
        writeln!(
            writer,
            "  Week {} to {}: worked {} of {} expected",
            week.start,
            week.end,
            format_hours(summary.total_worked),
            format_hours(summary.total_expected)
        )?;
    }
    Ok(())
}

fn render_totals<W: Write>(writer: &mut W, summary: &RangeSummary, target: f64) -> Result<()> {
    writeln!(
        writer,
        "Total: worked {} of {} expected ({} workdays, {} worked)",
        format_hours(summary.total_worked),
        format_hours(target),
        summary.workdays,
        summary.worked_days
    )?;
    let balance = summary.total_worked - target;
    if balance > DISPLAY_EPSILON {
        writeln!(writer, "Ahead by {}.", format_hours(balance))?;
    } else if balance < -DISPLAY_EPSILON {
        writeln!(writer, "Behind by {}.", format_hours(-balance))?;
    } else {
        writeln!(writer, "On target.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveTime;
    use wt_core::TrackerConfig;

    use crate::CliConfig;
    use crate::commands::clock;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn test_app(temp: &tempfile::TempDir) -> App {
        let cli_config = CliConfig {
            data_dir: temp.path().to_path_buf(),
        };
        App::open(&cli_config, monday()).unwrap()
    }

    fn work_day(app: &mut App, day: NaiveDate, hours: u32) {
        let mut sink = Vec::new();
        let start = day.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let end = day.and_time(NaiveTime::from_hms_opt(9 + hours, 0, 0).unwrap());
        clock::clock_in(&mut sink, app, None, start).unwrap();
        clock::clock_out(&mut sink, app, None, end).unwrap();
    }

    #[test]
    fn week_range_spans_monday_to_sunday() {
        let thursday = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let (start, end) = period_range(ReportPeriod::Week, thursday);
        assert_eq!(start, monday());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
    }

    #[test]
    fn month_range_handles_december() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let (start, end) = period_range(ReportPeriod::Month, date);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn week_report_renders_days_and_totals() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        work_day(&mut app, monday(), 8);
        work_day(&mut app, monday() + Duration::days(1), 6);

        let now = (monday() + Duration::days(6))
            .and_time(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        let mut output = Vec::new();
        run(&mut output, &app, ReportPeriod::Week, monday(), false, now).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Week 2025-01-06 to 2025-01-12"));
        assert!(output.contains("Mon 2025-01-06  worked 8h 00m of 8h 00m"));
        assert!(output.contains("Sat 2025-01-11  worked 0m of 0m (off)"));
        assert!(output.contains("Total: worked 14h 00m of 40h 00m expected (5 workdays, 2 worked)"));
        assert!(output.contains("Behind by 26h 00m."));
    }

    #[test]
    fn to_date_mode_clamps_the_expected_target() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        app.config = TrackerConfig {
            expected_mode: ExpectedMode::ToDate,
            ..app.config.clone()
        };
        work_day(&mut app, monday(), 8);
        work_day(&mut app, monday() + Duration::days(1), 8);

        // Wednesday noon: only Mon-Wed count toward the target.
        let now = (monday() + Duration::days(2))
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        let mut output = Vec::new();
        run(&mut output, &app, ReportPeriod::Week, monday(), false, now).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("worked 16h 00m of 24h 00m expected"));
        assert!(output.contains("Behind by 8h 00m."));
    }

    #[test]
    fn json_report_includes_summary_and_period() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        work_day(&mut app, monday(), 8);

        let now = monday().and_time(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        let mut output = Vec::new();
        run(&mut output, &app, ReportPeriod::Day, monday(), true, now).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(value["start"], "2025-01-06");
        assert_eq!(value["summary"]["total_worked"], 8.0);
        assert_eq!(value["period"]["date"], "2025-01-06");
        assert_eq!(value["period"]["entries"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn month_report_groups_by_week() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        work_day(&mut app, monday(), 8);

        let now = NaiveDate::from_ymd_opt(2025, 1, 31)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        let mut output = Vec::new();
        run(&mut output, &app, ReportPeriod::Month, monday(), false, now).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Month 2025-01-01 to 2025-01-31"));
        assert!(output.contains("Week 2025-01-06 to 2025-01-12: worked 8h 00m of 40h 00m expected"));
    }
}
