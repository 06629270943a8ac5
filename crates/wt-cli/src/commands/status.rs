//! Status command: the open entry and today's balance.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;

use wt_core::day_summary;

use crate::app::App;
use crate::commands::report;
use crate::commands::util::{DISPLAY_EPSILON, format_hours};

pub fn run<W: Write>(writer: &mut W, app: &App, now: NaiveDateTime) -> Result<()> {
    match app.state.open_entry() {
        Some(entry) => {
            writeln!(
                writer,
                "Clocked in since {} ({}).",
                entry.start.format("%H:%M"),
                format_hours(entry.duration_hours(Some(now)))
            )?;
        }
        None => writeln!(writer, "Not clocked in.")?,
    }

    let today = now.date();
    let result = day_summary(
        today,
        today,
        &app.state,
        &app.absences(),
        &app.config,
        Some(now),
    )
    .expect("matching start and end dates");
    let day = result.period.summary;

    writeln!(
        writer,
        "Today ({}): worked {} of {} expected.",
        today.format("%a %Y-%m-%d"),
        format_hours(day.worked),
        format_hours(day.expected)
    )?;
    if day.overworked > DISPLAY_EPSILON {
        writeln!(writer, "Overworked by {}.", format_hours(day.overworked))?;
    } else if day.remaining > DISPLAY_EPSILON {
        writeln!(writer, "Remaining: {}.", format_hours(day.remaining))?;
    } else if day.is_workday {
        writeln!(writer, "Day complete.")?;
    }

    let (week_start, week_end) = report::period_range(report::ReportPeriod::Week, today);
    let week = wt_core::week_summary(
        week_start,
        week_end,
        &app.state,
        &app.absences(),
        &app.config,
        Some(now),
    );
    let target = report::expected_target(app, week_start, week_end, now);
    writeln!(
        writer,
        "This week: worked {} of {} expected.",
        format_hours(week.summary.total_worked),
        format_hours(target)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};

    use crate::CliConfig;
    use crate::commands::clock;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn test_app(temp: &tempfile::TempDir) -> App {
        let cli_config = CliConfig {
            data_dir: temp.path().to_path_buf(),
        };
        App::open(&cli_config, at(9, 0).date()).unwrap()
    }

    #[test]
    fn status_reports_running_entry_and_balance() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        let mut sink = Vec::new();
        clock::clock_in(&mut sink, &mut app, None, at(9, 0)).unwrap();

        let mut output = Vec::new();
        run(&mut output, &app, at(12, 0)).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Clocked in since 09:00 (3h 00m)."));
        assert!(output.contains("worked 3h 00m of 8h 00m expected."));
        assert!(output.contains("Remaining: 5h 00m."));
        assert!(output.contains("This week: worked 3h 00m of 40h 00m expected."));
    }

    #[test]
    fn status_without_open_entry() {
        let temp = tempfile::tempdir().unwrap();
        let app = test_app(&temp);
        let mut output = Vec::new();
        run(&mut output, &app, at(8, 0)).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Not clocked in."));
    }

    #[test]
    fn status_reports_overwork() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        let mut sink = Vec::new();
        clock::clock_in(&mut sink, &mut app, None, at(8, 0)).unwrap();
        clock::clock_out(&mut sink, &mut app, None, at(17, 30)).unwrap();

        let mut output = Vec::new();
        run(&mut output, &app, at(18, 0)).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Overworked by 1h 30m."));
    }
}
