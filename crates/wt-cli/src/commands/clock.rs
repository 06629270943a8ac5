//! Clock-in and clock-out commands.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::app::App;
use crate::commands::util::{parse_time_arg, truncate_to_minute};

pub fn clock_in<W: Write>(
    writer: &mut W,
    app: &mut App,
    at: Option<&str>,
    now: NaiveDateTime,
) -> Result<()> {
    let start = resolve_at(at, now)?;
    let entry = app.state.clock_in(start).context("cannot clock in")?;
    writeln!(writer, "Clocked in at {}.", entry.start.format("%H:%M"))?;
    Ok(())
}

pub fn clock_out<W: Write>(
    writer: &mut W,
    app: &mut App,
    at: Option<&str>,
    now: NaiveDateTime,
) -> Result<()> {
    let end = resolve_at(at, now)?;
    let entry = app.state.clock_out(end).context("cannot clock out")?;
    let end = entry.end.unwrap_or(end);
    writeln!(
        writer,
        "Clocked out at {} after {}.",
        end.format("%H:%M"),
        super::util::format_hours(entry.duration_hours(None))
    )?;
    Ok(())
}

fn resolve_at(at: Option<&str>, now: NaiveDateTime) -> Result<NaiveDateTime> {
    at.map_or_else(
        || Ok(truncate_to_minute(now)),
        |raw| parse_time_arg(raw, now.date()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};
    use wt_core::StateError;

    use crate::CliConfig;

    fn test_app(temp: &tempfile::TempDir, today: NaiveDate) -> App {
        let cli_config = CliConfig {
            data_dir: temp.path().to_path_buf(),
        };
        App::open(&cli_config, today).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn clock_in_then_out_produces_a_closed_entry() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp, at(9, 0).date());

        let mut output = Vec::new();
        clock_in(&mut output, &mut app, None, at(9, 0)).unwrap();
        clock_out(&mut output, &mut app, None, at(17, 30)).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Clocked in at 09:00."));
        assert!(output.contains("Clocked out at 17:30 after 8h 30m."));
        assert!(app.state.open_entry().is_none());
    }

    #[test]
    fn explicit_at_time_overrides_now() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp, at(12, 0).date());

        let mut output = Vec::new();
        clock_in(&mut output, &mut app, Some("08:15"), at(12, 0)).unwrap();
        let open = app.state.open_entry().unwrap();
        assert_eq!(open.start, at(8, 15));
    }

    #[test]
    fn double_clock_in_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp, at(9, 0).date());

        let mut output = Vec::new();
        clock_in(&mut output, &mut app, None, at(9, 0)).unwrap();
        let err = clock_in(&mut output, &mut app, None, at(10, 0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StateError>(),
            Some(StateError::AlreadyClockedIn)
        ));
    }

    #[test]
    fn seconds_are_truncated_from_now() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp, at(9, 0).date());

        let now = NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(9, 0, 42).unwrap());
        let mut output = Vec::new();
        clock_in(&mut output, &mut app, None, now).unwrap();
        assert_eq!(app.state.open_entry().unwrap().start, at(9, 0));
    }
}
