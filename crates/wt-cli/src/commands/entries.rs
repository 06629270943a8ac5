//! Entry management commands: list, add, edit, delete.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use wt_core::{Entry, MonthKey};

use crate::app::App;
use crate::commands::util::{format_hours, parse_datetime_arg};

pub fn list<W: Write>(writer: &mut W, app: &App, month: Option<&str>, today: NaiveDate) -> Result<()> {
    let key = match month {
        Some(raw) => raw.parse::<MonthKey>().context("invalid month")?,
        None => MonthKey::from_date(today),
    };
    let entries = app.state.entries_for_month(key);
    if entries.is_empty() {
        writeln!(writer, "No entries in {key}.")?;
        return Ok(());
    }
    writeln!(writer, "Entries in {key}:")?;
    for entry in entries {
        let end = entry
            .end
            .map_or_else(|| "open".to_string(), |end| end.format("%H:%M").to_string());
        writeln!(
            writer,
            "- {}  {} {} to {} ({})",
            short_id(&entry.id),
            entry.start.format("%Y-%m-%d"),
            entry.start.format("%H:%M"),
            end,
            format_hours(entry.duration_hours(None))
        )?;
    }
    Ok(())
}

pub fn add<W: Write>(writer: &mut W, app: &mut App, start: &str, end: &str) -> Result<()> {
    let mut entry = Entry::new(parse_datetime_arg(start)?);
    entry.end = Some(parse_datetime_arg(end)?);
    let id = entry.id.clone();
    app.state.save_entry(entry).context("cannot add entry")?;
    writeln!(writer, "Added entry {}.", short_id(&id))?;
    Ok(())
}

pub fn edit<W: Write>(
    writer: &mut W,
    app: &mut App,
    id: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    if start.is_none() && end.is_none() {
        bail!("nothing to change, pass --start and/or --end");
    }
    let mut entry = resolve(app, id)?.clone();
    if let Some(raw) = start {
        entry.start = parse_datetime_arg(raw)?;
    }
    if let Some(raw) = end {
        entry.end = if raw == "open" {
            None
        } else {
            Some(parse_datetime_arg(raw)?)
        };
    }
    let id = entry.id.clone();
    app.state.save_entry(entry).context("cannot edit entry")?;
    writeln!(writer, "Updated entry {}.", short_id(&id))?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, app: &mut App, id: &str) -> Result<()> {
    let id = resolve(app, id)?.id.clone();
    app.state.delete_entry(&id).context("cannot delete entry")?;
    writeln!(writer, "Deleted entry {}.", short_id(&id))?;
    Ok(())
}

/// Resolves an id prefix to exactly one entry.
fn resolve<'a>(app: &'a App, prefix: &str) -> Result<&'a Entry> {
    let mut matches = app
        .state
        .entries()
        .filter(|entry| entry.id.starts_with(prefix));
    let Some(found) = matches.next() else {
        bail!("no entry matching '{prefix}'");
    };
    if matches.next().is_some() {
        bail!("'{prefix}' matches more than one entry, use a longer prefix");
    }
    Ok(found)
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::CliConfig;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn test_app(temp: &tempfile::TempDir) -> App {
        let cli_config = CliConfig {
            data_dir: temp.path().to_path_buf(),
        };
        App::open(&cli_config, monday()).unwrap()
    }

    #[test]
    fn add_then_list_shows_the_entry() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        let mut output = Vec::new();
        add(&mut output, &mut app, "2025-01-06T09:00", "2025-01-06T17:00").unwrap();

        let mut output = Vec::new();
        list(&mut output, &app, None, monday()).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Entries in 2025-01:"));
        assert!(output.contains("2025-01-06 09:00 to 17:00 (8h 00m)"));
    }

    #[test]
    fn edit_by_prefix_moves_the_entry() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        let mut sink = Vec::new();
        add(&mut sink, &mut app, "2025-01-06T09:00", "2025-01-06T17:00").unwrap();
        let id = app.state.entries().next().unwrap().id.clone();

        let mut output = Vec::new();
        edit(
            &mut output,
            &mut app,
            &id[..8],
            Some("2025-02-03T09:00"),
            Some("2025-02-03T12:00"),
        )
        .unwrap();

        let february = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let moved = app.state.find_entry(&id).unwrap();
        assert_eq!(moved.start_date(), february);
        assert!(app
            .state
            .entries_for_month(MonthKey::from_date(monday()))
            .is_empty());
    }

    #[test]
    fn delete_removes_the_entry() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        let mut sink = Vec::new();
        add(&mut sink, &mut app, "2025-01-06T09:00", "2025-01-06T17:00").unwrap();
        let id = app.state.entries().next().unwrap().id.clone();

        let mut output = Vec::new();
        delete(&mut output, &mut app, &id).unwrap();
        assert!(app.state.find_entry(&id).is_none());
    }

    #[test]
    fn unknown_prefix_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        let mut output = Vec::new();
        assert!(delete(&mut output, &mut app, "doesnotexist").is_err());
    }

    #[test]
    fn invalid_entry_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = test_app(&temp);
        let mut output = Vec::new();
        let err = add(&mut output, &mut app, "2025-01-06T17:00", "2025-01-06T09:00").unwrap_err();
        assert!(err.to_string().contains("cannot add entry"));
    }
}
