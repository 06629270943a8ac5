//! Configuration show/set commands.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::{Context, Result, bail};

use wt_core::ExpectedMode;

use crate::app::App;

pub fn show<W: Write>(writer: &mut W, app: &App) -> Result<()> {
    let config = &app.config;
    writeln!(writer, "hours_per_day: {}", config.hours_per_day)?;
    let workdays: Vec<String> = config.workdays.iter().map(ToString::to_string).collect();
    writeln!(writer, "workdays: {} (0 = Monday)", workdays.join(","))?;
    writeln!(writer, "expected_mode: {}", config.expected_mode)?;
    if let Some(data_dir) = &config.data_dir {
        writeln!(writer, "data_dir: {}", data_dir.display())?;
    }
    writeln!(writer, "absence rules: {}", config.absences.len())?;
    Ok(())
}

pub fn set<W: Write>(writer: &mut W, app: &mut App, key: &str, value: &str) -> Result<()> {
    match key {
        "hours_per_day" => {
            let hours: u32 = value.parse().context("hours_per_day must be a number")?;
            if hours == 0 || hours > 24 {
                bail!("hours_per_day must be between 1 and 24");
            }
            app.config.hours_per_day = hours;
        }
        "workdays" => {
            app.config.workdays = parse_workdays(value)?;
        }
        "expected_mode" => {
            app.config.expected_mode = value
                .parse::<ExpectedMode>()
                .map_err(|message| anyhow::anyhow!(message))?;
        }
        _ => bail!("unknown key '{key}', expected hours_per_day, workdays, or expected_mode"),
    }
    app.save_config()?;
    writeln!(writer, "Set {key} = {value}.")?;
    Ok(())
}

fn parse_workdays(value: &str) -> Result<BTreeSet<u8>> {
    let mut workdays = BTreeSet::new();
    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let weekday: u8 = part
            .parse()
            .with_context(|| format!("invalid weekday '{part}'"))?;
        if weekday > 6 {
            bail!("weekday indices run 0 (Monday) to 6 (Sunday)");
        }
        workdays.insert(weekday);
    }
    if workdays.is_empty() {
        bail!("workdays must name at least one day");
    }
    Ok(workdays)
}
