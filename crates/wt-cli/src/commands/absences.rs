//! Absence rule commands: list, add, remove.

use std::io::Write;

use anyhow::{Result, bail};

use wt_core::AbsenceRule;

use crate::app::App;
use crate::commands::util::parse_date_arg;

pub fn list<W: Write>(writer: &mut W, app: &App) -> Result<()> {
    if app.config.absences.is_empty() {
        writeln!(writer, "No absence rules.")?;
        return Ok(());
    }
    writeln!(writer, "Absence rules:")?;
    for (index, rule) in app.config.absences.iter().enumerate() {
        let span = if rule.effective_end() == rule.start {
            rule.start.to_string()
        } else {
            format!("{} to {}", rule.start, rule.effective_end())
        };
        let hours = rule
            .hours
            .map_or_else(|| "full day".to_string(), |hours| format!("{hours}h/day"));
        let reason = if rule.reason.is_empty() {
            String::new()
        } else {
            format!(" - {}", rule.reason)
        };
        writeln!(writer, "{index}: {span} ({hours}){reason}")?;
    }
    Ok(())
}

pub fn add<W: Write>(
    writer: &mut W,
    app: &mut App,
    start: &str,
    end: Option<&str>,
    reason: &str,
    hours: Option<f64>,
) -> Result<()> {
    let start = parse_date_arg(start)?;
    let end = end.map(parse_date_arg).transpose()?;
    if let Some(end) = end {
        if end < start {
            bail!("absence end must not come before its start");
        }
    }
    if let Some(hours) = hours {
        if hours < 0.0 {
            bail!("absence hours must not be negative");
        }
    }
    let rule = AbsenceRule {
        start,
        end,
        reason: reason.to_string(),
        hours,
    };
    let mut rules = app.config.absences.clone();
    rules.push(rule);
    app.save_absences(rules)?;
    writeln!(writer, "Added absence starting {start}.")?;
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, app: &mut App, index: usize) -> Result<()> {
    let mut rules = app.config.absences.clone();
    if index >= rules.len() {
        bail!("no absence rule at index {index}");
    }
    let removed = rules.remove(index);
    app.save_absences(rules)?;
    writeln!(writer, "Removed absence starting {}.", removed.start)?;
    Ok(())
}
