use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wt_cli::commands::{absences, clock, config, entries, report, status, util, watch};
use wt_cli::{AbsenceAction, App, Cli, CliConfig, Commands, ConfigAction, EntriesAction};

fn open_app(config_path: Option<&std::path::Path>) -> Result<(App, chrono::NaiveDateTime)> {
    let cli_config = CliConfig::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?cli_config, "loaded configuration");
    let now = Local::now().naive_local();
    let app = App::open(&cli_config, now.date())?;
    Ok((app, now))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init so running inside tests cannot panic on double-initialization
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    match &cli.command {
        Some(Commands::In { at }) => {
            let (mut app, now) = open_app(cli.config.as_deref())?;
            clock::clock_in(&mut writer, &mut app, at.as_deref(), now)?;
        }
        Some(Commands::Out { at }) => {
            let (mut app, now) = open_app(cli.config.as_deref())?;
            clock::clock_out(&mut writer, &mut app, at.as_deref(), now)?;
        }
        Some(Commands::Status) => {
            let (app, now) = open_app(cli.config.as_deref())?;
            status::run(&mut writer, &app, now)?;
        }
        Some(Commands::Report {
            day,
            month,
            year,
            date,
            json,
        }) => {
            let (app, now) = open_app(cli.config.as_deref())?;
            let period = if *day {
                report::ReportPeriod::Day
            } else if *month {
                report::ReportPeriod::Month
            } else if *year {
                report::ReportPeriod::Year
            } else {
                report::ReportPeriod::Week
            };
            let date = match date.as_deref() {
                Some(raw) => util::parse_date_arg(raw)?,
                None => now.date(),
            };
            report::run(&mut writer, &app, period, date, *json, now)?;
        }
        Some(Commands::Entries { action }) => {
            let (mut app, now) = open_app(cli.config.as_deref())?;
            match action {
                EntriesAction::List { month } => {
                    entries::list(&mut writer, &app, month.as_deref(), now.date())?;
                }
                EntriesAction::Add { start, end } => {
                    entries::add(&mut writer, &mut app, start, end)?;
                }
                EntriesAction::Edit { id, start, end } => {
                    entries::edit(&mut writer, &mut app, id, start.as_deref(), end.as_deref())?;
                }
                EntriesAction::Delete { id } => {
                    entries::delete(&mut writer, &mut app, id)?;
                }
            }
        }
        Some(Commands::Absence { action }) => {
            let (mut app, _now) = open_app(cli.config.as_deref())?;
            match action {
                AbsenceAction::List => absences::list(&mut writer, &app)?,
                AbsenceAction::Add {
                    start,
                    end,
                    reason,
                    hours,
                } => absences::add(&mut writer, &mut app, start, end.as_deref(), reason, *hours)?,
                AbsenceAction::Remove { index } => absences::remove(&mut writer, &mut app, *index)?,
            }
        }
        Some(Commands::Config { action }) => {
            let (mut app, _now) = open_app(cli.config.as_deref())?;
            match action {
                ConfigAction::Show => config::show(&mut writer, &app)?,
                ConfigAction::Set { key, value } => config::set(&mut writer, &mut app, key, value)?,
            }
        }
        Some(Commands::Watch) => {
            let (app, _now) = open_app(cli.config.as_deref())?;
            watch::run(&mut writer, &app)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
