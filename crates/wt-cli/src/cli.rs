//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Personal working-time tracker.
///
/// Records clock-in/clock-out entries in plain JSON files and summarizes
/// worked against expected hours per day, week, month, and year.
#[derive(Debug, Parser)]
#[command(name = "wt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clock in, opening a new entry.
    In {
        /// Start time (HH:MM or YYYY-MM-DDTHH:MM). Defaults to now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Clock out, closing the open entry.
    Out {
        /// End time (HH:MM or YYYY-MM-DDTHH:MM). Defaults to now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the open entry and today's balance.
    Status,

    /// Summarize a day, week, month, or year.
    Report {
        /// Summarize the single day of the reference date.
        #[arg(long, conflicts_with_all = ["month", "year"])]
        day: bool,

        /// Summarize the calendar month of the reference date.
        #[arg(long, conflicts_with = "year")]
        month: bool,

        /// Summarize the calendar year of the reference date.
        #[arg(long)]
        year: bool,

        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Emit the full period record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage recorded entries.
    Entries {
        #[command(subcommand)]
        action: EntriesAction,
    },

    /// Manage absence rules.
    Absence {
        #[command(subcommand)]
        action: AbsenceAction,
    },

    /// Show or change configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Re-print today's status once a minute until interrupted.
    Watch,
}

/// Entry management actions.
#[derive(Debug, Subcommand)]
pub enum EntriesAction {
    /// List the entries of a month.
    List {
        /// Month to list (YYYY-MM). Defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },

    /// Add a closed entry.
    Add {
        /// Start time (YYYY-MM-DDTHH:MM).
        #[arg(long)]
        start: String,

        /// End time (YYYY-MM-DDTHH:MM).
        #[arg(long)]
        end: String,
    },

    /// Edit an entry's start and/or end.
    Edit {
        /// Entry id (a prefix is enough if unambiguous).
        id: String,

        /// New start time (YYYY-MM-DDTHH:MM).
        #[arg(long)]
        start: Option<String>,

        /// New end time (YYYY-MM-DDTHH:MM), or "open" to reopen.
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete an entry.
    Delete {
        /// Entry id (a prefix is enough if unambiguous).
        id: String,
    },
}

/// Absence rule actions.
#[derive(Debug, Subcommand)]
pub enum AbsenceAction {
    /// List all absence rules.
    List,

    /// Add an absence rule.
    Add {
        /// First covered date (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// Last covered date, inclusive (YYYY-MM-DD). Defaults to start.
        #[arg(long)]
        end: Option<String>,

        /// Label for the rule.
        #[arg(long, default_value = "")]
        reason: String,

        /// Credited hours per covered day. Defaults to the full workday.
        #[arg(long)]
        hours: Option<f64>,
    },

    /// Remove an absence rule by its list index.
    Remove {
        /// Index as printed by `wt absence list`.
        index: usize,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,

    /// Set a configuration value.
    ///
    /// Keys: hours_per_day, workdays (comma-separated 0-6, 0 = Monday),
    /// expected_mode (full_period or to_date).
    Set {
        key: String,
        value: String,
    },
}
