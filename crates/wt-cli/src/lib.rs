//! Worktime tracker CLI library.

mod app;
mod cli;
pub mod commands;
mod config;

pub use app::App;
pub use cli::{AbsenceAction, Cli, Commands, ConfigAction, EntriesAction};
pub use config::CliConfig;
