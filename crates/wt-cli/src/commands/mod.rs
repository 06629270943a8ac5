//! CLI command implementations.
//!
//! Each command takes a writer so tests can capture its output.

pub mod absences;
pub mod clock;
pub mod config;
pub mod entries;
pub mod report;
pub mod status;
pub mod util;
pub mod watch;
