//! Watch command: periodic status output.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

use crate::app::App;
use crate::commands::status;

const TICK: Duration = Duration::from_secs(60);

/// Prints the status immediately and then once a minute until Ctrl-C.
pub fn run<W: Write>(writer: &mut W, app: &App) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start watch runtime")?;
    runtime.block_on(watch_loop(writer, app))
}

async fn watch_loop<W: Write>(writer: &mut W, app: &App) -> Result<()> {
    let mut ticker = tokio::time::interval(TICK);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                status::run(writer, app, Local::now().naive_local())?;
                writer.flush()?;
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for interrupt")?;
                writeln!(writer, "Stopped.")?;
                return Ok(());
            }
        }
    }
}
