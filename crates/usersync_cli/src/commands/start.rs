//! Start command implementation.

use crate::app::App;
use crate::error::CliResult;
use usersync_engine::StartupOutcome;

/// Runs the startup flow once.
pub fn run(app: &App) -> CliResult<()> {
    match app.wait(app.controller().start())? {
        StartupOutcome::Refreshed { count } => {
            println!("Store was empty, fetched {} users", count);
        }
        StartupOutcome::Reconciled(result) if result.skipped => {
            println!("Store is up to date");
        }
        StartupOutcome::Reconciled(result) => {
            println!("Reconciled {} pending favorites", result.acknowledged);
        }
        StartupOutcome::Offline { count } => {
            println!("Offline, showing {} cached users", count);
        }
    }
    Ok(())
}
