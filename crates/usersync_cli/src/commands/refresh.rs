//! Refresh command implementation.

use crate::app::App;
use crate::error::CliResult;

/// Runs the refresh command.
pub fn run(app: &App) -> CliResult<()> {
    let count = app.wait(app.controller().refresh())?;
    let favorites = app
        .engine()
        .users()?
        .iter()
        .filter(|u| u.is_favorite)
        .count();

    println!("Fetched {} users ({} favorites kept)", count, favorites);
    Ok(())
}
