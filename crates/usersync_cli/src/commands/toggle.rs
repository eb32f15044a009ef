//! Toggle command implementation.

use crate::app::App;
use crate::error::{CliError, CliResult};
use usersync_model::UserId;

/// Runs the toggle command.
pub fn run(app: &App, id: UserId) -> CliResult<()> {
    let user = app
        .wait(app.controller().toggle_favorite(id))?
        .ok_or(CliError::UnknownUser(id))?;

    let state = if user.is_favorite {
        "is now a favorite"
    } else {
        "is no longer a favorite"
    };
    if user.pending_sync {
        println!("{} {} (pending sync)", user.name, state);
    } else {
        println!("{} {}", user.name, state);
    }
    Ok(())
}
