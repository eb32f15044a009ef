//! Sync command implementation.

use crate::app::App;
use crate::error::CliResult;
use usersync_engine::{Channel, SyncEvent};

/// Runs the sync command, printing each status transition.
pub fn run(app: &App) -> CliResult<()> {
    let subscription = app.controller().subscribe(&[Channel::Status]);
    // Skip the replayed current value.
    subscription.drain();

    let result = app.wait(app.controller().sync());

    for event in subscription.drain() {
        if let SyncEvent::Status(status) = event {
            match app.engine().config().display_duration(status) {
                Some(hint) => println!("status: {} (shown for {:?})", status, hint),
                None => println!("status: {}", status),
            }
        }
    }

    let result = result?;
    if result.skipped {
        println!("Nothing to sync");
    } else {
        println!(
            "Pushed {} favorites, {} acknowledged in {:?}",
            result.pushed, result.acknowledged, result.duration
        );
    }
    Ok(())
}
