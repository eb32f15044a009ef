//! Status command implementation.

use super::Format;
use crate::app::App;
use crate::error::CliResult;
use serde::Serialize;

/// Store and network summary.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Snapshot file path.
    pub store: String,
    /// Remote endpoint.
    pub base_url: String,
    /// Whether the endpoint answered a probe.
    pub network_available: bool,
    /// Number of stored users.
    pub users: usize,
    /// Number of favorites.
    pub favorites: usize,
    /// Number of records awaiting reconciliation.
    pub pending: usize,
}

/// Runs the status command.
pub fn run(app: &App, format: Format) -> CliResult<()> {
    let engine = app.engine();
    let users = engine.users()?;
    let report = StatusReport {
        store: app.settings().store.display().to_string(),
        base_url: engine.config().base_url.clone(),
        network_available: engine.check_network().available,
        users: users.len(),
        favorites: users.iter().filter(|u| u.is_favorite).count(),
        pending: users.iter().filter(|u| u.pending_sync).count(),
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print_text_output(&report),
    }
    Ok(())
}

fn print_text_output(report: &StatusReport) {
    println!("Store:     {}", report.store);
    println!("Endpoint:  {}", report.base_url);
    println!(
        "Network:   {}",
        if report.network_available {
            "available"
        } else {
            "unavailable"
        }
    );
    println!("Users:     {}", report.users);
    println!("Favorites: {}", report.favorites);
    println!("Pending:   {}", report.pending);
}
