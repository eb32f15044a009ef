//! usersync CLI
//!
//! Command-line client for the offline-first user directory.
//!
//! # Commands
//!
//! - `start` - Run the startup flow (fetch into an empty store, else reconcile)
//! - `refresh` - Fetch the remote list and merge it into the store
//! - `list` - Print stored users
//! - `toggle` - Flip a user's favorite flag
//! - `sync` - Reconcile pending favorites
//! - `status` - Display store and network status

mod app;
mod commands;
mod error;
mod net;

use app::{App, Settings};
use clap::{Parser, Subcommand};
use commands::list::ListOptions;
use commands::Format;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use usersync_engine::DEFAULT_BASE_URL;
use usersync_model::UserId;

/// Offline-first client for a remote user directory.
#[derive(Parser, Debug)]
#[command(name = "usersync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the local store snapshot
    #[arg(
        global = true,
        short,
        long,
        env = "USERSYNC_STORE",
        default_value = "usersync.json"
    )]
    store: PathBuf,

    /// Base URL of the user endpoint
    #[arg(
        global = true,
        short,
        long,
        env = "USERSYNC_BASE_URL",
        default_value = DEFAULT_BASE_URL
    )]
    base_url: String,

    /// Treat the network as unreachable
    #[arg(global = true, long)]
    offline: bool,

    /// Request timeout in seconds
    #[arg(global = true, long, default_value = "30")]
    timeout_secs: u64,

    /// Extra attempts for reconciliation pushes
    #[arg(global = true, long, default_value = "2")]
    retries: u32,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the startup flow
    Start,

    /// Fetch users from the endpoint and merge them into the store
    Refresh,

    /// Print stored users
    List {
        /// Only favorites
        #[arg(long)]
        favorites: bool,

        /// Only users with unsynced favorite changes
        #[arg(long)]
        pending: bool,

        /// Case-insensitive search over name, email, city and phone
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Flip the favorite flag of a user
    Toggle {
        /// User ID
        id: UserId,
    },

    /// Send pending favorite changes to the endpoint
    Sync,

    /// Display store and network status
    Status {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            store: self.store.clone(),
            base_url: self.base_url.clone(),
            offline: self.offline,
            timeout: Duration::from_secs(self.timeout_secs),
            retries: self.retries,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Commands::Version = cli.command {
        println!("usersync CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Default endpoint: {}", DEFAULT_BASE_URL);
        return Ok(());
    }

    let app = App::open(cli.settings())?;

    match cli.command {
        Commands::Start => commands::start::run(&app)?,
        Commands::Refresh => commands::refresh::run(&app)?,
        Commands::List {
            favorites,
            pending,
            search,
            format,
        } => {
            let options = ListOptions {
                favorites,
                pending,
                search,
            };
            commands::list::run(&app, &options, Format::parse(&format)?)?;
        }
        Commands::Toggle { id } => commands::toggle::run(&app, id)?,
        Commands::Sync => commands::sync::run(&app)?,
        Commands::Status { format } => commands::status::run(&app, Format::parse(&format)?)?,
        Commands::Version => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["usersync", "status"]).unwrap();
        let settings = cli.settings();
        assert_eq!(settings.store, PathBuf::from("usersync.json"));
        assert!(!settings.offline);
        assert_eq!(settings.timeout, Duration::from_secs(30));

        let config = settings.engine_config();
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "usersync",
            "toggle",
            "3",
            "--offline",
            "--store",
            "/tmp/users.json",
            "--base-url",
            "http://localhost:3000",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Toggle { id: 3 }));
        let settings = cli.settings();
        assert!(settings.offline);
        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.store, PathBuf::from("/tmp/users.json"));
    }

    #[test]
    fn list_filters() {
        let cli =
            Cli::try_parse_from(["usersync", "list", "--favorites", "-q", "gwen", "-f", "json"])
                .unwrap();
        match cli.command {
            Commands::List {
                favorites,
                pending,
                search,
                format,
            } => {
                assert!(favorites);
                assert!(!pending);
                assert_eq!(search.as_deref(), Some("gwen"));
                assert_eq!(format, "json");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn toggle_requires_numeric_id() {
        assert!(Cli::try_parse_from(["usersync", "toggle", "leanne"]).is_err());
    }
}
