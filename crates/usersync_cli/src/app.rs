//! Wiring of the engine, its collaborators and the tokio runtime.

use crate::error::CliResult;
use crate::net::{ProbeConnectivity, ReqwestClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use usersync_engine::{
    EngineConfig, HttpRemote, RetryConfig, SyncController, SyncEngine, TaskHandle,
};
use usersync_store::FileStore;

/// Engine type used by the CLI.
pub type CliEngine = SyncEngine<HttpRemote<ReqwestClient>, FileStore, ProbeConnectivity>;

/// Controller type used by the CLI.
pub type CliController = SyncController<HttpRemote<ReqwestClient>, FileStore, ProbeConnectivity>;

/// Longest time a connectivity probe may take.
const MAX_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings gathered from flags and the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Snapshot file of the local store.
    pub store: PathBuf,
    /// Remote endpoint.
    pub base_url: String,
    /// Treat the network as unreachable.
    pub offline: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// Extra attempts for reconciliation pushes.
    pub retries: u32,
}

impl Settings {
    /// Builds the engine configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.base_url.clone())
            .with_timeout(self.timeout)
            .with_retry(RetryConfig::new(self.retries.saturating_add(1)))
    }
}

/// An opened engine plus the runtime its controller submits tasks to.
pub struct App {
    controller: CliController,
    runtime: Runtime,
    settings: Settings,
}

impl App {
    /// Opens the store and builds the engine.
    pub fn open(settings: Settings) -> CliResult<Self> {
        let config = settings.engine_config();
        let store = FileStore::open_with_create_dirs(&settings.store)?;

        let client = ReqwestClient::new(config.timeout)?;
        let remote = HttpRemote::new(config.base_url.clone(), client);
        let probe_timeout = config.timeout.min(MAX_PROBE_TIMEOUT);
        let probe = ProbeConnectivity::new(&config.base_url, probe_timeout)?
            .forced_offline(settings.offline);

        tracing::debug!(
            store = %settings.store.display(),
            base_url = %config.base_url,
            offline = settings.offline,
            "opening engine"
        );
        let engine = Arc::new(SyncEngine::new(config, remote, store, probe));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let controller = SyncController::new(engine, runtime.handle().clone());

        Ok(Self {
            controller,
            runtime,
            settings,
        })
    }

    /// Returns the controller.
    pub fn controller(&self) -> &CliController {
        &self.controller
    }

    /// Returns the engine.
    pub fn engine(&self) -> &CliEngine {
        self.controller.engine()
    }

    /// Returns the settings the app was opened with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Waits for a submitted action.
    pub fn wait<T>(&self, task: TaskHandle<T>) -> CliResult<T> {
        Ok(self.runtime.block_on(task.join())?)
    }
}
