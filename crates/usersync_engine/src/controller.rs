//! Presentation-facing controller.
//!
//! The controller turns user intents into engine calls. Each action runs on
//! tokio's blocking pool, so network and storage I/O never block the
//! caller, and returns a [`TaskHandle`] that tracks it to completion.
//! Loading, error and filter state are published through the engine's
//! [`EventFeed`](crate::feed::EventFeed).

use crate::connectivity::{ConnectivityOracle, NetworkCheck};
use crate::engine::{ReconcileResult, SyncEngine};
use crate::error::{SyncError, SyncResult};
use crate::feed::{Channel, Snapshot, Subscription, SyncEvent};
use crate::filter::filter_users;
use crate::remote::RemoteSource;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use usersync_model::{User, UserId};
use usersync_store::LocalStore;

/// A submitted controller action.
#[derive(Debug)]
pub struct TaskHandle<T> {
    inner: JoinHandle<SyncResult<T>>,
}

impl<T> TaskHandle<T> {
    /// Returns true once the action has finished.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Waits for the action and returns its result.
    pub async fn join(self) -> SyncResult<T> {
        match self.inner.await {
            Ok(result) => result,
            Err(e) => Err(SyncError::TaskFailed(e.to_string())),
        }
    }
}

/// What the startup flow did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    /// The store was empty and the remote list was fetched.
    Refreshed {
        /// Number of users fetched.
        count: usize,
    },
    /// The store had users and pending edits were reconciled.
    Reconciled(ReconcileResult),
    /// The network was unavailable; stored users were published as is.
    Offline {
        /// Number of stored users.
        count: usize,
    },
}

struct Shared<R: RemoteSource, S: LocalStore, C: ConnectivityOracle> {
    engine: Arc<SyncEngine<R, S, C>>,
    query: RwLock<Option<String>>,
}

impl<R, S, C> Shared<R, S, C>
where
    R: RemoteSource,
    S: LocalStore,
    C: ConnectivityOracle,
{
    fn start(&self) -> SyncResult<StartupOutcome> {
        let check = self.engine.check_network();
        let users = self.engine.load_users()?;
        self.refilter();

        if !check.available {
            return Ok(StartupOutcome::Offline { count: users.len() });
        }

        if users.is_empty() {
            let count = self.refresh()?;
            Ok(StartupOutcome::Refreshed { count })
        } else {
            Ok(StartupOutcome::Reconciled(self.sync()?))
        }
    }

    fn refresh(&self) -> SyncResult<usize> {
        let feed = self.engine.feed();
        feed.emit(SyncEvent::Loading(true));

        let result = self
            .reconcile_before_refresh()
            .and_then(|()| self.engine.refresh_users());
        feed.emit(SyncEvent::Loading(false));

        match result {
            Ok(users) => {
                feed.emit(SyncEvent::ErrorMessage(String::new()));
                self.engine.mark_network(true);
                self.refilter();
                Ok(users.len())
            }
            Err(e) => {
                feed.emit(SyncEvent::ErrorMessage(e.to_string()));
                self.engine.check_network();
                Err(e)
            }
        }
    }

    /// Transmits pending edits so the merge cannot discard them.
    ///
    /// A rejection the server would repeat on every attempt does not block
    /// the refresh; the fetched list then supersedes the rejected edits.
    fn reconcile_before_refresh(&self) -> SyncResult<()> {
        if !self.engine.check_network().available || !self.engine.has_pending_sync()? {
            return Ok(());
        }

        match self.engine.sync_pending_changes() {
            Ok(_) => Ok(()),
            Err(e @ SyncError::Remote { .. }) if !e.is_retryable() => {
                tracing::warn!(error = %e, "pending edits rejected, refreshing anyway");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn toggle(&self, id: UserId) -> SyncResult<Option<User>> {
        match self.engine.toggle_favorite(id) {
            Ok(user) => {
                self.refilter();
                Ok(user)
            }
            Err(e) => {
                self.engine.feed().emit(SyncEvent::ErrorMessage(e.to_string()));
                Err(e)
            }
        }
    }

    fn sync(&self) -> SyncResult<ReconcileResult> {
        match self.engine.sync_pending_changes() {
            Ok(result) => {
                self.refilter();
                Ok(result)
            }
            Err(e) => {
                self.engine.feed().emit(SyncEvent::ErrorMessage(e.to_string()));
                Err(e)
            }
        }
    }

    fn check_network(&self) -> SyncResult<NetworkCheck> {
        let check = self.engine.check_network();
        if check.came_online() {
            tracing::debug!("network came back, reconciling");
            self.sync()?;
        }
        Ok(check)
    }

    fn set_query(&self, query: Option<String>) {
        *self.query.write() = query;
        self.refilter();
    }

    /// Re-applies the active filter to the current user list.
    fn refilter(&self) {
        let feed = self.engine.feed();
        let filtered = self
            .query
            .read()
            .as_deref()
            .map(|query| filter_users(&feed.snapshot().users, query));
        feed.emit(SyncEvent::FilteredUsers(filtered));
    }
}

/// Drives a [`SyncEngine`] on behalf of a presentation layer.
pub struct SyncController<R: RemoteSource, S: LocalStore, C: ConnectivityOracle> {
    shared: Arc<Shared<R, S, C>>,
    runtime: Handle,
}

impl<R, S, C> SyncController<R, S, C>
where
    R: RemoteSource + 'static,
    S: LocalStore + 'static,
    C: ConnectivityOracle + 'static,
{
    /// Creates a controller that runs actions on `runtime`.
    pub fn new(engine: Arc<SyncEngine<R, S, C>>, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                engine,
                query: RwLock::new(None),
            }),
            runtime,
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Arc<SyncEngine<R, S, C>> {
        &self.shared.engine
    }

    fn submit<T, F>(&self, action: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(&Shared<R, S, C>) -> SyncResult<T> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        TaskHandle {
            inner: self.runtime.spawn_blocking(move || action(&shared)),
        }
    }

    /// Runs the startup flow.
    ///
    /// Re-checks the network and publishes the stored users. When online,
    /// an empty store is filled from the remote and a non-empty store has
    /// its pending edits reconciled.
    pub fn start(&self) -> TaskHandle<StartupOutcome> {
        self.submit(|shared| shared.start())
    }

    /// Refreshes from the remote, reconciling pending edits first.
    ///
    /// Returns the number of users fetched.
    pub fn refresh(&self) -> TaskHandle<usize> {
        self.submit(|shared| shared.refresh())
    }

    /// Flips the favorite flag of a user.
    pub fn toggle_favorite(&self, id: UserId) -> TaskHandle<Option<User>> {
        self.submit(move |shared| shared.toggle(id))
    }

    /// Reconciles pending edits.
    pub fn sync(&self) -> TaskHandle<ReconcileResult> {
        self.submit(|shared| shared.sync())
    }

    /// Re-evaluates the network; coming back online triggers a reconcile.
    pub fn check_network_status(&self) -> TaskHandle<NetworkCheck> {
        self.submit(|shared| shared.check_network())
    }

    /// Sets the search query and publishes the filtered list.
    pub fn filter(&self, query: &str) {
        self.shared.set_query(Some(query.to_string()));
    }

    /// Clears the search query.
    pub fn clear_filter(&self) {
        self.shared.set_query(None);
    }

    /// Subscribes to the given channels.
    pub fn subscribe(&self, channels: &[Channel]) -> Subscription {
        self.shared.engine.feed().subscribe(channels)
    }

    /// Returns the last value of every channel.
    pub fn state(&self) -> Snapshot {
        self.shared.engine.feed().snapshot()
    }
}
