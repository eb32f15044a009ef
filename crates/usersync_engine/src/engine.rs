//! Sync engine: fetch-and-merge, favorite toggles and reconciliation.

use crate::config::EngineConfig;
use crate::connectivity::{ConnectivityOracle, NetworkCheck, NetworkMonitor};
use crate::error::{SyncError, SyncResult};
use crate::feed::{EventFeed, SyncEvent};
use crate::merge::merge_users;
use crate::remote::{PushOutcome, RemoteSource};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use usersync_model::{FavoriteUpdate, SyncStatus, User, UserId};
use usersync_store::LocalStore;

/// Statistics about engine operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Number of successful fetch-and-merge runs.
    pub refreshes_completed: u64,
    /// Number of reconciliations that transmitted changes.
    pub reconciliations_completed: u64,
    /// Total number of favorite updates acknowledged by the remote.
    pub favorites_pushed: u64,
    /// Total number of push retries.
    pub retries: u64,
    /// Last successful refresh.
    pub last_refresh_time: Option<Instant>,
    /// Last successful reconciliation.
    pub last_sync_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileResult {
    /// Number of updates the remote accepted.
    pub pushed: usize,
    /// Number of records whose pending flag was cleared.
    pub acknowledged: usize,
    /// True when nothing was pending and no call was made.
    pub skipped: bool,
    /// Duration of the run.
    pub duration: Duration,
}

impl ReconcileResult {
    fn skipped(duration: Duration) -> Self {
        Self {
            pushed: 0,
            acknowledged: 0,
            skipped: true,
            duration,
        }
    }
}

/// The offline-first sync engine.
///
/// Owns no presentation state: every observable change goes through the
/// [`EventFeed`]. Refresh and reconciliation are serialized against each
/// other; toggles may interleave with either.
pub struct SyncEngine<R: RemoteSource, S: LocalStore, C: ConnectivityOracle> {
    config: EngineConfig,
    remote: Arc<R>,
    store: Arc<S>,
    network: NetworkMonitor<C>,
    feed: EventFeed,
    status: RwLock<SyncStatus>,
    stats: RwLock<SyncStats>,
    /// Held for the duration of a store-wide operation.
    in_flight: Mutex<()>,
}

impl<R: RemoteSource, S: LocalStore, C: ConnectivityOracle> SyncEngine<R, S, C> {
    /// Creates a new sync engine.
    pub fn new(config: EngineConfig, remote: R, store: S, connectivity: C) -> Self {
        Self {
            config,
            remote: Arc::new(remote),
            store: Arc::new(store),
            network: NetworkMonitor::new(connectivity),
            feed: EventFeed::new(),
            status: RwLock::new(SyncStatus::Idle),
            stats: RwLock::new(SyncStats::default()),
            in_flight: Mutex::new(()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the event feed.
    pub fn feed(&self) -> &EventFeed {
        &self.feed
    }

    /// Returns the remote source.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Returns the local store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gets the current status.
    pub fn status(&self) -> SyncStatus {
        *self.status.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Fetches the authoritative list and merges it into the store.
    ///
    /// Returns the merged list in fetch order. On failure the store is
    /// left untouched.
    pub fn refresh_users(&self) -> SyncResult<Vec<User>> {
        let _guard = self.in_flight.lock();

        match self.fetch_and_merge() {
            Ok(merged) => {
                {
                    let mut stats = self.stats.write();
                    stats.refreshes_completed += 1;
                    stats.last_refresh_time = Some(Instant::now());
                    stats.last_error = None;
                }
                tracing::info!(count = merged.len(), "refresh completed");
                self.load_users()?;
                Ok(merged)
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed");
                self.record_error(&e);
                Err(e)
            }
        }
    }

    fn fetch_and_merge(&self) -> SyncResult<Vec<User>> {
        if !self.network.is_reachable() {
            return Err(SyncError::NoConnectivity);
        }

        let fetched = self.remote.fetch_users()?.into_result()?;
        let existing = self.store.get_all()?;
        let merged = merge_users(fetched, &existing);
        self.store.upsert_all(&merged)?;

        Ok(merged)
    }

    /// Flips the favorite flag of a user.
    ///
    /// When the network is reachable the change is pushed right away and
    /// only stays pending if the push fails. Offline changes are stored as
    /// pending. A missing ID is a no-op that returns `Ok(None)`.
    pub fn toggle_favorite(&self, id: UserId) -> SyncResult<Option<User>> {
        let Some(user) = self.store.get_by_id(id)? else {
            tracing::debug!(id, "toggle ignored, no such user");
            return Ok(None);
        };

        let update = FavoriteUpdate::new(id, !user.is_favorite);
        let pending = if self.network.is_reachable() {
            match self.push_once(&[update]) {
                Ok(()) => {
                    self.stats.write().favorites_pushed += 1;
                    false
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "favorite push failed, keeping it pending");
                    true
                }
            }
        } else {
            true
        };

        if !self.store.update_flags(id, update.is_favorite, pending)? {
            // Deleted between the read and the write.
            return Ok(None);
        }
        tracing::debug!(id, is_favorite = update.is_favorite, pending, "favorite toggled");

        if pending {
            self.set_status(SyncStatus::Pending);
        }
        self.load_users()?;

        Ok(Some(User {
            is_favorite: update.is_favorite,
            pending_sync: pending,
            ..user
        }))
    }

    /// Returns true if at least one stored record awaits reconciliation.
    pub fn has_pending_sync(&self) -> SyncResult<bool> {
        Ok(!self.store.get_pending()?.is_empty())
    }

    /// Transmits every pending favorite and clears the acknowledged flags.
    ///
    /// Fails with [`SyncError::NoConnectivity`] without any state change
    /// when offline. With nothing pending this succeeds without a status
    /// transition or a network call.
    pub fn sync_pending_changes(&self) -> SyncResult<ReconcileResult> {
        let start = Instant::now();

        if !self.network.is_reachable() {
            return Err(SyncError::NoConnectivity);
        }

        let _guard = self.in_flight.lock();

        let pending = self.store.get_pending()?;
        if pending.is_empty() {
            tracing::debug!("nothing to reconcile");
            return Ok(ReconcileResult::skipped(start.elapsed()));
        }

        let updates: Vec<FavoriteUpdate> = pending.iter().map(FavoriteUpdate::from).collect();

        self.set_status(SyncStatus::Syncing);
        let outcome = self.push_with_retry(&updates);
        let pushed = outcome.accepted.len();
        let acknowledged = match self.acknowledge(&outcome.accepted) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, pushed, "acknowledging pushed favorites failed");
                self.handle_error(&e);
                return Err(e);
            }
        };
        self.stats.write().favorites_pushed += pushed as u64;

        if let Some(e) = outcome.failure {
            tracing::warn!(
                error = %e,
                pushed,
                acknowledged,
                unsent = updates.len() - pushed,
                "reconciliation failed"
            );
            self.handle_error(&e);
            if acknowledged > 0 {
                self.load_users()?;
            }
            return Err(e);
        }

        {
            let mut stats = self.stats.write();
            stats.reconciliations_completed += 1;
            stats.last_sync_time = Some(Instant::now());
            stats.last_error = None;
        }
        self.set_status(SyncStatus::Synced);
        tracing::info!(pushed, acknowledged, "reconciliation completed");

        // A toggle that landed during the push is still pending.
        if acknowledged < pushed && self.has_pending_sync()? {
            self.set_status(SyncStatus::Pending);
        }
        self.load_users()?;

        Ok(ReconcileResult {
            pushed,
            acknowledged,
            skipped: false,
            duration: start.elapsed(),
        })
    }

    /// Re-evaluates the network and publishes the result.
    pub fn check_network(&self) -> NetworkCheck {
        let check = self.network.check();
        if check.previous != check.available {
            tracing::info!(available = check.available, "network status changed");
        }
        self.feed.emit(SyncEvent::NetworkAvailable(check.available));
        check
    }

    /// Records network availability learned from a completed request.
    pub fn mark_network(&self, available: bool) {
        self.network.record(available);
        self.feed.emit(SyncEvent::NetworkAvailable(available));
    }

    /// Returns the last known network availability.
    pub fn is_network_available(&self) -> bool {
        self.network.last_known()
    }

    /// Returns the number of stored users.
    pub fn user_count(&self) -> SyncResult<usize> {
        Ok(self.store.count()?)
    }

    /// Returns every stored user, ordered by name.
    pub fn users(&self) -> SyncResult<Vec<User>> {
        Ok(self.store.get_all()?)
    }

    /// Reads the store and publishes the user list.
    pub fn load_users(&self) -> SyncResult<Vec<User>> {
        let users = self.store.get_all()?;
        self.feed.emit(SyncEvent::Users(users.clone()));
        Ok(users)
    }

    fn push_once(&self, updates: &[FavoriteUpdate]) -> SyncResult<()> {
        self.remote.push_favorites(updates).into_result().map(|_| ())
    }

    /// Pushes with retry on transient errors.
    ///
    /// Each attempt resends only the updates the remote has not accepted
    /// yet. The outcome collects every accepted update across attempts.
    fn push_with_retry(&self, updates: &[FavoriteUpdate]) -> PushOutcome {
        let retry_config = &self.config.retry;
        let mut accepted = Vec::with_capacity(updates.len());
        let mut remaining = updates;

        for attempt in 0..retry_config.max_attempts {
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                tracing::debug!(attempt, ?delay, remaining = remaining.len(), "retrying push");
                std::thread::sleep(delay);

                self.stats.write().retries += 1;
            }

            let outcome = self.remote.push_favorites(remaining);
            remaining = &remaining[outcome.accepted.len().min(remaining.len())..];
            accepted.extend(outcome.accepted);

            match outcome.failure {
                None => return PushOutcome::complete(accepted),
                Some(e) if e.is_retryable() && attempt + 1 < retry_config.max_attempts => {}
                Some(e) => return PushOutcome::failed(accepted, e),
            }
        }

        PushOutcome::failed(accepted, SyncError::transport_fatal("no push attempts made"))
    }

    fn acknowledge(&self, accepted: &[FavoriteUpdate]) -> SyncResult<usize> {
        if accepted.is_empty() {
            return Ok(0);
        }
        Ok(self.store.acknowledge(accepted)?)
    }

    fn set_status(&self, status: SyncStatus) {
        *self.status.write() = status;
        self.feed.emit(SyncEvent::Status(status));
    }

    fn record_error(&self, error: &SyncError) {
        self.stats.write().last_error = Some(error.to_string());
    }

    /// Handles a reconciliation error by updating status and stats.
    fn handle_error(&self, error: &SyncError) {
        self.set_status(SyncStatus::Error);
        self.record_error(error);
    }
}

impl<R: RemoteSource, S: LocalStore, C: ConnectivityOracle> std::fmt::Debug
    for SyncEngine<R, S, C>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("base_url", &self.config.base_url)
            .field("status", &self.status())
            .finish()
    }
}
