//! Remote source abstraction.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use usersync_model::{FavoriteUpdate, User, UserId};

/// A response from the remote authority.
///
/// A transport failure is reported as an `Err` by the [`RemoteSource`]
/// itself; a `RemoteResponse` means the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse<T> {
    /// HTTP-like status code.
    pub status: u16,
    /// Decoded body, present on success.
    pub body: Option<T>,
}

impl<T> RemoteResponse<T> {
    /// Creates a `200` response carrying `body`.
    pub fn ok(body: T) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    /// Creates a failed response with the given status.
    pub fn failure(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts into the body, or a [`SyncError::Remote`] for failures.
    ///
    /// A successful response without a body yields `T::default()`.
    pub fn into_result(self) -> SyncResult<T>
    where
        T: Default,
    {
        if self.is_success() {
            Ok(self.body.unwrap_or_default())
        } else {
            Err(SyncError::Remote {
                status: self.status,
            })
        }
    }
}

/// Result of transmitting a batch of favorite updates.
///
/// Updates are sent in order and a batch stops at its first failure, so
/// `accepted` is always a prefix of the batch.
#[derive(Debug, Default)]
pub struct PushOutcome {
    /// Updates the remote accepted.
    pub accepted: Vec<FavoriteUpdate>,
    /// The failure that ended the batch early.
    pub failure: Option<SyncError>,
}

impl PushOutcome {
    /// Every update in `accepted` went through.
    pub fn complete(accepted: Vec<FavoriteUpdate>) -> Self {
        Self {
            accepted,
            failure: None,
        }
    }

    /// The batch stopped at `error` after `accepted` went through.
    pub fn failed(accepted: Vec<FavoriteUpdate>, error: SyncError) -> Self {
        Self {
            accepted,
            failure: Some(error),
        }
    }

    /// Returns true if the whole batch was accepted.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts into the accepted updates, or the failure.
    pub fn into_result(self) -> SyncResult<Vec<FavoriteUpdate>> {
        match self.failure {
            None => Ok(self.accepted),
            Some(e) => Err(e),
        }
    }
}

/// The remote authority for user records.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, mock for testing, etc.).
pub trait RemoteSource: Send + Sync {
    /// Fetches the authoritative list of all users.
    fn fetch_users(&self) -> SyncResult<RemoteResponse<Vec<User>>>;

    /// Transmits favorite changes in order.
    ///
    /// Only the updates in [`PushOutcome::accepted`] were received; the rest
    /// of the batch must be sent again.
    fn push_favorites(&self, updates: &[FavoriteUpdate]) -> PushOutcome;
}

impl<T: RemoteSource + ?Sized> RemoteSource for Arc<T> {
    fn fetch_users(&self) -> SyncResult<RemoteResponse<Vec<User>>> {
        (**self).fetch_users()
    }

    fn push_favorites(&self, updates: &[FavoriteUpdate]) -> PushOutcome {
        (**self).push_favorites(updates)
    }
}

/// A mock remote source for testing.
///
/// Responses are scripted; every push is recorded. A scripted push failure
/// applies to the next `n` pushes only, which makes transient failures easy
/// to model. A rejected ID fails every batch that reaches it, after the
/// updates ahead of it have been accepted.
#[derive(Debug, Default)]
pub struct MockRemote {
    users_response: Mutex<Option<RemoteResponse<Vec<User>>>>,
    push_failure: Mutex<Option<(PushFailure, usize)>>,
    rejected: Mutex<Vec<(UserId, u16)>>,
    pushed: Mutex<Vec<Vec<FavoriteUpdate>>>,
    fetch_calls: AtomicUsize,
    push_calls: AtomicUsize,
}

#[derive(Debug, Clone, Copy)]
enum PushFailure {
    Status(u16),
    Transport,
}

impl MockRemote {
    /// Creates a new mock remote with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock remote that serves `users`.
    pub fn with_users(users: Vec<User>) -> Self {
        let remote = Self::new();
        remote.set_users(users);
        remote
    }

    /// Serves `users` on the next fetches.
    pub fn set_users(&self, users: Vec<User>) {
        *self.users_response.lock() = Some(RemoteResponse::ok(users));
    }

    /// Answers fetches with the given failure status.
    pub fn set_fetch_failure(&self, status: u16) {
        *self.users_response.lock() = Some(RemoteResponse::failure(status));
    }

    /// Answers the next `times` pushes with the given failure status.
    pub fn fail_pushes(&self, status: u16, times: usize) {
        *self.push_failure.lock() = Some((PushFailure::Status(status), times));
    }

    /// Fails the next `times` pushes at the transport level.
    pub fn drop_pushes(&self, times: usize) {
        *self.push_failure.lock() = Some((PushFailure::Transport, times));
    }

    /// Rejects every update for `id` with the given status.
    pub fn reject_id(&self, id: UserId, status: u16) {
        self.rejected.lock().push((id, status));
    }

    /// Returns every accepted push batch, in order.
    pub fn pushed(&self) -> Vec<Vec<FavoriteUpdate>> {
        self.pushed.lock().clone()
    }

    /// Returns the number of fetch calls made.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of push calls made, including failed ones.
    pub fn push_calls(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }

    fn take_push_failure(&self) -> Option<PushFailure> {
        let mut failure = self.push_failure.lock();
        match failure.as_mut() {
            Some((kind, remaining)) if *remaining > 0 => {
                *remaining -= 1;
                Some(*kind)
            }
            _ => None,
        }
    }
}

impl RemoteSource for MockRemote {
    fn fetch_users(&self) -> SyncResult<RemoteResponse<Vec<User>>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.users_response
            .lock()
            .clone()
            .ok_or_else(|| SyncError::transport_fatal("no mock users response set"))
    }

    fn push_favorites(&self, updates: &[FavoriteUpdate]) -> PushOutcome {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        match self.take_push_failure() {
            Some(PushFailure::Status(status)) => {
                return PushOutcome::failed(Vec::new(), SyncError::Remote { status });
            }
            Some(PushFailure::Transport) => {
                return PushOutcome::failed(
                    Vec::new(),
                    SyncError::transport_retryable("connection reset by peer"),
                );
            }
            None => {}
        }

        let rejected = self.rejected.lock();
        let mut accepted = Vec::with_capacity(updates.len());
        let mut failure = None;
        for update in updates {
            if let Some((_, status)) = rejected.iter().find(|(id, _)| *id == update.id) {
                failure = Some(SyncError::Remote { status: *status });
                break;
            }
            accepted.push(*update);
        }

        if !accepted.is_empty() {
            self.pushed.lock().push(accepted.clone());
        }
        PushOutcome { accepted, failure }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_into_result() {
        let ok: RemoteResponse<Vec<User>> = RemoteResponse::ok(Vec::new());
        assert!(ok.is_success());
        assert!(ok.into_result().unwrap().is_empty());

        let empty = RemoteResponse::<Vec<User>> {
            status: 204,
            body: None,
        };
        assert!(empty.into_result().unwrap().is_empty());

        let failed: RemoteResponse<()> = RemoteResponse::failure(503);
        assert!(matches!(
            failed.into_result(),
            Err(SyncError::Remote { status: 503 })
        ));
    }

    #[test]
    fn mock_remote_without_users_fails() {
        let remote = MockRemote::new();
        assert!(matches!(
            remote.fetch_users(),
            Err(SyncError::Transport { .. })
        ));
        assert_eq!(remote.fetch_calls(), 1);
    }

    #[test]
    fn mock_remote_push_failures_are_counted_down() {
        let remote = MockRemote::new();
        remote.fail_pushes(500, 1);

        let update = [FavoriteUpdate::new(1, true)];
        let first = remote.push_favorites(&update);
        assert!(first.accepted.is_empty());
        assert_eq!(first.into_result().unwrap_err().status_code(), Some(500));

        let second = remote.push_favorites(&update);
        assert!(second.is_complete());
        assert_eq!(remote.pushed(), vec![update.to_vec()]);
        assert_eq!(remote.push_calls(), 2);
    }

    #[test]
    fn mock_remote_dropped_push() {
        let remote = MockRemote::new();
        remote.drop_pushes(1);

        let outcome = remote.push_favorites(&[FavoriteUpdate::new(1, false)]);
        assert!(matches!(
            outcome.failure,
            Some(SyncError::Transport { retryable: true, .. })
        ));
        assert!(remote.pushed().is_empty());
    }

    #[test]
    fn mock_remote_rejected_id_stops_the_batch() {
        let remote = MockRemote::new();
        remote.reject_id(2, 404);

        let outcome = remote.push_favorites(&[
            FavoriteUpdate::new(1, true),
            FavoriteUpdate::new(2, true),
            FavoriteUpdate::new(3, true),
        ]);
        assert_eq!(outcome.accepted, vec![FavoriteUpdate::new(1, true)]);
        assert!(matches!(outcome.failure, Some(SyncError::Remote { status: 404 })));
        assert_eq!(remote.pushed(), vec![vec![FavoriteUpdate::new(1, true)]]);
    }
}
