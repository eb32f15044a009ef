//! Event feed for observing engine state.
//!
//! The presentation layer subscribes to named channels and receives a
//! [`SyncEvent`] each time one of them changes. Subscribing replays the
//! current value of every requested channel, so a late subscriber never
//! misses the state it should render.
//!
//! # Usage
//!
//! ```rust,ignore
//! let subscription = engine.feed().subscribe(&[Channel::Users, Channel::Status]);
//!
//! std::thread::spawn(move || {
//!     while let Ok(event) = subscription.recv() {
//!         println!("{:?}", event);
//!     }
//! });
//! ```

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use usersync_model::{SyncStatus, User};

/// A named observable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// The current user list.
    Users,
    /// Whether a refresh is in progress.
    Loading,
    /// The last error message; empty means no error.
    ErrorMessage,
    /// The last known network availability.
    NetworkAvailable,
    /// The reconciliation status.
    Status,
    /// The filtered user list, absent when no filter is active.
    FilteredUsers,
}

impl Channel {
    /// All channels.
    pub const ALL: [Channel; 6] = [
        Channel::Users,
        Channel::Loading,
        Channel::ErrorMessage,
        Channel::NetworkAvailable,
        Channel::Status,
        Channel::FilteredUsers,
    ];
}

/// A change on one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// New user list.
    Users(Vec<User>),
    /// Loading flag changed.
    Loading(bool),
    /// Error message changed.
    ErrorMessage(String),
    /// Network availability changed.
    NetworkAvailable(bool),
    /// Status changed.
    Status(SyncStatus),
    /// Filtered list changed; `None` clears the filter.
    FilteredUsers(Option<Vec<User>>),
}

impl SyncEvent {
    /// Returns the channel this event belongs to.
    pub fn channel(&self) -> Channel {
        match self {
            SyncEvent::Users(_) => Channel::Users,
            SyncEvent::Loading(_) => Channel::Loading,
            SyncEvent::ErrorMessage(_) => Channel::ErrorMessage,
            SyncEvent::NetworkAvailable(_) => Channel::NetworkAvailable,
            SyncEvent::Status(_) => Channel::Status,
            SyncEvent::FilteredUsers(_) => Channel::FilteredUsers,
        }
    }
}

/// The last value emitted on every channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Current user list.
    pub users: Vec<User>,
    /// Loading flag.
    pub is_loading: bool,
    /// Error message; empty means no error.
    pub error_message: String,
    /// Network availability.
    pub network_available: bool,
    /// Reconciliation status.
    pub sync_status: SyncStatus,
    /// Filtered user list.
    pub filtered_users: Option<Vec<User>>,
}

impl Snapshot {
    fn apply(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::Users(users) => self.users = users.clone(),
            SyncEvent::Loading(loading) => self.is_loading = *loading,
            SyncEvent::ErrorMessage(message) => self.error_message = message.clone(),
            SyncEvent::NetworkAvailable(available) => self.network_available = *available,
            SyncEvent::Status(status) => self.sync_status = *status,
            SyncEvent::FilteredUsers(users) => self.filtered_users = users.clone(),
        }
    }

    fn event_for(&self, channel: Channel) -> SyncEvent {
        match channel {
            Channel::Users => SyncEvent::Users(self.users.clone()),
            Channel::Loading => SyncEvent::Loading(self.is_loading),
            Channel::ErrorMessage => SyncEvent::ErrorMessage(self.error_message.clone()),
            Channel::NetworkAvailable => SyncEvent::NetworkAvailable(self.network_available),
            Channel::Status => SyncEvent::Status(self.sync_status),
            Channel::FilteredUsers => SyncEvent::FilteredUsers(self.filtered_users.clone()),
        }
    }
}

/// Identifier returned by [`EventFeed::subscribe`].
pub type SubscriptionId = u64;

/// A live subscription to one or more channels.
///
/// Dropping the subscription disconnects it; the feed prunes it on the
/// next emit.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: Receiver<SyncEvent>,
}

impl Subscription {
    /// Returns the subscription ID.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Blocks until the next event.
    pub fn recv(&self) -> Result<SyncEvent, RecvError> {
        self.receiver.recv()
    }

    /// Returns the next event if one is queued.
    pub fn try_recv(&self) -> Result<SyncEvent, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SyncEvent, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Returns every queued event without blocking.
    pub fn drain(&self) -> Vec<SyncEvent> {
        self.receiver.try_iter().collect()
    }
}

struct Subscriber {
    id: SubscriptionId,
    channels: Vec<Channel>,
    sender: Sender<SyncEvent>,
}

/// Distributes state changes to subscribers.
///
/// The feed:
/// - Keeps the last value of every channel
/// - Preserves emit order per subscriber
/// - Supports multiple subscribers with different channel sets
/// - Is thread-safe
pub struct EventFeed {
    /// Last value of every channel.
    state: RwLock<Snapshot>,
    /// Active subscribers.
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl EventFeed {
    /// Creates a feed with default channel values.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Snapshot::default()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribes to `channels`.
    ///
    /// The current value of each requested channel is queued on the new
    /// subscription before any later event.
    pub fn subscribe(&self, channels: &[Channel]) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // Holding the state lock orders the replay before concurrent emits.
        let state = self.state.read();
        for channel in channels {
            let _ = sender.send(state.event_for(*channel));
        }
        self.subscribers.write().push(Subscriber {
            id,
            channels: channels.to_vec(),
            sender,
        });
        drop(state);

        Subscription { id, receiver }
    }

    /// Subscribes to every channel.
    pub fn subscribe_all(&self) -> Subscription {
        self.subscribe(&Channel::ALL)
    }

    /// Removes a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Records `event` and sends it to every subscriber of its channel.
    pub fn emit(&self, event: SyncEvent) {
        let mut state = self.state.write();
        state.apply(&event);

        let channel = event.channel();
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|s| {
            !s.channels.contains(&channel) || s.sender.send(event.clone()).is_ok()
        });
    }

    /// Returns the last value of every channel.
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().clone()
    }

    /// Returns the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usersync_testkit::sample_user;

    #[test]
    fn subscribe_replays_current_values() {
        let feed = EventFeed::new();
        feed.emit(SyncEvent::Status(SyncStatus::Pending));

        let sub = feed.subscribe(&[Channel::Status, Channel::Loading]);
        assert_eq!(
            sub.drain(),
            vec![
                SyncEvent::Status(SyncStatus::Pending),
                SyncEvent::Loading(false)
            ]
        );
    }

    #[test]
    fn events_only_reach_their_channel() {
        let feed = EventFeed::new();
        let sub = feed.subscribe(&[Channel::Users]);
        sub.drain();

        feed.emit(SyncEvent::Loading(true));
        feed.emit(SyncEvent::Users(vec![sample_user(1)]));

        assert_eq!(sub.drain(), vec![SyncEvent::Users(vec![sample_user(1)])]);
    }

    #[test]
    fn subscribers_receive_in_emit_order() {
        let feed = EventFeed::new();
        let sub = feed.subscribe(&[Channel::Status]);
        sub.drain();

        feed.emit(SyncEvent::Status(SyncStatus::Syncing));
        feed.emit(SyncEvent::Status(SyncStatus::Synced));

        assert_eq!(
            sub.drain(),
            vec![
                SyncEvent::Status(SyncStatus::Syncing),
                SyncEvent::Status(SyncStatus::Synced)
            ]
        );
    }

    #[test]
    fn unsubscribe_removes_subscriber() {
        let feed = EventFeed::new();
        let sub = feed.subscribe_all();
        assert_eq!(feed.subscriber_count(), 1);

        assert!(feed.unsubscribe(sub.id()));
        assert!(!feed.unsubscribe(sub.id()));
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let feed = EventFeed::new();
        let sub = feed.subscribe(&[Channel::Loading]);
        let _other = feed.subscribe(&[Channel::Users]);
        drop(sub);

        // Only subscribers of the emitted channel are probed.
        feed.emit(SyncEvent::Users(Vec::new()));
        assert_eq!(feed.subscriber_count(), 2);

        feed.emit(SyncEvent::Loading(true));
        assert_eq!(feed.subscriber_count(), 1);
    }

    #[test]
    fn snapshot_tracks_last_values() {
        let feed = EventFeed::new();
        feed.emit(SyncEvent::ErrorMessage("server error: 500".into()));
        feed.emit(SyncEvent::NetworkAvailable(true));
        feed.emit(SyncEvent::FilteredUsers(Some(vec![sample_user(3)])));

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.error_message, "server error: 500");
        assert!(snapshot.network_available);
        assert_eq!(snapshot.filtered_users, Some(vec![sample_user(3)]));
        assert_eq!(snapshot.sync_status, SyncStatus::Idle);
    }
}
