//! In-memory store for testing.

use crate::error::StoreResult;
use crate::records::Records;
use crate::store::LocalStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use usersync_model::{FavoriteUpdate, User, UserId};

/// An in-memory local store.
///
/// This store keeps all records in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Sessions that don't need persistence
///
/// It also counts writes, which lets tests assert that an operation
/// performed no writes at all.
///
/// # Example
///
/// ```rust
/// use usersync_store::{InMemoryStore, LocalStore};
///
/// let store = InMemoryStore::new();
/// store.upsert_all(&[]).unwrap();
/// assert_eq!(store.writes(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Records>,
    writes: AtomicU64,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given records.
    ///
    /// Seeding does not count as a write.
    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            records: RwLock::new(Records::from_users(users)),
            writes: AtomicU64::new(0),
        }
    }

    /// Returns the number of writes made so far. A flag update on a missing
    /// ID is not one.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl LocalStore for InMemoryStore {
    fn get_all(&self) -> StoreResult<Vec<User>> {
        Ok(self.records.read().sorted())
    }

    fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.records.read().get(id))
    }

    fn upsert_all(&self, users: &[User]) -> StoreResult<()> {
        self.records.write().upsert_all(users);
        self.record_write();
        Ok(())
    }

    fn update_flags(
        &self,
        id: UserId,
        is_favorite: bool,
        pending_sync: bool,
    ) -> StoreResult<bool> {
        let updated = self
            .records
            .write()
            .update_flags(id, is_favorite, pending_sync);
        if updated {
            self.record_write();
        }
        Ok(updated)
    }

    fn get_pending(&self) -> StoreResult<Vec<User>> {
        Ok(self.records.read().pending())
    }

    fn clear_all_pending(&self) -> StoreResult<usize> {
        self.record_write();
        Ok(self.records.write().clear_all_pending())
    }

    fn acknowledge(&self, updates: &[FavoriteUpdate]) -> StoreResult<usize> {
        self.record_write();
        Ok(self.records.write().acknowledge(updates))
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.records.read().len())
    }
}
