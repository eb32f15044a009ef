//! Local store trait definition.

use crate::error::StoreResult;
use usersync_model::{FavoriteUpdate, User, UserId};

/// Durable keyed storage of user records.
///
/// # Invariants
///
/// - `upsert_all` replaces records with the same ID and inserts the rest;
///   it never deletes
/// - `get_all` returns records ordered by name (ties broken by ID)
/// - `update_flags` touches only the two device-owned flags of one record
/// - All methods are safe to call concurrently; each call is atomic with
///   respect to the records it touches
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait LocalStore: Send + Sync {
    /// Returns every stored record, ordered by name.
    fn get_all(&self) -> StoreResult<Vec<User>>;

    /// Returns the record with the given ID, if stored.
    fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Inserts or replaces every record in `users`, keyed by ID.
    ///
    /// The batch is applied atomically.
    fn upsert_all(&self, users: &[User]) -> StoreResult<()>;

    /// Sets both device-owned flags on one record.
    ///
    /// Returns `false` if no record with that ID exists; nothing is written
    /// in that case.
    fn update_flags(&self, id: UserId, is_favorite: bool, pending_sync: bool)
        -> StoreResult<bool>;

    /// Returns every record whose `pending_sync` flag is set, ordered by name.
    fn get_pending(&self) -> StoreResult<Vec<User>>;

    /// Clears `pending_sync` on every record.
    ///
    /// Returns the number of records that were pending.
    fn clear_all_pending(&self) -> StoreResult<usize>;

    /// Clears `pending_sync` on records the server acknowledged.
    ///
    /// A record is cleared only if its current `is_favorite` still equals
    /// the acknowledged value; a record toggled again after the update was
    /// sent stays pending. Returns the number of records cleared.
    fn acknowledge(&self, updates: &[FavoriteUpdate]) -> StoreResult<usize>;

    /// Returns the number of stored records.
    fn count(&self) -> StoreResult<usize>;
}

impl<T: LocalStore + ?Sized> LocalStore for std::sync::Arc<T> {
    fn get_all(&self) -> StoreResult<Vec<User>> {
        (**self).get_all()
    }

    fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        (**self).get_by_id(id)
    }

    fn upsert_all(&self, users: &[User]) -> StoreResult<()> {
        (**self).upsert_all(users)
    }

    fn update_flags(
        &self,
        id: UserId,
        is_favorite: bool,
        pending_sync: bool,
    ) -> StoreResult<bool> {
        (**self).update_flags(id, is_favorite, pending_sync)
    }

    fn get_pending(&self) -> StoreResult<Vec<User>> {
        (**self).get_pending()
    }

    fn clear_all_pending(&self) -> StoreResult<usize> {
        (**self).clear_all_pending()
    }

    fn acknowledge(&self, updates: &[FavoriteUpdate]) -> StoreResult<usize> {
        (**self).acknowledge(updates)
    }

    fn count(&self) -> StoreResult<usize> {
        (**self).count()
    }
}
