//! Merging fetched records with local state.

use std::collections::HashMap;
use usersync_model::{User, UserId};

/// Merges an authoritative fetch with the records already stored.
///
/// Each fetched record keeps its profile fields, inherits `is_favorite`
/// from the stored record with the same ID (false for new IDs), and has
/// `pending_sync` cleared. Stored records absent from the fetch are not
/// part of the result and stay untouched in the store.
///
/// The result preserves the order of `fetched`.
pub fn merge_users(fetched: Vec<User>, existing: &[User]) -> Vec<User> {
    let favorites: HashMap<UserId, bool> = existing
        .iter()
        .map(|user| (user.id, user.is_favorite))
        .collect();

    fetched
        .into_iter()
        .map(|user| User {
            is_favorite: favorites.get(&user.id).copied().unwrap_or(false),
            pending_sync: false,
            ..user
        })
        .collect()
}
