//! Record map shared by the store implementations.

use std::collections::BTreeMap;
use usersync_model::{FavoriteUpdate, User, UserId};

/// The in-memory image of a store.
#[derive(Debug, Clone, Default)]
pub(crate) struct Records {
    by_id: BTreeMap<UserId, User>,
}

impl Records {
    pub(crate) fn from_users(users: Vec<User>) -> Self {
        let mut records = Self::default();
        records.upsert_all(&users);
        records
    }

    pub(crate) fn sorted(&self) -> Vec<User> {
        let mut users: Vec<User> = self.by_id.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        users
    }

    pub(crate) fn get(&self, id: UserId) -> Option<User> {
        self.by_id.get(&id).cloned()
    }

    pub(crate) fn upsert_all(&mut self, users: &[User]) {
        for user in users {
            self.by_id.insert(user.id, user.clone());
        }
    }

    pub(crate) fn update_flags(
        &mut self,
        id: UserId,
        is_favorite: bool,
        pending_sync: bool,
    ) -> bool {
        match self.by_id.get_mut(&id) {
            Some(user) => {
                user.is_favorite = is_favorite;
                user.pending_sync = pending_sync;
                true
            }
            None => false,
        }
    }

    pub(crate) fn pending(&self) -> Vec<User> {
        let mut users = self.sorted();
        users.retain(|u| u.pending_sync);
        users
    }

    pub(crate) fn clear_all_pending(&mut self) -> usize {
        let mut cleared = 0;
        for user in self.by_id.values_mut().filter(|u| u.pending_sync) {
            user.pending_sync = false;
            cleared += 1;
        }
        cleared
    }

    pub(crate) fn acknowledge(&mut self, updates: &[FavoriteUpdate]) -> usize {
        let mut cleared = 0;
        for update in updates {
            if let Some(user) = self.by_id.get_mut(&update.id) {
                if user.pending_sync && user.is_favorite == update.is_favorite {
                    user.pending_sync = false;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}
