//! Property-based test generators using proptest.
//!
//! Provides strategies for generating user lists and local states that
//! maintain the store's invariants (unique IDs).

use crate::fixtures::user;
use proptest::prelude::*;
use std::collections::BTreeMap;
use usersync_model::{User, UserId};

/// Strategy for generating user IDs in a small range, so lists collide.
pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
    1u32..64
}

/// Strategy for generating display names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{1,8} [A-Z][a-z]{1,10}").expect("Invalid regex")
}

/// Strategy for generating a single user with arbitrary flags.
pub fn user_strategy() -> impl Strategy<Value = User> {
    (
        user_id_strategy(),
        name_strategy(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(id, name, is_favorite, pending_sync)| User {
            is_favorite,
            pending_sync,
            ..user(id, &name)
        })
}

/// Strategy for generating a list of users with unique IDs.
pub fn users_strategy(max_len: usize) -> impl Strategy<Value = Vec<User>> {
    prop::collection::vec(user_strategy(), 0..=max_len).prop_map(|users| {
        users
            .into_iter()
            .map(|u| (u.id, u))
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect()
    })
}

/// Strategy for generating a remote response: unique IDs, flags cleared.
///
/// The endpoint never sends device-owned flags.
pub fn fetched_users_strategy(max_len: usize) -> impl Strategy<Value = Vec<User>> {
    users_strategy(max_len).prop_map(|users| {
        users
            .into_iter()
            .map(|u| User {
                is_favorite: false,
                pending_sync: false,
                ..u
            })
            .collect()
    })
}
