//! Test fixtures and store helpers.
//!
//! Provides sample users shaped like the real endpoint's data and
//! temporary file stores that clean up after themselves.

use crate::vectors::USERS_JSON;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use usersync_model::{decode_users, Address, Company, Geo, User, UserId};
use usersync_store::FileStore;

/// Returns the five users of [`USERS_JSON`], in ID order.
pub fn sample_users() -> Vec<User> {
    decode_users(USERS_JSON.as_bytes()).expect("sample users must decode")
}

/// Returns the sample user with `id`, or a synthetic one for other IDs.
pub fn sample_user(id: UserId) -> User {
    sample_users()
        .into_iter()
        .find(|u| u.id == id)
        .unwrap_or_else(|| user(id, &format!("User {id}")))
}

/// Builds a minimal user with the given ID and name.
///
/// The email, phone and city are derived from the ID so filters can target
/// a single record.
pub fn user(id: UserId, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        phone: format!("555-{id:04}"),
        website: "example.com".into(),
        address: Address {
            street: "Main Street".into(),
            suite: format!("Apt. {id}"),
            city: format!("Town {id}"),
            zipcode: "00000".into(),
            geo: Geo {
                lat: "0.0".into(),
                lng: "0.0".into(),
            },
        },
        company: Company {
            name: "Example Inc".into(),
            catch_phrase: "Testing things".into(),
            bs: "synergize tests".into(),
        },
        is_favorite: false,
        pending_sync: false,
    }
}

/// Returns `user` marked as a favorite that still awaits reconciliation.
pub fn pending_favorite(mut user: User) -> User {
    user.is_favorite = true;
    user.pending_sync = true;
    user
}

/// A file store in a temporary directory.
pub struct TestFileStore {
    /// The store instance.
    pub store: FileStore,
    path: PathBuf,
    /// Kept alive to prevent cleanup.
    _temp_dir: TempDir,
}

impl TestFileStore {
    /// Creates an empty file store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("users.json");
        let store = FileStore::open(&path).expect("Failed to open file store");
        Self {
            store,
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a second store over the same file, as a restart would.
    pub fn reopen(&self) -> FileStore {
        FileStore::open(&self.path).expect("Failed to reopen file store")
    }
}

impl Default for TestFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestFileStore {
    type Target = FileStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary file store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&FileStore, &Path) -> R,
{
    let test_store = TestFileStore::new();
    f(&test_store.store, test_store.path())
}
