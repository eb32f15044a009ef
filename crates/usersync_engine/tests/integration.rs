//! Integration tests for the engine over HTTP and a file store.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use usersync_engine::{
    filter_users, EngineConfig, HttpClient, HttpRemote, HttpResponse, RetryConfig,
    StaticConnectivity, SyncEngine, SyncError,
};
use usersync_model::{
    decode_favorite_patch, decode_users, encode_users, SyncStatus, User, UserId,
};
use usersync_store::{FileStore, LocalStore};
use usersync_testkit::{TestFileStore, USERS_JSON};

/// An HTTP client that answers from an in-memory user directory.
struct DirectoryServer {
    users: Mutex<BTreeMap<UserId, User>>,
    favorites: Mutex<BTreeMap<UserId, bool>>,
    fail_status: Mutex<Option<u16>>,
}

impl DirectoryServer {
    fn new() -> Self {
        let users = decode_users(USERS_JSON.as_bytes())
            .unwrap()
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        Self {
            users: Mutex::new(users),
            favorites: Mutex::new(BTreeMap::new()),
            fail_status: Mutex::new(None),
        }
    }

    fn fail_with(&self, status: Option<u16>) {
        *self.fail_status.lock() = status;
    }

    fn favorite(&self, id: UserId) -> Option<bool> {
        self.favorites.lock().get(&id).copied()
    }

    fn delete(&self, id: UserId) {
        self.users.lock().remove(&id);
    }
}

impl HttpClient for DirectoryServer {
    fn get(&self, url: &str) -> Result<HttpResponse, String> {
        if let Some(status) = *self.fail_status.lock() {
            return Ok(HttpResponse::new(status, Vec::new()));
        }
        if !url.ends_with("/users") {
            return Ok(HttpResponse::new(404, Vec::new()));
        }
        let users: Vec<User> = self.users.lock().values().cloned().collect();
        let body = encode_users(&users).map_err(|e| e.to_string())?;
        Ok(HttpResponse::new(200, body))
    }

    fn patch(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
        if let Some(status) = *self.fail_status.lock() {
            return Ok(HttpResponse::new(status, Vec::new()));
        }
        let id: UserId = match url.rsplit('/').next().and_then(|s| s.parse().ok()) {
            Some(id) => id,
            None => return Ok(HttpResponse::new(404, Vec::new())),
        };
        if !self.users.lock().contains_key(&id) {
            return Ok(HttpResponse::new(404, Vec::new()));
        }
        let update = decode_favorite_patch(id, &body).map_err(|e| e.to_string())?;
        self.favorites.lock().insert(id, update.is_favorite);
        Ok(HttpResponse::new(200, body))
    }
}

type Engine = SyncEngine<
    HttpRemote<Arc<DirectoryServer>>,
    Arc<FileStore>,
    Arc<StaticConnectivity>,
>;

fn build_engine(
    server: &Arc<DirectoryServer>,
    store: FileStore,
    network: &Arc<StaticConnectivity>,
) -> Engine {
    let config =
        EngineConfig::new("https://directory.test/").with_retry(RetryConfig::no_retry());
    let remote = HttpRemote::new(config.base_url.clone(), Arc::clone(server));
    SyncEngine::new(config, remote, Arc::new(store), Arc::clone(network))
}

#[test]
fn startup_fetch_fills_empty_store() {
    let server = Arc::new(DirectoryServer::new());
    let network = Arc::new(StaticConnectivity::online());
    let test_store = TestFileStore::new();
    let engine = build_engine(&server, test_store.reopen(), &network);

    assert_eq!(engine.user_count().unwrap(), 0);
    let merged = engine.refresh_users().unwrap();
    assert_eq!(merged.len(), 5);
    assert_eq!(engine.user_count().unwrap(), 5);
    assert!(engine.users().unwrap().iter().all(|u| !u.pending_sync));

    // The snapshot on disk matches.
    assert_eq!(test_store.reopen().count().unwrap(), 5);
}

#[test]
fn offline_edits_survive_restart_and_reconcile() {
    let server = Arc::new(DirectoryServer::new());
    let network = Arc::new(StaticConnectivity::online());
    let test_store = TestFileStore::new();

    {
        let engine = build_engine(&server, test_store.reopen(), &network);
        engine.refresh_users().unwrap();

        network.set_reachable(false);
        engine.toggle_favorite(3).unwrap();
        engine.toggle_favorite(5).unwrap();
        assert!(engine.has_pending_sync().unwrap());
        assert_eq!(server.favorite(3), None);
    }

    // Restart with the network back.
    network.set_reachable(true);
    let engine = build_engine(&server, test_store.reopen(), &network);
    assert!(engine.has_pending_sync().unwrap());

    let result = engine.sync_pending_changes().unwrap();
    assert_eq!(result.pushed, 2);
    assert_eq!(result.acknowledged, 2);
    assert_eq!(engine.status(), SyncStatus::Synced);
    assert_eq!(server.favorite(3), Some(true));
    assert_eq!(server.favorite(5), Some(true));
    assert!(!test_store.reopen().get_by_id(3).unwrap().unwrap().pending_sync);
}

#[test]
fn failed_reconciliation_keeps_flags() {
    let server = Arc::new(DirectoryServer::new());
    let network = Arc::new(StaticConnectivity::online());
    let test_store = TestFileStore::new();
    let engine = build_engine(&server, test_store.reopen(), &network);
    engine.refresh_users().unwrap();

    network.set_reachable(false);
    engine.toggle_favorite(1).unwrap();
    network.set_reachable(true);
    server.fail_with(Some(503));

    let err = engine.sync_pending_changes().unwrap_err();
    assert!(matches!(err, SyncError::Remote { status: 503 }));
    assert_eq!(engine.status(), SyncStatus::Error);
    assert!(test_store.reopen().get_by_id(1).unwrap().unwrap().pending_sync);

    server.fail_with(None);
    engine.sync_pending_changes().unwrap();
    assert_eq!(server.favorite(1), Some(true));
    assert!(!engine.has_pending_sync().unwrap());
}

#[test]
fn deleted_user_does_not_hold_back_accepted_updates() {
    let server = Arc::new(DirectoryServer::new());
    let network = Arc::new(StaticConnectivity::online());
    let test_store = TestFileStore::new();
    let engine = build_engine(&server, test_store.reopen(), &network);
    engine.refresh_users().unwrap();

    network.set_reachable(false);
    engine.toggle_favorite(3).unwrap();
    engine.toggle_favorite(5).unwrap();
    network.set_reachable(true);

    // Chelsey (5) sorts before Clementine (3), so her update goes first.
    server.delete(3);
    let err = engine.sync_pending_changes().unwrap_err();
    assert!(matches!(err, SyncError::Remote { status: 404 }));
    assert_eq!(engine.status(), SyncStatus::Error);
    assert_eq!(server.favorite(5), Some(true));

    let reopened = test_store.reopen();
    assert!(!reopened.get_by_id(5).unwrap().unwrap().pending_sync);
    assert!(reopened.get_by_id(3).unwrap().unwrap().pending_sync);
}

#[test]
fn refresh_keeps_local_favorites() {
    let server = Arc::new(DirectoryServer::new());
    let network = Arc::new(StaticConnectivity::online());
    let test_store = TestFileStore::new();
    let engine = build_engine(&server, test_store.reopen(), &network);

    engine.refresh_users().unwrap();
    engine.toggle_favorite(2).unwrap();
    server
        .users
        .lock()
        .entry(2)
        .and_modify(|u| u.email = "ervin@new.example".into());

    engine.refresh_users().unwrap();
    let ervin = engine.store().get_by_id(2).unwrap().unwrap();
    assert!(ervin.is_favorite);
    assert!(!ervin.pending_sync);
    assert_eq!(ervin.email, "ervin@new.example");
}

#[test]
fn filter_finds_user_by_city() {
    let server = Arc::new(DirectoryServer::new());
    let network = Arc::new(StaticConnectivity::online());
    let test_store = TestFileStore::new();
    let engine = build_engine(&server, test_store.reopen(), &network);
    engine.refresh_users().unwrap();

    let found = filter_users(&engine.users().unwrap(), "gwen");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Leanne Graham");
}
