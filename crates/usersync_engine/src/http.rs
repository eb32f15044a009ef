//! HTTP remote source.
//!
//! This module provides an HTTP-based [`RemoteSource`]. The actual HTTP
//! client is abstracted via a trait to allow different implementations
//! (reqwest, ureq, a platform networking stack, etc.).

use crate::error::{SyncError, SyncResult};
use crate::remote::{PushOutcome, RemoteResponse, RemoteSource};
use parking_lot::RwLock;
use std::sync::Arc;
use usersync_model::{decode_users, encode_favorite_patch, FavoriteUpdate, User};

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. An `Err`
/// means no response was received at all.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request.
    fn get(&self, url: &str) -> Result<HttpResponse, String>;

    /// Sends a PATCH request with a JSON body.
    fn patch(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn get(&self, url: &str) -> Result<HttpResponse, String> {
        (**self).get(url)
    }

    fn patch(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
        (**self).patch(url, body)
    }
}

/// HTTP-based remote source.
///
/// - `GET {base}/users` returns the user list as JSON
/// - `PATCH {base}/users/{id}` with `{"isFavorite": bool}` records one
///   favorite change
pub struct HttpRemote<C: HttpClient> {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client implementation.
    client: C,
    /// Last transport error message.
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpRemote<C> {
    /// Creates a new HTTP remote.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last transport error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn transport_error(&self, err: String) -> SyncError {
        tracing::warn!(error = %err, base_url = %self.base_url, "request failed");
        *self.last_error.write() = Some(err.clone());
        SyncError::transport_retryable(err)
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }

    fn patch_favorite(&self, update: &FavoriteUpdate) -> SyncResult<()> {
        let url = format!("{}/{}", self.users_url(), update.id);
        let body = encode_favorite_patch(update)?;
        let response = self
            .client
            .patch(&url, body)
            .map_err(|e| self.transport_error(e))?;

        if response.is_success() {
            Ok(())
        } else {
            Err(SyncError::Remote {
                status: response.status,
            })
        }
    }
}

impl<C: HttpClient> RemoteSource for HttpRemote<C> {
    fn fetch_users(&self) -> SyncResult<RemoteResponse<Vec<User>>> {
        let url = self.users_url();
        let response = self
            .client
            .get(&url)
            .map_err(|e| self.transport_error(e))?;
        self.clear_error();

        if !response.is_success() {
            return Ok(RemoteResponse::failure(response.status));
        }

        let users = decode_users(&response.body)?;
        tracing::debug!(count = users.len(), "fetched users");

        Ok(RemoteResponse {
            status: response.status,
            body: Some(users),
        })
    }

    fn push_favorites(&self, updates: &[FavoriteUpdate]) -> PushOutcome {
        let mut accepted = Vec::with_capacity(updates.len());
        for update in updates {
            match self.patch_favorite(update) {
                Ok(()) => accepted.push(*update),
                Err(e) => {
                    tracing::warn!(
                        id = update.id,
                        accepted = accepted.len(),
                        error = %e,
                        "favorite push stopped"
                    );
                    return PushOutcome::failed(accepted, e);
                }
            }
        }
        self.clear_error();

        PushOutcome::complete(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    const ONE_USER: &str = r#"[{"id":1,"name":"Leanne Graham","username":"Bret",
        "email":"Sincere@april.biz","phone":"1-770-736-8031 x56442","website":"hildegard.org",
        "address":{"street":"Kulas Light","suite":"Apt. 556","city":"Gwenborough",
        "zipcode":"92998-3874","geo":{"lat":"-37.3159","lng":"81.1496"}},
        "company":{"name":"Romaguera-Crona","catchPhrase":"Multi-layered client-server neural-net",
        "bs":"harness real-time e-markets"}}]"#;

    #[derive(Default)]
    struct TestClient {
        response: Mutex<Option<HttpResponse>>,
        rejected: Mutex<Option<(String, u16)>>,
        requests: Mutex<Vec<(String, Option<Vec<u8>>)>>,
    }

    impl TestClient {
        fn respond(&self, response: HttpResponse) {
            *self.response.lock() = Some(response);
        }

        fn reject(&self, url: &str, status: u16) {
            *self.rejected.lock() = Some((url.to_string(), status));
        }

        fn reply(&self) -> Result<HttpResponse, String> {
            self.response
                .lock()
                .clone()
                .ok_or_else(|| "connection refused".into())
        }
    }

    impl HttpClient for TestClient {
        fn get(&self, url: &str) -> Result<HttpResponse, String> {
            self.requests.lock().push((url.to_string(), None));
            self.reply()
        }

        fn patch(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
            self.requests.lock().push((url.to_string(), Some(body)));
            match self.rejected.lock().as_ref() {
                Some((rejected, status)) if rejected == url => {
                    Ok(HttpResponse::new(*status, "{}"))
                }
                _ => self.reply(),
            }
        }
    }

    #[test]
    fn remote_trims_base_url() {
        let remote = HttpRemote::new("https://users.example.com/", TestClient::default());
        assert_eq!(remote.base_url(), "https://users.example.com");
    }

    #[test]
    fn fetch_decodes_users() {
        let client = TestClient::default();
        client.respond(HttpResponse::new(200, ONE_USER));

        let remote = HttpRemote::new("https://users.example.com", client);
        let response = remote.fetch_users().unwrap();
        assert!(response.is_success());

        let users = response.body.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Leanne Graham");
        assert_eq!(
            remote.client.requests.lock()[0].0,
            "https://users.example.com/users"
        );
    }

    #[test]
    fn fetch_failure_status_is_not_an_error() {
        let client = TestClient::default();
        client.respond(HttpResponse::new(503, "unavailable"));

        let remote = HttpRemote::new("https://users.example.com", client);
        let response = remote.fetch_users().unwrap();
        assert_eq!(response.status, 503);
        assert!(response.body.is_none());
    }

    #[test]
    fn fetch_transport_failure() {
        let remote = HttpRemote::new("https://users.example.com", TestClient::default());

        let result = remote.fetch_users();
        assert!(matches!(result, Err(SyncError::Transport { retryable: true, .. })));
        assert_eq!(remote.last_error().as_deref(), Some("connection refused"));
    }

    #[test]
    fn fetch_undecodable_body() {
        let client = TestClient::default();
        client.respond(HttpResponse::new(200, "<html>maintenance</html>"));

        let remote = HttpRemote::new("https://users.example.com", client);
        assert!(matches!(remote.fetch_users(), Err(SyncError::Codec(_))));
    }

    #[test]
    fn push_sends_one_patch_per_update() {
        let client = TestClient::default();
        client.respond(HttpResponse::new(200, "{}"));

        let remote = HttpRemote::new("https://users.example.com", client);
        let outcome =
            remote.push_favorites(&[FavoriteUpdate::new(1, true), FavoriteUpdate::new(4, false)]);
        assert!(outcome.is_complete());
        assert_eq!(outcome.accepted.len(), 2);

        let requests = remote.client.requests.lock();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "https://users.example.com/users/1");
        assert_eq!(requests[0].1.as_deref(), Some(&br#"{"isFavorite":true}"#[..]));
        assert_eq!(requests[1].0, "https://users.example.com/users/4");
    }

    #[test]
    fn push_stops_at_first_rejection() {
        let client = TestClient::default();
        client.respond(HttpResponse::new(404, "{}"));

        let remote = HttpRemote::new("https://users.example.com", client);
        let outcome =
            remote.push_favorites(&[FavoriteUpdate::new(1, true), FavoriteUpdate::new(2, true)]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.into_result().unwrap_err().status_code(), Some(404));
        assert_eq!(remote.client.requests.lock().len(), 1);
    }

    #[test]
    fn push_reports_updates_accepted_before_a_rejection() {
        let client = TestClient::default();
        client.respond(HttpResponse::new(200, "{}"));
        client.reject("https://users.example.com/users/2", 404);

        let remote = HttpRemote::new("https://users.example.com", client);
        let outcome = remote.push_favorites(&[
            FavoriteUpdate::new(1, true),
            FavoriteUpdate::new(2, true),
            FavoriteUpdate::new(3, false),
        ]);
        assert_eq!(outcome.accepted, vec![FavoriteUpdate::new(1, true)]);
        assert!(matches!(outcome.failure, Some(SyncError::Remote { status: 404 })));
        assert_eq!(remote.client.requests.lock().len(), 2);
    }

    #[test]
    fn push_transport_failure_keeps_accepted_prefix() {
        let client = TestClient::default();
        client.reject("https://users.example.com/users/1", 200);

        let remote = HttpRemote::new("https://users.example.com", client);
        let outcome =
            remote.push_favorites(&[FavoriteUpdate::new(1, true), FavoriteUpdate::new(2, true)]);
        assert_eq!(outcome.accepted, vec![FavoriteUpdate::new(1, true)]);
        assert!(matches!(
            outcome.failure,
            Some(SyncError::Transport { retryable: true, .. })
        ));
        assert_eq!(remote.last_error().as_deref(), Some("connection refused"));
    }
}
