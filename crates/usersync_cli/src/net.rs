//! Network collaborators backed by `reqwest` and TCP probes.

use crate::error::{CliError, CliResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use usersync_engine::{ConnectivityOracle, HttpClient, HttpResponse};

/// Blocking HTTP client.
///
/// Must be created and dropped outside the tokio runtime; requests run on
/// the runtime's blocking pool.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> CliResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("usersync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn read(response: reqwest::blocking::Response) -> Result<HttpResponse, String> {
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| e.to_string())?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| e.to_string())?;
        Self::read(response)
    }

    fn patch(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
        let response = self
            .client
            .patch(url)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(body)
            .send()
            .map_err(|e| e.to_string())?;
        Self::read(response)
    }
}

/// Connectivity oracle that opens a TCP connection to the endpoint.
#[derive(Debug)]
pub struct ProbeConnectivity {
    host: String,
    port: u16,
    timeout: Duration,
    forced_offline: bool,
}

impl ProbeConnectivity {
    /// Creates a probe for the host and port of `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> CliResult<Self> {
        let (host, port) = probe_target(base_url)?;
        Ok(Self {
            host,
            port,
            timeout,
            forced_offline: false,
        })
    }

    /// Makes the probe report the network as unreachable.
    pub fn forced_offline(mut self, offline: bool) -> Self {
        self.forced_offline = offline;
        self
    }

    fn addresses(&self) -> Vec<SocketAddr> {
        match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                tracing::debug!(host = %self.host, error = %e, "name resolution failed");
                Vec::new()
            }
        }
    }
}

impl ConnectivityOracle for ProbeConnectivity {
    fn is_reachable(&self) -> bool {
        if self.forced_offline {
            return false;
        }
        self.addresses()
            .iter()
            .any(|addr| TcpStream::connect_timeout(addr, self.timeout).is_ok())
    }
}

/// Extracts the host and port a probe should connect to.
pub fn probe_target(base_url: &str) -> CliResult<(String, u16)> {
    let url = Url::parse(base_url).map_err(|e| CliError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;
    let host = url.host_str().ok_or_else(|| CliError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: "missing host".into(),
    })?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| CliError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: "unknown port".into(),
        })?;
    Ok((host.to_string(), port))
}
