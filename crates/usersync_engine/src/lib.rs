//! # usersync engine
//!
//! Offline-first synchronization for a remote user directory.
//!
//! This crate provides:
//! - Fetch-and-merge of the authoritative user list
//! - Favorite toggles that work offline and are marked pending
//! - Reconciliation of pending edits with retry and backoff
//! - An HTTP remote source over a pluggable client
//! - An event feed with named channels for the presentation layer
//! - A tokio-backed controller that runs each user action as a tracked task
//!
//! ## Architecture
//!
//! The remote is authoritative for profile fields; the device owns the
//! `is_favorite` and `pending_sync` flags:
//! 1. A refresh replaces profile fields and keeps local favorites
//! 2. A toggle made offline is stored with `pending_sync = true`
//! 3. Reconciliation transmits pending favorites, then clears the flags
//!    the remote acknowledged
//!
//! ## Key Invariants
//!
//! - A refresh never leaves a record pending
//! - A pending flag is only cleared after the remote accepted the value
//! - Refresh and reconciliation never run concurrently
//! - Offline reconciliation fails without touching status or store

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod connectivity;
mod controller;
mod engine;
mod error;
mod feed;
mod filter;
mod http;
mod merge;
mod remote;

pub use config::{EngineConfig, RetryConfig, DEFAULT_BASE_URL};
pub use connectivity::{ConnectivityOracle, NetworkCheck, NetworkMonitor, StaticConnectivity};
pub use controller::{StartupOutcome, SyncController, TaskHandle};
pub use engine::{ReconcileResult, SyncEngine, SyncStats};
pub use error::{SyncError, SyncResult};
pub use feed::{Channel, EventFeed, Snapshot, Subscription, SubscriptionId, SyncEvent};
pub use filter::filter_users;
pub use http::{HttpClient, HttpRemote, HttpResponse};
pub use merge::merge_users;
pub use remote::{MockRemote, PushOutcome, RemoteResponse, RemoteSource};
