//! Reconciliation status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The reconciliation state published to the presentation layer.
///
/// The state machine is cyclical:
///
/// ```text
/// Idle ──toggle offline──▶ Pending ──sync──▶ Syncing ──▶ Synced | Error
///   ▲                                                       │
///   └───────────────── next toggle / next sync ◀────────────┘
/// ```
///
/// `Synced` and `Error` are terminal *events*: the engine does not move out
/// of them on its own, the presentation layer hides them after a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Nothing to report.
    #[default]
    Idle,
    /// Local changes are waiting for connectivity.
    Pending,
    /// Pending changes are being transmitted.
    Syncing,
    /// The last reconciliation completed.
    Synced,
    /// The last reconciliation failed.
    Error,
}

impl SyncStatus {
    /// Returns true for states that end a reconciliation attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStatus::Synced | SyncStatus::Error)
    }

    /// Returns true while a reconciliation is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, SyncStatus::Syncing)
    }

    /// Returns the lowercase name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Pending => "pending",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
