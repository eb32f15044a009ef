//! Connectivity oracle and network-status tracking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Answers "is the network reachable right now".
///
/// Implementations are queried on demand and must return quickly; no
/// caching is expected.
pub trait ConnectivityOracle: Send + Sync {
    /// Returns true if the remote endpoint is believed reachable.
    fn is_reachable(&self) -> bool;
}

impl<T: ConnectivityOracle + ?Sized> ConnectivityOracle for Arc<T> {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }
}

/// A connectivity oracle whose answer is set explicitly.
///
/// Used by tests and by hosts that learn about connectivity through
/// platform callbacks.
#[derive(Debug)]
pub struct StaticConnectivity {
    reachable: AtomicBool,
}

impl StaticConnectivity {
    /// Creates an oracle with the given initial answer.
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: AtomicBool::new(reachable),
        }
    }

    /// Creates an oracle that reports the network as reachable.
    pub fn online() -> Self {
        Self::new(true)
    }

    /// Creates an oracle that reports the network as unreachable.
    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Changes the answer.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

impl ConnectivityOracle for StaticConnectivity {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}

/// Result of re-evaluating the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCheck {
    /// Last known value before this check.
    pub previous: bool,
    /// Value observed by this check.
    pub available: bool,
}

impl NetworkCheck {
    /// Returns true if the network went from unavailable to available.
    pub fn came_online(&self) -> bool {
        !self.previous && self.available
    }
}

/// Wraps an oracle and remembers its last answer.
///
/// The last-known value starts as "unavailable", so the first successful
/// check counts as coming online.
#[derive(Debug)]
pub struct NetworkMonitor<C: ConnectivityOracle> {
    oracle: C,
    last_known: AtomicBool,
}

impl<C: ConnectivityOracle> NetworkMonitor<C> {
    /// Creates a monitor around `oracle`.
    pub fn new(oracle: C) -> Self {
        Self {
            oracle,
            last_known: AtomicBool::new(false),
        }
    }

    /// Queries the oracle without touching the last-known value.
    pub fn is_reachable(&self) -> bool {
        self.oracle.is_reachable()
    }

    /// Queries the oracle and records the answer.
    pub fn check(&self) -> NetworkCheck {
        let available = self.oracle.is_reachable();
        let previous = self.last_known.swap(available, Ordering::SeqCst);
        NetworkCheck {
            previous,
            available,
        }
    }

    /// Records a value learned some other way, e.g. a completed request.
    pub fn record(&self, available: bool) {
        self.last_known.store(available, Ordering::SeqCst);
    }

    /// Returns the last recorded value.
    pub fn last_known(&self) -> bool {
        self.last_known.load(Ordering::SeqCst)
    }

    /// Returns the wrapped oracle.
    pub fn oracle(&self) -> &C {
        &self.oracle
    }
}
