//! Group cancellation primitives for in-flight requests.
//!
//! The daemon never cancels a single request; teardown cancels everything at
//! once. Workers poll the shared [`ShutdownToken`] at stage boundaries and
//! abandon remaining work, and [`InFlightGauge`] lets the supervisor wait a
//! bounded grace period for connections to drain.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared flag tripped exactly once at daemon teardown.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    tripped: Arc<AtomicBool>,
}

impl ShutdownToken {
    /// Creates an untripped token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the token. Idempotent.
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    /// Whether teardown has begun.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// The underlying flag, for wiring into signal handlers.
    #[must_use]
    pub(crate) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.tripped)
    }
}

/// Counter of connections currently being served.
#[derive(Debug, Clone, Default)]
pub struct InFlightGauge {
    count: Arc<AtomicUsize>,
}

impl InFlightGauge {
    /// Creates a gauge at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one connection; the guard deregisters it on drop.
    #[must_use]
    pub fn enter(&self) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Number of connections currently in flight.
    #[must_use]
    pub fn current(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// RAII registration in an [`InFlightGauge`].
#[derive(Debug)]
pub struct InFlightGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
