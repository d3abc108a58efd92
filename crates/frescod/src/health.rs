//! Structured health reporting for daemon lifecycle events.

use std::sync::Arc;

use fresco_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once the socket listener is accepting connections.
    fn listener_active(&self, endpoint: &SocketEndpoint);

    /// Invoked when teardown begins.
    fn shutdown_starting(&self);

    /// Invoked when teardown completes.
    fn shutdown_complete(&self, abandoned_requests: usize);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_active(&self, endpoint: &SocketEndpoint) {
        (**self).listener_active(endpoint);
    }

    fn shutdown_starting(&self) {
        (**self).shutdown_starting();
    }

    fn shutdown_complete(&self, abandoned_requests: usize) {
        (**self).shutdown_complete(abandoned_requests);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            endpoint = %config.daemon_socket(),
            album = config.album_name(),
            "daemon bootstrap complete"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn listener_active(&self, endpoint: &SocketEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listener_active",
            endpoint = %endpoint,
            "accepting plugin requests"
        );
    }

    fn shutdown_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_starting",
            "daemon teardown requested"
        );
    }

    fn shutdown_complete(&self, abandoned_requests: usize) {
        if abandoned_requests == 0 {
            tracing::info!(
                target: HEALTH_TARGET,
                event = "shutdown_complete",
                "daemon teardown complete"
            );
        } else {
            tracing::warn!(
                target: HEALTH_TARGET,
                event = "shutdown_complete",
                abandoned_requests,
                "daemon teardown complete with undrained requests"
            );
        }
    }
}
