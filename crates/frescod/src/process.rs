//! Daemon run loop: signal handling, listener supervision, drain on exit.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use thiserror::Error;
use tracing::debug;

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::DispatchConnectionHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::shutdown::{InFlightGauge, ShutdownToken};
use crate::transport::{ListenerError, SocketListener};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// How long teardown waits for in-flight requests to drain.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
/// Poll interval for the shutdown flag and the drain wait.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errors surfaced while launching or supervising the daemon.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrapping the daemon failed.
    #[error("daemon bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
    /// Binding or running the socket listener failed.
    #[error("listener failed: {0}")]
    Listener(#[from] ListenerError),
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),
}

/// Runs the daemon until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, signal installation, or the
/// listener fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    let shutdown = ShutdownToken::new();
    install_signal_handlers(&shutdown)?;
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        shutdown,
    )
}

/// Runs the daemon with explicit collaborators until `shutdown` trips.
///
/// The token is the teardown signal for the whole request group: the accept
/// loop stops, in-flight workers observe the trip at their next stage
/// boundary, and teardown waits a bounded grace period for connections to
/// drain before reporting how many were abandoned.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap or the listener fails.
pub fn run_daemon_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    shutdown: ShutdownToken,
) -> Result<(), LaunchError> {
    let daemon = bootstrap_with(loader, Arc::clone(&reporter))?;

    let gauge = InFlightGauge::new();
    let handler = Arc::new(DispatchConnectionHandler::new(
        daemon.capabilities().clone(),
        daemon.config().album_name().to_owned(),
        shutdown.clone(),
        gauge.clone(),
    ));

    let listener = SocketListener::bind(daemon.config().daemon_socket())?;
    let handle = listener.start(handler)?;
    reporter.listener_active(daemon.config().daemon_socket());

    wait_until_tripped(&shutdown);
    reporter.shutdown_starting();

    handle.shutdown();
    handle.join()?;
    let abandoned = drain_in_flight(&gauge, SHUTDOWN_GRACE);
    reporter.shutdown_complete(abandoned);
    Ok(())
}

fn install_signal_handlers(shutdown: &ShutdownToken) -> Result<(), LaunchError> {
    for signal in [SIGINT, SIGTERM] {
        flag::register(signal, shutdown.flag()).map_err(LaunchError::Signals)?;
    }
    Ok(())
}

fn wait_until_tripped(shutdown: &ShutdownToken) {
    while !shutdown.is_tripped() {
        thread::sleep(POLL_INTERVAL);
    }
}

/// Waits for in-flight connections to finish, bounded by `grace`.
///
/// Returns the number of connections still running when the grace period
/// expired.
fn drain_in_flight(gauge: &InFlightGauge, grace: Duration) -> usize {
    let deadline = Instant::now() + grace;
    loop {
        let current = gauge.current();
        if current == 0 {
            return 0;
        }
        if Instant::now() >= deadline {
            debug!(
                target: PROCESS_TARGET,
                in_flight = current,
                "drain grace period expired"
            );
            return current;
        }
        thread::sleep(POLL_INTERVAL);
    }
}
