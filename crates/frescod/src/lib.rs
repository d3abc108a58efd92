//! The Fresco plugin host daemon.
//!
//! `frescod` exposes a fixed set of named image operations — capability
//! probes, wallpaper setting, gallery saves — over a JSONL socket. Each
//! connection carries exactly one request and receives exactly one terminal
//! reply; that response-once discipline is enforced by a per-request sentinel
//! that every completion path (handler result, worker panic, shutdown
//! cancellation) must pass through.
//!
//! ## Layering
//!
//! - [`bootstrap`](crate::Daemon): configuration, telemetry, and one-time
//!   platform capability resolution.
//! - `transport`: socket listener and connection threads.
//! - `dispatch`: request parsing, synchronous argument validation, operation
//!   routing, worker threads, and reply delivery.
//!
//! Platform work (decode, wallpaper, gallery) lives behind the capability
//! traits in `fresco-platform`; the daemon holds one resolved bundle and
//! never branches on the platform itself.

mod bootstrap;
mod dispatch;
mod health;
mod process;
mod shutdown;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, run_daemon, run_daemon_with};
pub use shutdown::{InFlightGauge, ShutdownToken};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
