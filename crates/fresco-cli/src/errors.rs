//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use fresco_config::{ConfigError, SocketParseError};

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(#[source] ConfigError),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("invalid --socket value '{value}': {source}")]
    InvalidSocket {
        value: String,
        #[source]
        source: SocketParseError,
    },
    #[error("failed to read image '{}': {source}", path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {0}")]
    UnsupportedUnixTransport(String),
    #[error("failed to serialise request: {0}")]
    SerialiseRequest(#[source] serde_json::Error),
    #[error("failed to serialise reply for output: {0}")]
    SerialiseReply(#[source] serde_json::Error),
    #[error("failed to send request to daemon: {0}")]
    SendRequest(#[source] io::Error),
    #[error("failed to read reply from daemon: {0}")]
    ReadReply(#[source] io::Error),
    #[error("failed to parse daemon reply: {0}")]
    ParseReply(#[source] serde_json::Error),
    #[error("daemon closed the connection without sending a reply")]
    MissingReply,
    #[error("failed to write output: {0}")]
    Render(#[source] io::Error),
}

/// Whether an error indicates the daemon is simply not running.
pub(crate) fn is_daemon_not_running(error: &AppError) -> bool {
    match error {
        AppError::Connect { source, .. } => matches!(
            source.kind(),
            io::ErrorKind::ConnectionRefused
                | io::ErrorKind::NotFound
                | io::ErrorKind::AddrNotAvailable
        ),
        _ => false,
    }
}
