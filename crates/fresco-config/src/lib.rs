//! Shared configuration for the Fresco daemon and CLI.
//!
//! Both binaries resolve the same [`Config`]: the daemon binds the configured
//! socket and honours the wallpaper/logging settings, the CLI connects to the
//! same endpoint. Resolution is deliberately simple: built-in defaults
//! overridden by `FRESCO_*` environment variables. Invalid override values
//! fail loading rather than being silently ignored.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `FRESCO_SOCKET` | Endpoint URL, `unix:///path/frescod.sock` or `tcp://host:port` |
//! | `FRESCO_LOG_FILTER` | `tracing` filter expression (default `info`) |
//! | `FRESCO_LOG_FORMAT` | `compact` or `json` |
//! | `FRESCO_ALBUM` | Gallery album (collection) name |
//! | `FRESCO_WALLPAPER_MODE` | `auto`, `force`, or `deny` |

mod defaults;
mod logging;
mod mode;
mod socket;

use std::env;
use std::str::FromStr;

use thiserror::Error;

pub use defaults::{DEFAULT_ALBUM_NAME, DEFAULT_LOG_FILTER, default_socket_endpoint};
pub use logging::LogFormat;
pub use mode::WallpaperMode;
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Environment variable naming the daemon socket endpoint.
pub const SOCKET_ENV_VAR: &str = "FRESCO_SOCKET";
/// Environment variable holding the log filter expression.
pub const LOG_FILTER_ENV_VAR: &str = "FRESCO_LOG_FILTER";
/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV_VAR: &str = "FRESCO_LOG_FORMAT";
/// Environment variable naming the gallery album.
pub const ALBUM_ENV_VAR: &str = "FRESCO_ALBUM";
/// Environment variable overriding wallpaper capability detection.
pub const WALLPAPER_MODE_ENV_VAR: &str = "FRESCO_WALLPAPER_MODE";

/// Resolved configuration shared by the daemon and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Endpoint the daemon listens on and the CLI connects to.
    pub daemon_socket: SocketEndpoint,
    /// `tracing` filter expression for the daemon subscriber.
    pub log_filter: String,
    /// Log output format for the daemon subscriber.
    pub log_format: LogFormat,
    /// Album (collection) name used for gallery saves.
    pub album_name: String,
    /// Override for wallpaper capability detection.
    pub wallpaper_mode: WallpaperMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: default_socket_endpoint(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
            album_name: DEFAULT_ALBUM_NAME.to_owned(),
            wallpaper_mode: WallpaperMode::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when an override variable is present but
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(|name| env::var(name).ok())
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    ///
    /// Exists so tests can supply overrides without mutating the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a supplied value cannot be parsed.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(SOCKET_ENV_VAR) {
            config.daemon_socket =
                SocketEndpoint::from_str(&value).map_err(|source| ConfigError::Socket {
                    value: value.clone(),
                    source,
                })?;
        }
        if let Some(value) = lookup(LOG_FILTER_ENV_VAR) {
            config.log_filter = value;
        }
        if let Some(value) = lookup(LOG_FORMAT_ENV_VAR) {
            config.log_format =
                LogFormat::from_str(&value).map_err(|_| ConfigError::LogFormat { value })?;
        }
        if let Some(value) = lookup(ALBUM_ENV_VAR) {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyAlbum);
            }
            config.album_name = value;
        }
        if let Some(value) = lookup(WALLPAPER_MODE_ENV_VAR) {
            config.wallpaper_mode =
                WallpaperMode::from_str(&value).map_err(|_| ConfigError::WallpaperMode { value })?;
        }

        Ok(config)
    }

    /// Accessor for the configured socket endpoint.
    #[must_use]
    pub const fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// Accessor for the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Accessor for the log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Accessor for the gallery album name.
    #[must_use]
    pub fn album_name(&self) -> &str {
        &self.album_name
    }
}

/// Errors surfaced while resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The socket override was not a valid endpoint URL.
    #[error("invalid FRESCO_SOCKET value '{value}': {source}")]
    Socket {
        /// The rejected override text.
        value: String,
        /// Underlying parse error.
        #[source]
        source: SocketParseError,
    },
    /// The log format override was not a known format name.
    #[error("invalid FRESCO_LOG_FORMAT value '{value}' (expected 'compact' or 'json')")]
    LogFormat {
        /// The rejected override text.
        value: String,
    },
    /// The album override was empty or whitespace.
    #[error("FRESCO_ALBUM must not be empty")]
    EmptyAlbum,
    /// The wallpaper mode override was not a known mode name.
    #[error("invalid FRESCO_WALLPAPER_MODE value '{value}' (expected 'auto', 'force', or 'deny')")]
    WallpaperMode {
        /// The rejected override text.
        value: String,
    },
}
