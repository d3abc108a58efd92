//! Daemon bootstrap orchestration.
//!
//! Bootstrap loads configuration, installs telemetry, prepares the socket
//! filesystem, and resolves the platform capability bundle exactly once.
//! Everything after bootstrap works against the resolved [`Daemon`]; no later
//! code path re-detects the platform.

use std::sync::Arc;

use thiserror::Error;

use fresco_config::{Config, ConfigError, SocketPreparationError, WallpaperMode};
use fresco_platform::{Capabilities, PlatformProfile, ResolveError};

use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    fn load(&self) -> Result<Config, ConfigError>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Config::load()
    }
}

/// Loader that returns a pre-built configuration; used by tests and embedders.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already-resolved configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// Socket preparation failed.
    #[error("failed to prepare daemon socket: {source}")]
    Socket {
        /// Filesystem error reported while preparing the socket directory.
        #[source]
        source: SocketPreparationError,
    },
    /// Platform capability resolution failed.
    #[error("failed to resolve platform capabilities: {source}")]
    Platform {
        /// Underlying resolution error.
        #[source]
        source: ResolveError,
    },
}

/// Result of a successful bootstrap invocation.
pub struct Daemon {
    config: Config,
    capabilities: Capabilities,
    telemetry: TelemetryHandle,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the resolved capability bundle.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }
}

/// Maps the configured wallpaper override onto a platform profile.
fn select_profile(mode: WallpaperMode) -> PlatformProfile {
    match mode {
        WallpaperMode::Auto => PlatformProfile::detect(),
        WallpaperMode::Force => PlatformProfile::Full,
        WallpaperMode::Deny => PlatformProfile::GalleryOnly,
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// # Errors
///
/// Returns a [`BootstrapError`] naming the stage that failed; the reporter is
/// informed either way.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    if let Err(source) = config.daemon_socket().prepare_filesystem() {
        let error = BootstrapError::Socket { source };
        reporter.bootstrap_failed(&error);
        return Err(error);
    }

    let profile = select_profile(config.wallpaper_mode);
    let capabilities = match Capabilities::resolve(profile) {
        Ok(capabilities) => capabilities,
        Err(source) => {
            let error = BootstrapError::Platform { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    reporter.bootstrap_succeeded(&config);
    Ok(Daemon {
        config,
        capabilities,
        telemetry,
    })
}

#[cfg(test)]
mod tests {
    use fresco_config::WallpaperMode;
    use fresco_platform::PlatformProfile;

    use super::*;

    #[test]
    fn force_and_deny_override_detection() {
        assert_eq!(select_profile(WallpaperMode::Force), PlatformProfile::Full);
        assert_eq!(
            select_profile(WallpaperMode::Deny),
            PlatformProfile::GalleryOnly
        );
    }

    #[test]
    fn auto_follows_platform_detection() {
        assert_eq!(select_profile(WallpaperMode::Auto), PlatformProfile::detect());
    }
}
