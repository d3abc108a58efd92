//! Socket endpoint configuration for the daemon transport.

use std::fmt;
use std::fs::DirBuilder;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Declarative daemon socket endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum SocketEndpoint {
    /// Unix domain socket endpoint.
    Unix {
        /// Filesystem path of the socket.
        path: Utf8PathBuf,
    },
    /// TCP socket endpoint.
    Tcp {
        /// Host name or address to bind/connect.
        host: String,
        /// TCP port.
        port: u16,
    },
}

impl SocketEndpoint {
    /// Builds a Unix domain socket endpoint.
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Unix { path: path.into() }
    }

    /// Builds a TCP endpoint.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Returns the Unix socket path for Unix endpoints.
    #[must_use]
    pub fn unix_path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Unix { path } => Some(path.as_ref()),
            Self::Tcp { .. } => None,
        }
    }

    /// Ensures the socket's parent directory exists with owner-only access.
    ///
    /// # Errors
    ///
    /// Returns a [`SocketPreparationError`] when the path has no parent or the
    /// directory cannot be created.
    pub fn prepare_filesystem(&self) -> Result<(), SocketPreparationError> {
        let Some(path) = self.unix_path() else {
            return Ok(());
        };
        let Some(parent) = path.parent() else {
            return Err(SocketPreparationError::MissingParent {
                path: path.to_path_buf(),
            });
        };

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }

        if let Err(source) = builder.create(parent.as_std_path())
            && source.kind() != std::io::ErrorKind::AlreadyExists
        {
            return Err(SocketPreparationError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix { path } => write!(formatter, "unix://{path}"),
            Self::Tcp { host, port } => write!(formatter, "tcp://{host}:{port}"),
        }
    }
}

impl FromStr for SocketEndpoint {
    type Err = SocketParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input)?;
        match url.scheme() {
            "unix" => {
                let path = url.path();
                if path.is_empty() {
                    return Err(SocketParseError::MissingUnixPath(input.to_owned()));
                }
                Ok(Self::unix(path))
            }
            "tcp" => {
                let host = url
                    .host_str()
                    .ok_or_else(|| SocketParseError::MissingHost(input.to_owned()))?;
                let port = url
                    .port()
                    .ok_or_else(|| SocketParseError::MissingPort(input.to_owned()))?;
                Ok(Self::tcp(host, port))
            }
            other => Err(SocketParseError::UnsupportedScheme(other.to_owned())),
        }
    }
}

/// Errors encountered while parsing a [`SocketEndpoint`] from text.
#[derive(Debug, Error)]
pub enum SocketParseError {
    /// Scheme was not `unix` or `tcp`.
    #[error("unsupported socket scheme '{0}'")]
    UnsupportedScheme(String),
    /// TCP host name was missing.
    #[error("missing TCP host in '{0}'")]
    MissingHost(String),
    /// TCP port was missing.
    #[error("missing TCP port in '{0}'")]
    MissingPort(String),
    /// Unix URL carried no path component.
    #[error("missing unix socket path in '{0}'")]
    MissingUnixPath(String),
    /// The input was not a valid URL at all.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors encountered while preparing the socket filesystem.
#[derive(Debug, Error)]
pub enum SocketPreparationError {
    /// The socket path has no parent directory.
    #[error("socket path '{path}' has no parent directory")]
    MissingParent {
        /// The offending socket path.
        path: Utf8PathBuf,
    },
    /// Creating the parent directory failed.
    #[error("failed to create socket directory '{path}': {source}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unix_endpoint_urls() {
        let endpoint: Result<SocketEndpoint, _> = "unix:///run/fresco/frescod.sock".parse();
        assert_eq!(
            endpoint.ok(),
            Some(SocketEndpoint::unix("/run/fresco/frescod.sock"))
        );
    }

    #[test]
    fn parses_tcp_endpoint_urls() {
        let endpoint: Result<SocketEndpoint, _> = "tcp://127.0.0.1:7040".parse();
        assert_eq!(endpoint.ok(), Some(SocketEndpoint::tcp("127.0.0.1", 7040)));
    }

    #[test]
    fn rejects_tcp_without_port() {
        let endpoint: Result<SocketEndpoint, _> = "tcp://127.0.0.1".parse();
        assert!(matches!(endpoint, Err(SocketParseError::MissingPort(_))));
    }

    #[test]
    fn rejects_unknown_schemes() {
        let endpoint: Result<SocketEndpoint, _> = "ftp://example:1".parse();
        assert!(matches!(
            endpoint,
            Err(SocketParseError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let original = SocketEndpoint::tcp("localhost", 9010);
        let reparsed: Result<SocketEndpoint, _> = original.to_string().parse();
        assert_eq!(reparsed.ok(), Some(original));
    }

    #[test]
    fn prepare_filesystem_creates_parent_directories() {
        let scratch = tempfile::tempdir().expect("create tempdir");
        let socket_dir = scratch.path().join("nested").join("sockets");
        let socket_path = socket_dir.join("frescod.sock");
        let Some(utf8_path) = socket_path.to_str() else {
            panic!("tempdir paths should be UTF-8");
        };

        let endpoint = SocketEndpoint::unix(utf8_path);
        endpoint
            .prepare_filesystem()
            .expect("parent directories should be created");
        assert!(socket_dir.is_dir());
    }

    #[test]
    fn prepare_filesystem_ignores_tcp_endpoints() {
        let endpoint = SocketEndpoint::tcp("127.0.0.1", 7040);
        assert!(endpoint.prepare_filesystem().is_ok());
    }
}
