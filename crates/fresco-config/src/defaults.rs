//! Built-in defaults shared by the daemon and the CLI.

use std::env;

use camino::Utf8PathBuf;

#[cfg(unix)]
use dirs::runtime_dir;
#[cfg(unix)]
use libc::geteuid;

use crate::socket::SocketEndpoint;

/// Default TCP port used where Unix domain sockets are unavailable.
pub const DEFAULT_TCP_PORT: u16 = 7040;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default gallery album (collection) name.
pub const DEFAULT_ALBUM_NAME: &str = "Fresco";

/// Computes the default socket endpoint for the daemon.
///
/// On Unix the socket lives under the user runtime directory
/// (`$XDG_RUNTIME_DIR/fresco/frescod.sock`), falling back to a per-uid
/// namespace below the temp directory when no runtime directory exists.
#[must_use]
pub fn default_socket_endpoint() -> SocketEndpoint {
    default_socket_endpoint_inner()
}

#[cfg(unix)]
fn default_socket_endpoint_inner() -> SocketEndpoint {
    let (mut base, apply_namespace) = match runtime_base_directory() {
        Some(dir) => (dir, false),
        None => (fallback_base_directory(), true),
    };

    base.push("fresco");
    if apply_namespace {
        base.push(user_namespace());
    }

    SocketEndpoint::unix(base.join("frescod.sock"))
}

#[cfg(unix)]
fn runtime_base_directory() -> Option<Utf8PathBuf> {
    runtime_dir().and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
}

#[cfg(unix)]
fn fallback_base_directory() -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(env::temp_dir()).unwrap_or_else(|_| Utf8PathBuf::from("/tmp"))
}

#[cfg(unix)]
fn user_namespace() -> String {
    let uid = unsafe { geteuid() };
    format!("uid-{uid}")
}

#[cfg(not(unix))]
fn default_socket_endpoint_inner() -> SocketEndpoint {
    SocketEndpoint::tcp("127.0.0.1", DEFAULT_TCP_PORT)
}
