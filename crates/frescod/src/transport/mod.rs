//! Socket listener for the daemon transport endpoint.
//!
//! The transport module binds the configured socket endpoint and accepts
//! connections on a background thread, handing each accepted stream to a
//! [`ConnectionHandler`] on its own connection thread.

mod errors;
mod handler;
mod listener;

pub use self::errors::ListenerError;
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::listener::{ListenerHandle, SocketListener};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
