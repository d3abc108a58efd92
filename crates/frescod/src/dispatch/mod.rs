//! JSONL request dispatch for the plugin host.
//!
//! This module implements the request path: read one bounded JSONL line from
//! a connection, parse it into an [`fresco_daemon_types::OperationRequest`],
//! validate arguments synchronously, route to the operation handler, and
//! deliver exactly one terminal reply.
//!
//! ## Protocol
//!
//! Clients send a single request line:
//!
//! ```json
//! {"operation":"setWallpaperFromBytes","arguments":{"bytes":"iVBORw0…","type":2}}
//! ```
//!
//! The daemon answers with exactly one reply line:
//!
//! ```json
//! {"kind":"success","value":true}
//! {"kind":"failure","code":"INVALID_TYPE","message":"invalid wallpaper type: 5","details":"type must be 0 (home), 1 (lock), or 2 (both)"}
//! {"kind":"not_implemented","operation":"frobnicate"}
//! ```
//!
//! ## Response-once discipline
//!
//! Every request owns a [`response::ResponseSlot`]. Handlers are free to run
//! on worker threads and to fail from several places at once — a decode error
//! racing a panic racing shutdown cancellation — because the slot's atomic
//! test-and-set lets exactly one completion path deliver. The connection
//! handler additionally guarantees the slot never ends a request unset.

mod arguments;
mod errors;
mod gallery;
mod handler;
mod request;
mod response;
mod router;
mod wallpaper;

pub(crate) use self::handler::DispatchConnectionHandler;
#[cfg(test)]
pub(crate) use self::response::ResponseSlot;
#[cfg(test)]
pub(crate) use self::router::OperationRouter;

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
