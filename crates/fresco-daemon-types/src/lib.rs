//! Wire protocol types shared by `frescod` and `fresco-cli`.
//!
//! A client sends a single JSONL request line containing an
//! [`OperationRequest`] and reads back exactly one JSONL reply line containing
//! an [`OperationReply`]. The operation names, the reply envelope, and the
//! error codes defined here are the external contract of the plugin host;
//! both binaries depend on this crate so the two sides cannot drift.

mod operation;
mod reply;
mod target;

pub use operation::{Operation, OperationRequest};
pub use reply::{ErrorCode, OperationReply};
pub use target::WallpaperTarget;
