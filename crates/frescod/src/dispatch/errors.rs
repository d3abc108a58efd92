//! Error types for request parsing and dispatch plumbing.
//!
//! Handler-level failures (bad arguments, decode errors, backend faults) are
//! ordinary [`fresco_daemon_types::OperationReply::Failure`] replies, not
//! errors of this type. `DispatchError` covers the plumbing around them:
//! unreadable requests, oversized lines, reply serialization.

use std::io;

use thiserror::Error;

use fresco_daemon_types::{ErrorCode, OperationReply};

/// Errors surfaced while reading, parsing, or answering a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request line could not be parsed as a request envelope.
    #[error("malformed request: {message}")]
    Malformed {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request exceeds the maximum allowed size.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge { size: usize, max_size: usize },

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Reply serialization failed.
    #[error("failed to serialize reply: {0}")]
    SerializeReply(#[from] serde_json::Error),
}

impl DispatchError {
    /// Creates a malformed-request error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed-request error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a request-too-large error.
    pub fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Maps the plumbing error onto the reply the client should see.
    ///
    /// Unparseable and oversized requests are caller bugs
    /// (`INVALID_ARGUMENT`); IO and serialization faults are the host's
    /// problem (`UNEXPECTED_ERROR`).
    pub fn to_reply(&self) -> OperationReply {
        match self {
            Self::Malformed { .. } | Self::RequestTooLarge { .. } => {
                OperationReply::failure(ErrorCode::InvalidArgument, self.to_string())
            }
            Self::Io(_) | Self::SerializeReply(_) => {
                OperationReply::failure(ErrorCode::UnexpectedError, self.to_string())
            }
        }
    }
}
