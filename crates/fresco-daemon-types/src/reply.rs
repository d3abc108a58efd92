//! The reply envelope and error taxonomy.
//!
//! Every request produces exactly one reply line. `not_implemented` is a
//! distinct reply kind rather than a failure code so that callers probing for
//! optional operations do not have to pattern-match message text.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable failure codes surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required argument was missing, empty, or malformed.
    InvalidArgument,
    /// The wallpaper target was outside the 0/1/2 range.
    InvalidType,
    /// A file-path argument referenced a file that does not exist.
    FileNotFound,
    /// A file-path argument referenced a file the host cannot read.
    PermissionDenied,
    /// The supplied bytes could not be decoded as an image.
    InvalidImage,
    /// The wallpaper backend failed or the feature is unsupported.
    SetWallpaperError,
    /// The gallery write failed at some stage.
    SaveError,
    /// An uncaught fault inside the handler or its worker.
    UnexpectedError,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidType => "INVALID_TYPE",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::SetWallpaperError => "SET_WALLPAPER_ERROR",
            Self::SaveError => "SAVE_ERROR",
            Self::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Terminal reply for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationReply {
    /// The operation completed; `value` is operation-specific.
    Success {
        /// Operation-specific result value.
        value: Value,
    },
    /// The operation failed with a structured error.
    Failure {
        /// Stable failure code.
        code: ErrorCode,
        /// Human-readable description of the failure.
        message: String,
        /// Optional extra context (platform error text, encoding hints).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// The operation name is not part of the contract.
    NotImplemented {
        /// The unrecognised name, echoed back.
        operation: String,
    },
}

impl OperationReply {
    /// Creates a success reply.
    #[must_use]
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    /// Creates a failure reply without details.
    #[must_use]
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a failure reply carrying extra context.
    #[must_use]
    pub fn failure_with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::Failure {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a `not_implemented` reply echoing the unknown name.
    #[must_use]
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }

    /// Returns the failure code, if this reply is a failure.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Failure { code, .. } => Some(*code),
            Self::Success { .. } | Self::NotImplemented { .. } => None,
        }
    }

    /// Returns true for a success reply.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
