//! Synchronous argument validation.
//!
//! Every check here runs on the connection thread before any worker is
//! spawned, so malformed requests fail fast without consuming worker
//! capacity. Each function pulls one argument out of the loosely-typed bag
//! and either produces a typed value or a ready-to-send failure.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value};

use fresco_daemon_types::{ErrorCode, OperationReply, WallpaperTarget};

use fresco_platform::default_file_name;

/// A failed validation, carrying everything the failure reply needs.
#[derive(Debug)]
pub(crate) struct ArgumentRejection {
    code: ErrorCode,
    message: String,
    details: Option<String>,
}

impl ArgumentRejection {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Converts the rejection into its failure reply.
    pub(crate) fn into_reply(self) -> OperationReply {
        match self.details {
            Some(details) => OperationReply::failure_with_details(self.code, self.message, details),
            None => OperationReply::failure(self.code, self.message),
        }
    }
}

/// Extracts the wallpaper target from the `type` argument.
///
/// A missing argument defaults to the home surface; anything present must be
/// an integer in 0..=2.
pub(crate) fn wallpaper_target(
    arguments: &Map<String, Value>,
) -> Result<WallpaperTarget, ArgumentRejection> {
    let Some(value) = arguments.get("type") else {
        return Ok(WallpaperTarget::Home);
    };
    value
        .as_i64()
        .and_then(WallpaperTarget::from_code)
        .ok_or_else(|| {
            ArgumentRejection::with_details(
                ErrorCode::InvalidType,
                format!("invalid wallpaper type: {value}"),
                "type must be 0 (home), 1 (lock), or 2 (both)",
            )
        })
}

/// Precondition profile for file-path arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathRule {
    /// Wallpaper operations distinguish unreadable from missing files.
    Wallpaper,
    /// Gallery operations fold unreadable files into "not found".
    Gallery,
}

/// Extracts and checks the `filePath` argument.
///
/// The file must exist and be readable before any worker is spawned; the
/// worker re-reads it for the actual bytes.
pub(crate) fn readable_file_path(
    arguments: &Map<String, Value>,
    rule: PathRule,
) -> Result<PathBuf, ArgumentRejection> {
    let path = match arguments.get("filePath") {
        Some(Value::String(text)) if !text.trim().is_empty() => PathBuf::from(text),
        Some(Value::String(_)) | None => {
            return Err(ArgumentRejection::new(
                ErrorCode::InvalidArgument,
                "file path argument is missing or empty",
            ));
        }
        Some(other) => {
            return Err(ArgumentRejection::new(
                ErrorCode::InvalidArgument,
                format!("file path argument must be text, got {other}"),
            ));
        }
    };

    check_readable(&path, rule)?;
    Ok(path)
}

fn check_readable(path: &Path, rule: PathRule) -> Result<(), ArgumentRejection> {
    if !path.exists() {
        return Err(not_found(path, rule));
    }
    match File::open(path) {
        Ok(_file) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Err(not_found(path, rule)),
        Err(error) => match rule {
            PathRule::Wallpaper => Err(ArgumentRejection::with_details(
                ErrorCode::PermissionDenied,
                format!("no read permission for file: {}", path.display()),
                error.to_string(),
            )),
            PathRule::Gallery => Err(not_found(path, rule)),
        },
    }
}

fn not_found(path: &Path, rule: PathRule) -> ArgumentRejection {
    let message = match rule {
        PathRule::Wallpaper => format!("file does not exist: {}", path.display()),
        PathRule::Gallery => format!("file does not exist or cannot be read: {}", path.display()),
    };
    ArgumentRejection::new(ErrorCode::FileNotFound, message)
}

/// Extracts and decodes the base64 `bytes` argument.
pub(crate) fn image_bytes(arguments: &Map<String, Value>) -> Result<Vec<u8>, ArgumentRejection> {
    let text = match arguments.get("bytes") {
        Some(Value::String(text)) if !text.is_empty() => text,
        Some(Value::String(_)) | None => {
            return Err(ArgumentRejection::new(
                ErrorCode::InvalidArgument,
                "bytes argument is missing or empty",
            ));
        }
        Some(_other) => {
            return Err(ArgumentRejection::new(
                ErrorCode::InvalidArgument,
                "bytes argument must be base64 text",
            ));
        }
    };

    let bytes = BASE64.decode(text).map_err(|error| {
        ArgumentRejection::with_details(
            ErrorCode::InvalidArgument,
            "bytes argument is not valid base64",
            error.to_string(),
        )
    })?;
    if bytes.is_empty() {
        return Err(ArgumentRejection::new(
            ErrorCode::InvalidArgument,
            "bytes argument is missing or empty",
        ));
    }
    Ok(bytes)
}

/// Extracts the `fileName` argument, defaulting to a time-stamped name.
///
/// Names must stay inside the album directory, so path separators and parent
/// references are rejected rather than resolved.
pub(crate) fn gallery_file_name(
    arguments: &Map<String, Value>,
) -> Result<String, ArgumentRejection> {
    let name = match arguments.get("fileName") {
        None => return Ok(default_file_name()),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(default_file_name()),
        Some(Value::String(text)) => text.clone(),
        Some(_other) => {
            return Err(ArgumentRejection::new(
                ErrorCode::InvalidArgument,
                "fileName argument must be text",
            ));
        }
    };

    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ArgumentRejection::new(
            ErrorCode::InvalidArgument,
            "fileName must not contain path separators",
        ));
    }
    Ok(name)
}
