//! Decode → apply pipeline for the wallpaper operations.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use fresco_daemon_types::{ErrorCode, OperationReply, WallpaperTarget};
use fresco_platform::Capabilities;

use super::DISPATCH_TARGET;
use super::gallery::shutdown_reply;
use crate::shutdown::ShutdownToken;

/// Where an operation's image bytes come from.
#[derive(Debug)]
pub(crate) enum ImageSource {
    /// Read from a validated file path.
    Path(PathBuf),
    /// Already-decoded base64 payload.
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Obtains the raw bytes, reading the file when necessary.
    ///
    /// Validation checked existence and readability on the connection
    /// thread, but the file can change underneath us; read failures here map
    /// to the same codes the synchronous checks would have produced.
    pub(crate) fn into_bytes(self) -> Result<Vec<u8>, OperationReply> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Path(path) => fs::read(&path).map_err(|error| match error.kind() {
                io::ErrorKind::NotFound => OperationReply::failure(
                    ErrorCode::FileNotFound,
                    format!("file does not exist: {}", path.display()),
                ),
                io::ErrorKind::PermissionDenied => OperationReply::failure_with_details(
                    ErrorCode::PermissionDenied,
                    format!("no read permission for file: {}", path.display()),
                    error.to_string(),
                ),
                _ => OperationReply::failure_with_details(
                    ErrorCode::UnexpectedError,
                    format!("failed to read file: {}", path.display()),
                    error.to_string(),
                ),
            }),
        }
    }
}

/// Runs the wallpaper pipeline on a worker thread.
///
/// Stage boundaries poll the shutdown token; the decoded image is owned by
/// this function and dropped on every exit path, including cancellation.
pub(crate) fn set_wallpaper(
    capabilities: &Capabilities,
    source: ImageSource,
    target: WallpaperTarget,
    shutdown: &ShutdownToken,
) -> OperationReply {
    if shutdown.is_tripped() {
        return shutdown_reply();
    }

    let bytes = match source.into_bytes() {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    if shutdown.is_tripped() {
        return shutdown_reply();
    }

    let image = match capabilities.codec().decode(&bytes) {
        Ok(image) => image,
        Err(error) => {
            return OperationReply::failure_with_details(
                ErrorCode::InvalidImage,
                "cannot decode image",
                error.to_string(),
            );
        }
    };
    debug!(
        target: DISPATCH_TARGET,
        width = image.width(),
        height = image.height(),
        wallpaper_target = %target,
        "decoded wallpaper image"
    );

    if shutdown.is_tripped() {
        return shutdown_reply();
    }

    let applied = match target {
        WallpaperTarget::Home => capabilities.station().set_home(&image),
        WallpaperTarget::Lock => capabilities.station().set_lock(&image),
        WallpaperTarget::Both => capabilities.station().set_both(&image),
    };

    match applied {
        Ok(()) => OperationReply::success(true),
        Err(error) => OperationReply::failure(ErrorCode::SetWallpaperError, error.to_string()),
    }
}
