//! Gallery-save pipeline.

use tracing::info;

use fresco_daemon_types::{ErrorCode, OperationReply};
use fresco_platform::Capabilities;

use super::DISPATCH_TARGET;
use super::wallpaper::ImageSource;
use crate::shutdown::ShutdownToken;

/// Reply delivered by workers that observe daemon teardown mid-pipeline.
pub(crate) fn shutdown_reply() -> OperationReply {
    OperationReply::failure(ErrorCode::UnexpectedError, "plugin host is shutting down")
}

/// Runs the gallery-save pipeline on a worker thread.
///
/// Gallery saves write the caller's bytes verbatim — no decode round-trip —
/// so a saved image reads back byte-identical to what was sent.
pub(crate) fn save_to_gallery(
    capabilities: &Capabilities,
    source: ImageSource,
    file_name: &str,
    album: &str,
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

    match capabilities.gallery().save(&bytes, file_name, album) {
        Ok(saved) => {
            info!(
                target: DISPATCH_TARGET,
                path = %saved.path.display(),
                album,
                "image saved to gallery"
            );
            OperationReply::success(true)
        }
        Err(error) => OperationReply::failure_with_details(
            ErrorCode::SaveError,
            "failed to save image to gallery",
            error.to_string(),
        ),
    }
}
