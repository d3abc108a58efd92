//! Operation routing and worker supervision.
//!
//! The router resolves the operation name against the closed contract,
//! validates arguments synchronously, and answers the capability probes
//! inline. The four image operations spawn one worker thread each; the
//! connection thread joins the worker so a panic becomes a second completion
//! attempt on the same response slot rather than a lost request.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use fresco_daemon_types::{ErrorCode, Operation, OperationReply, OperationRequest};
use fresco_platform::{Capabilities, host_description};

use super::DISPATCH_TARGET;
use super::arguments::{
    self, ArgumentRejection, PathRule, gallery_file_name, image_bytes, readable_file_path,
};
use super::gallery::save_to_gallery;
use super::response::ResponseSlot;
use super::wallpaper::{ImageSource, set_wallpaper};
use crate::shutdown::ShutdownToken;

const WORKER_THREAD_NAME: &str = "fresco-worker";

/// Which argument carries the image payload.
#[derive(Debug, Clone, Copy)]
enum SourceKind {
    File,
    Bytes,
}

/// Routes parsed requests to their handlers.
pub(crate) struct OperationRouter {
    capabilities: Capabilities,
    album_name: String,
    shutdown: ShutdownToken,
}

impl OperationRouter {
    pub(crate) fn new(
        capabilities: Capabilities,
        album_name: String,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            capabilities,
            album_name,
            shutdown,
        }
    }

    /// Dispatches one request, delivering its reply through `slot`.
    pub(crate) fn dispatch<W>(&self, request: &OperationRequest, slot: &Arc<ResponseSlot<W>>)
    where
        W: Write + Send + 'static,
    {
        let Some(operation) = Operation::parse(request.name()) else {
            debug!(
                target: DISPATCH_TARGET,
                operation = request.name(),
                "unknown operation"
            );
            slot.deliver(&OperationReply::not_implemented(request.name()));
            return;
        };

        debug!(
            target: DISPATCH_TARGET,
            operation = %operation,
            "dispatching operation"
        );

        match operation {
            Operation::IsSupported => {
                // Pure probe: the station's answer is fixed for the process
                // lifetime and nothing here touches the platform.
                let supported = self.capabilities.station().supports_wallpaper();
                slot.deliver(&OperationReply::success(supported));
            }
            Operation::GetPlatformVersion => {
                slot.deliver(&OperationReply::success(host_description()));
            }
            Operation::SetWallpaperFromFile => {
                self.handle_set_wallpaper(request, slot, SourceKind::File);
            }
            Operation::SetWallpaperFromBytes => {
                self.handle_set_wallpaper(request, slot, SourceKind::Bytes);
            }
            Operation::SaveImageToGalleryFromFile => {
                self.handle_save_gallery(request, slot, SourceKind::File);
            }
            Operation::SaveImageToGalleryFromBytes => {
                self.handle_save_gallery(request, slot, SourceKind::Bytes);
            }
        }
    }

    fn handle_set_wallpaper<W>(
        &self,
        request: &OperationRequest,
        slot: &Arc<ResponseSlot<W>>,
        kind: SourceKind,
    ) where
        W: Write + Send + 'static,
    {
        // Target range first, then the payload, matching the wire contract's
        // precedence: an out-of-range type wins over a bad path.
        let validated = arguments::wallpaper_target(&request.arguments)
            .and_then(|target| Ok((target, self.image_source(request, kind, PathRule::Wallpaper)?)));
        let (target, source) = match validated {
            Ok(validated) => validated,
            Err(rejection) => {
                slot.deliver(&rejection.into_reply());
                return;
            }
        };

        let capabilities = self.capabilities.clone();
        let shutdown = self.shutdown.clone();
        run_in_worker(slot, move || {
            set_wallpaper(&capabilities, source, target, &shutdown)
        });
    }

    fn handle_save_gallery<W>(
        &self,
        request: &OperationRequest,
        slot: &Arc<ResponseSlot<W>>,
        kind: SourceKind,
    ) where
        W: Write + Send + 'static,
    {
        let validated = self
            .image_source(request, kind, PathRule::Gallery)
            .and_then(|source| Ok((source, gallery_file_name(&request.arguments)?)));
        let (source, file_name) = match validated {
            Ok(validated) => validated,
            Err(rejection) => {
                slot.deliver(&rejection.into_reply());
                return;
            }
        };

        let capabilities = self.capabilities.clone();
        let album = self.album_name.clone();
        let shutdown = self.shutdown.clone();
        run_in_worker(slot, move || {
            save_to_gallery(&capabilities, source, &file_name, &album, &shutdown)
        });
    }

    fn image_source(
        &self,
        request: &OperationRequest,
        kind: SourceKind,
        rule: PathRule,
    ) -> Result<ImageSource, ArgumentRejection> {
        match kind {
            SourceKind::File => {
                readable_file_path(&request.arguments, rule).map(ImageSource::Path)
            }
            SourceKind::Bytes => image_bytes(&request.arguments).map(ImageSource::Bytes),
        }
    }
}

/// Runs `job` on a named worker thread and joins it.
///
/// The worker delivers its own reply; a panicked worker or a failed spawn is
/// converted into an `UNEXPECTED_ERROR` delivery attempt on the same slot.
/// The slot's first-wins discipline resolves the race when a worker both
/// delivers and then panics.
fn run_in_worker<W, F>(slot: &Arc<ResponseSlot<W>>, job: F)
where
    W: Write + Send + 'static,
    F: FnOnce() -> OperationReply + Send + 'static,
{
    let worker_slot = Arc::clone(slot);
    let spawned = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_owned())
        .spawn(move || {
            let reply = job();
            worker_slot.deliver(&reply);
        });

    match spawned {
        Ok(worker) => {
            if worker.join().is_err() {
                warn!(target: DISPATCH_TARGET, "operation worker panicked");
                slot.deliver(&OperationReply::failure(
                    ErrorCode::UnexpectedError,
                    "operation worker panicked",
                ));
            }
        }
        Err(error) => {
            warn!(
                target: DISPATCH_TARGET,
                error = %error,
                "failed to spawn operation worker"
            );
            slot.deliver(&OperationReply::failure(
                ErrorCode::UnexpectedError,
                format!("failed to spawn operation worker: {error}"),
            ));
        }
    }
}
