//! Gallery (photo collection) capability.
//!
//! Saves travel through a pending temp file that is finalised into the album
//! with an atomic rename, so a crashed write never leaves a half-image where
//! the gallery would index it. The post-save media notification is
//! best-effort: its failures are logged and do not affect the save result.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::permissions::{PermissionGate, PermissionState};

const GALLERY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::gallery");

/// Receipt for a completed gallery save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Final path of the image inside the album.
    pub path: PathBuf,
}

/// Errors surfaced by gallery stores.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The permission gate denied photo-library access.
    #[error("photo library access denied")]
    AccessDenied,
    /// Creating the album directory failed.
    #[error("failed to create album directory '{}': {source}", path.display())]
    CreateAlbum {
        /// Album directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing or finalising the image failed.
    #[error("failed to write gallery image '{}': {source}", path.display())]
    Write {
        /// Destination path of the failed write.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Writes images into a named album of the user-visible gallery.
pub trait GalleryStore: Send + Sync {
    /// Saves `bytes` as `file_name` inside `album`.
    ///
    /// # Errors
    ///
    /// Returns a [`GalleryError`] when access is denied or any write stage
    /// fails.
    fn save(&self, bytes: &[u8], file_name: &str, album: &str) -> Result<SavedImage, GalleryError>;
}

/// Store writing directly below the user's pictures directory.
pub struct PicturesDirStore {
    pictures_dir: PathBuf,
    permissions: Arc<dyn PermissionGate>,
}

impl PicturesDirStore {
    /// Builds a store rooted at the given pictures directory.
    #[must_use]
    pub fn new(pictures_dir: impl Into<PathBuf>, permissions: Arc<dyn PermissionGate>) -> Self {
        Self {
            pictures_dir: pictures_dir.into(),
            permissions,
        }
    }

    fn authorise(&self) -> Result<(), GalleryError> {
        let state = match self.permissions.check() {
            PermissionState::Undetermined => self.permissions.request(),
            state => state,
        };
        match state {
            PermissionState::Granted => Ok(()),
            PermissionState::Denied | PermissionState::Undetermined => {
                Err(GalleryError::AccessDenied)
            }
        }
    }

    /// Nudges the host's media indexer about a new file.
    ///
    /// Desktop indexers watch the pictures directory themselves; failures
    /// here must never fail the save.
    fn notify_media_added(path: &Path) {
        match fs::metadata(path) {
            Ok(metadata) => debug!(
                target: GALLERY_TARGET,
                path = %path.display(),
                bytes = metadata.len(),
                "gallery item finalised"
            ),
            Err(error) => warn!(
                target: GALLERY_TARGET,
                path = %path.display(),
                error = %error,
                "gallery item finalised but not observable"
            ),
        }
    }
}

impl GalleryStore for PicturesDirStore {
    fn save(&self, bytes: &[u8], file_name: &str, album: &str) -> Result<SavedImage, GalleryError> {
        self.authorise()?;

        let album_dir = self.pictures_dir.join(album);
        fs::create_dir_all(&album_dir).map_err(|source| GalleryError::CreateAlbum {
            path: album_dir.clone(),
            source,
        })?;

        let path = album_dir.join(file_name);

        // Pending write, then finalise: the temp file plays the media store's
        // IS_PENDING role and the rename is the finalise step.
        let mut pending =
            tempfile::NamedTempFile::new_in(&album_dir).map_err(|source| GalleryError::Write {
                path: path.clone(),
                source,
            })?;
        pending
            .write_all(bytes)
            .map_err(|source| GalleryError::Write {
                path: path.clone(),
                source,
            })?;
        pending
            .persist(&path)
            .map_err(|error| GalleryError::Write {
                path: path.clone(),
                source: error.error,
            })?;

        Self::notify_media_added(&path);
        Ok(SavedImage { path })
    }
}

/// Default file name for gallery saves: `fresco_<unix-millis>.jpg`.
#[must_use]
pub fn default_file_name() -> String {
    let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("fresco_{millis}.jpg")
}

#[cfg(test)]
mod tests {
    use crate::permissions::{OpenPermissionGate, StaticPermissionGate};
    use crate::testutil::png_fixture;

    use super::*;

    fn open_store(root: &Path) -> PicturesDirStore {
        PicturesDirStore::new(root, Arc::new(OpenPermissionGate::new()))
    }

    #[test]
    fn save_round_trips_bytes_into_the_album() {
        let scratch = tempfile::tempdir().expect("create tempdir");
        let bytes = png_fixture(3, 3);

        let saved = open_store(scratch.path())
            .save(&bytes, "pic.png", "Fresco")
            .expect("save should succeed");

        assert_eq!(saved.path, scratch.path().join("Fresco").join("pic.png"));
        let read_back = fs::read(&saved.path).expect("saved file should exist");
        assert_eq!(read_back, bytes);
    }

    #[test]
    fn save_creates_the_album_directory() {
        let scratch = tempfile::tempdir().expect("create tempdir");
        open_store(scratch.path())
            .save(b"payload", "a.jpg", "Brand New Album")
            .expect("save should succeed");
        assert!(scratch.path().join("Brand New Album").is_dir());
    }

    #[test]
    fn denied_gate_fails_before_any_write() {
        let scratch = tempfile::tempdir().expect("create tempdir");
        let store = PicturesDirStore::new(
            scratch.path(),
            Arc::new(StaticPermissionGate::new(PermissionState::Denied)),
        );

        let error = store
            .save(b"payload", "a.jpg", "Fresco")
            .expect_err("denied gate should fail");
        assert!(matches!(error, GalleryError::AccessDenied));
        assert!(!scratch.path().join("Fresco").exists());
    }

    #[test]
    fn undetermined_gate_is_resolved_by_request() {
        let scratch = tempfile::tempdir().expect("create tempdir");
        let store = PicturesDirStore::new(
            scratch.path(),
            Arc::new(StaticPermissionGate::undetermined_then(
                PermissionState::Granted,
            )),
        );

        store
            .save(b"payload", "a.jpg", "Fresco")
            .expect("granted request should allow the save");
    }

    #[test]
    fn unwritable_album_root_is_a_create_album_error() {
        let scratch = tempfile::tempdir().expect("create tempdir");
        let blocker = scratch.path().join("not-a-dir");
        fs::write(&blocker, b"file, not dir").expect("write blocker");

        let error = open_store(&blocker)
            .save(b"payload", "a.jpg", "Fresco")
            .expect_err("album creation should fail");
        assert!(matches!(error, GalleryError::CreateAlbum { .. }));
    }

    #[test]
    fn default_file_name_is_timestamped_jpg() {
        let name = default_file_name();
        assert!(name.starts_with("fresco_"));
        assert!(name.ends_with(".jpg"));
    }
}
