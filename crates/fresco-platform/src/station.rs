//! Wallpaper-setting capability.
//!
//! A station exposes the three target surfaces as separate calls plus two
//! capability probes. Callers resolve the probes once per request and pick a
//! call path; a station never silently substitutes one surface for another.
//! The desktop station has a single shared surface, so `set_both` is the
//! documented combined-call fallback and `set_lock` is an explicit error.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::codec::{CodecError, DecodedImage};

const STATION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::station");

/// Name of the staged wallpaper file below the staging directory.
const STAGED_FILE_NAME: &str = "fresco-wallpaper.png";

/// Errors surfaced by wallpaper stations.
#[derive(Debug, Error)]
pub enum StationError {
    /// This station cannot set wallpapers at all.
    #[error("wallpaper setting is not supported on this platform")]
    Unsupported,
    /// This station has no independent lock-screen surface.
    #[error("lock-screen wallpaper is not supported on this platform")]
    LockUnsupported,
    /// Creating or writing the staged image file failed.
    #[error("failed to stage wallpaper image at '{}': {source}", path.display())]
    Stage {
        /// Path the stage write targeted.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Re-encoding the decoded image for staging failed.
    #[error(transparent)]
    Encode(#[from] CodecError),
    /// The platform wallpaper backend rejected the staged image.
    #[error("wallpaper backend error: {message}")]
    Backend {
        /// Backend-reported error text.
        message: String,
    },
}

/// Applies decoded images to the platform's wallpaper surfaces.
pub trait WallpaperStation: Send + Sync {
    /// Whether this station can set wallpapers at all.
    ///
    /// Must be pure: the answer is fixed for the lifetime of the station and
    /// backs the `isSupported` probe.
    fn supports_wallpaper(&self) -> bool;

    /// Whether this station has an independent lock-screen surface.
    fn supports_lock_screen(&self) -> bool;

    /// Applies the image to the home / system background.
    ///
    /// # Errors
    ///
    /// Returns a [`StationError`] when staging or the backend call fails.
    fn set_home(&self, image: &DecodedImage) -> Result<(), StationError>;

    /// Applies the image to the lock-screen background.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::LockUnsupported`] on stations without an
    /// independent lock surface, or another [`StationError`] on failure.
    fn set_lock(&self, image: &DecodedImage) -> Result<(), StationError>;

    /// Applies the image to both surfaces.
    ///
    /// Stations without independent surface flags fall back to one combined
    /// call.
    ///
    /// # Errors
    ///
    /// Returns a [`StationError`] when staging or the backend call fails.
    fn set_both(&self, image: &DecodedImage) -> Result<(), StationError>;
}

/// Station for desktop hosts, backed by the `wallpaper` crate.
///
/// Desktop environments take a file path, so the decoded image is staged as a
/// PNG below `staging_dir` (atomically, via a temp file rename) before the
/// backend is invoked.
#[derive(Debug)]
pub struct DesktopWallpaperStation {
    staging_dir: PathBuf,
}

impl DesktopWallpaperStation {
    /// Builds a station staging images below the given directory.
    #[must_use]
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }

    fn stage(&self, image: &DecodedImage) -> Result<PathBuf, StationError> {
        let encoded = image.to_png_bytes()?;
        let path = self.staging_dir.join(STAGED_FILE_NAME);

        fs::create_dir_all(&self.staging_dir).map_err(|source| StationError::Stage {
            path: self.staging_dir.clone(),
            source,
        })?;

        let mut staged = tempfile::NamedTempFile::new_in(&self.staging_dir).map_err(|source| {
            StationError::Stage {
                path: path.clone(),
                source,
            }
        })?;
        staged
            .write_all(&encoded)
            .map_err(|source| StationError::Stage {
                path: path.clone(),
                source,
            })?;
        staged
            .persist(&path)
            .map_err(|error| StationError::Stage {
                path: path.clone(),
                source: error.error,
            })?;

        debug!(
            target: STATION_TARGET,
            path = %path.display(),
            bytes = encoded.len(),
            "staged wallpaper image"
        );
        Ok(path)
    }

    fn apply(&self, image: &DecodedImage) -> Result<(), StationError> {
        let path = self.stage(image)?;
        apply_staged(&path)
    }
}

fn apply_staged(path: &Path) -> Result<(), StationError> {
    let location = path.to_string_lossy();
    wallpaper::set_from_path(&location).map_err(|error| StationError::Backend {
        message: error.to_string(),
    })
}

impl WallpaperStation for DesktopWallpaperStation {
    fn supports_wallpaper(&self) -> bool {
        true
    }

    fn supports_lock_screen(&self) -> bool {
        false
    }

    fn set_home(&self, image: &DecodedImage) -> Result<(), StationError> {
        self.apply(image)
    }

    fn set_lock(&self, _image: &DecodedImage) -> Result<(), StationError> {
        Err(StationError::LockUnsupported)
    }

    fn set_both(&self, image: &DecodedImage) -> Result<(), StationError> {
        // One shared surface; a single combined call covers both targets.
        self.apply(image)
    }
}

/// Station for gallery-only hosts; declines every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedWallpaperStation;

impl UnsupportedWallpaperStation {
    /// Builds the declining station.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl WallpaperStation for UnsupportedWallpaperStation {
    fn supports_wallpaper(&self) -> bool {
        false
    }

    fn supports_lock_screen(&self) -> bool {
        false
    }

    fn set_home(&self, _image: &DecodedImage) -> Result<(), StationError> {
        Err(StationError::Unsupported)
    }

    fn set_lock(&self, _image: &DecodedImage) -> Result<(), StationError> {
        Err(StationError::Unsupported)
    }

    fn set_both(&self, _image: &DecodedImage) -> Result<(), StationError> {
        Err(StationError::Unsupported)
    }
}
