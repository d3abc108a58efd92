//! Platform profile resolution.
//!
//! A profile names the family of capability implementations the daemon runs
//! with. It is resolved exactly once at bootstrap; request handlers only ever
//! see the resulting [`Capabilities`] bundle and stay free of platform
//! branching.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::codec::{ImageCodec, StandardImageCodec};
use crate::gallery::{GalleryStore, PicturesDirStore};
use crate::permissions::{OpenPermissionGate, PermissionGate};
use crate::station::{DesktopWallpaperStation, UnsupportedWallpaperStation, WallpaperStation};

const PROFILE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::profile");

/// Capability family the daemon serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformProfile {
    /// Programmatic wallpaper setting plus gallery saves.
    Full,
    /// Gallery saves only; the wallpaper station declines every call.
    GalleryOnly,
}

impl PlatformProfile {
    /// Detects the profile for the compile-time target platform.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(any(
            target_os = "linux",
            target_os = "macos",
            target_os = "windows"
        )) {
            Self::Full
        } else {
            Self::GalleryOnly
        }
    }

    /// Canonical name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::GalleryOnly => "gallery-only",
        }
    }
}

impl fmt::Display for PlatformProfile {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors surfaced while resolving the capability bundle.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No cache directory to stage wallpaper images in.
    #[error("no cache directory available to stage wallpaper images")]
    NoCacheDirectory,
    /// No pictures directory to anchor the gallery in.
    #[error("no pictures directory available for gallery saves")]
    NoPicturesDirectory,
}

/// The resolved capability bundle handed to request handlers.
#[derive(Clone)]
pub struct Capabilities {
    profile: PlatformProfile,
    codec: Arc<dyn ImageCodec>,
    station: Arc<dyn WallpaperStation>,
    gallery: Arc<dyn GalleryStore>,
}

impl Capabilities {
    /// Assembles a bundle from explicit collaborators.
    #[must_use]
    pub fn new(
        profile: PlatformProfile,
        codec: Arc<dyn ImageCodec>,
        station: Arc<dyn WallpaperStation>,
        gallery: Arc<dyn GalleryStore>,
    ) -> Self {
        Self {
            profile,
            codec,
            station,
            gallery,
        }
    }

    /// Resolves the production bundle for `profile`.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the host lacks the directories the
    /// implementations anchor to.
    pub fn resolve(profile: PlatformProfile) -> Result<Self, ResolveError> {
        let staging_dir = dirs::cache_dir()
            .ok_or(ResolveError::NoCacheDirectory)?
            .join("fresco");
        let pictures_dir = pictures_directory().ok_or(ResolveError::NoPicturesDirectory)?;

        let gate: Arc<dyn PermissionGate> = Arc::new(OpenPermissionGate::new());
        let station: Arc<dyn WallpaperStation> = match profile {
            PlatformProfile::Full => Arc::new(DesktopWallpaperStation::new(staging_dir)),
            PlatformProfile::GalleryOnly => Arc::new(UnsupportedWallpaperStation::new()),
        };

        info!(
            target: PROFILE_TARGET,
            profile = profile.as_str(),
            pictures_dir = %pictures_dir.display(),
            "resolved platform capabilities"
        );

        Ok(Self::new(
            profile,
            Arc::new(StandardImageCodec::new()),
            station,
            Arc::new(PicturesDirStore::new(pictures_dir, gate)),
        ))
    }

    /// The profile this bundle was resolved for.
    #[must_use]
    pub const fn profile(&self) -> PlatformProfile {
        self.profile
    }

    /// The image codec.
    #[must_use]
    pub fn codec(&self) -> &dyn ImageCodec {
        self.codec.as_ref()
    }

    /// The wallpaper station.
    #[must_use]
    pub fn station(&self) -> &dyn WallpaperStation {
        self.station.as_ref()
    }

    /// The gallery store.
    #[must_use]
    pub fn gallery(&self) -> &dyn GalleryStore {
        self.gallery.as_ref()
    }
}

fn pictures_directory() -> Option<PathBuf> {
    dirs::picture_dir().or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_targets_detect_the_full_profile() {
        // The test suite only runs on desktop hosts.
        assert_eq!(PlatformProfile::detect(), PlatformProfile::Full);
    }

    #[test]
    fn bundle_reports_its_profile_and_station_support() {
        let bundle = Capabilities::new(
            PlatformProfile::GalleryOnly,
            Arc::new(StandardImageCodec::new()),
            Arc::new(UnsupportedWallpaperStation::new()),
            Arc::new(PicturesDirStore::new(
                std::env::temp_dir(),
                Arc::new(OpenPermissionGate::new()),
            )),
        );
        assert_eq!(bundle.profile(), PlatformProfile::GalleryOnly);
        assert!(!bundle.station().supports_wallpaper());
    }
}
