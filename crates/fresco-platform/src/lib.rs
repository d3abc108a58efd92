//! Platform capability interfaces for the Fresco plugin host.
//!
//! The daemon never talks to an image decoder, wallpaper backend, or photo
//! gallery directly; it talks to the traits defined here. Each trait has one
//! production implementation per platform profile, resolved once at bootstrap
//! ([`Capabilities::resolve`]) — version- and desktop-specific branching lives
//! behind the traits, not in the request handlers.
//!
//! Profiles mirror the two platform families the host serves: `Full` can set
//! wallpapers programmatically and save to the gallery; `GalleryOnly` can only
//! save (its wallpaper station declines every call, matching what
//! `isSupported` advertises).

mod codec;
mod gallery;
mod permissions;
mod profile;
mod station;
#[cfg(test)]
mod testutil;

pub use codec::{CodecError, DecodedImage, ImageCodec, StandardImageCodec};
pub use gallery::{GalleryError, GalleryStore, PicturesDirStore, SavedImage, default_file_name};
pub use permissions::{OpenPermissionGate, PermissionGate, PermissionState, StaticPermissionGate};
pub use profile::{Capabilities, PlatformProfile, ResolveError};
pub use station::{
    DesktopWallpaperStation, StationError, UnsupportedWallpaperStation, WallpaperStation,
};

/// Short description of the host platform, e.g. `linux x86_64`.
///
/// Backs the `getPlatformVersion` operation; deliberately static so the
/// operation stays pure and synchronous.
#[must_use]
pub fn host_description() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}
