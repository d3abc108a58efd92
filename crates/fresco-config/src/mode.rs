//! Wallpaper capability override.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Directive applied to wallpaper capability detection at bootstrap.
///
/// The daemon resolves its platform profile once; this override lets
/// deployments pin the outcome instead of trusting detection — `deny` turns a
/// desktop host into a gallery-only one, `force` advertises wallpaper support
/// even where detection would decline it.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WallpaperMode {
    /// Leave the decision to platform detection (default).
    #[default]
    Auto,
    /// Advertise wallpaper support regardless of detection.
    Force,
    /// Disable wallpaper support regardless of detection.
    Deny,
}
