//! Operation names and the request envelope.
//!
//! Operation names are part of the external contract and are matched
//! verbatim (camelCase, case-sensitive). Unknown names are not an error at
//! this layer: [`Operation::parse`] returns `None` and the daemon answers
//! with a `not_implemented` reply so callers can distinguish "wrong name"
//! from "operation failed".

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The closed set of operations the plugin host understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reports whether the platform can set wallpapers programmatically.
    IsSupported,
    /// Reports a short host platform description string.
    GetPlatformVersion,
    /// Decodes an image file and applies it as the wallpaper.
    SetWallpaperFromFile,
    /// Decodes an in-memory image and applies it as the wallpaper.
    SetWallpaperFromBytes,
    /// Copies an image file into the gallery album.
    SaveImageToGalleryFromFile,
    /// Writes an in-memory image into the gallery album.
    SaveImageToGalleryFromBytes,
}

impl Operation {
    /// Every known operation, in wire-contract order.
    pub const ALL: [Self; 6] = [
        Self::IsSupported,
        Self::GetPlatformVersion,
        Self::SetWallpaperFromFile,
        Self::SetWallpaperFromBytes,
        Self::SaveImageToGalleryFromFile,
        Self::SaveImageToGalleryFromBytes,
    ];

    /// Resolves a wire name to an operation.
    ///
    /// Returns `None` for unknown names; the caller decides how to surface
    /// that (the daemon replies `not_implemented`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "isSupported" => Some(Self::IsSupported),
            "getPlatformVersion" => Some(Self::GetPlatformVersion),
            "setWallpaperFromFile" => Some(Self::SetWallpaperFromFile),
            "setWallpaperFromBytes" => Some(Self::SetWallpaperFromBytes),
            "saveImageToGalleryFromFile" => Some(Self::SaveImageToGalleryFromFile),
            "saveImageToGalleryFromBytes" => Some(Self::SaveImageToGalleryFromBytes),
            _ => None,
        }
    }

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IsSupported => "isSupported",
            Self::GetPlatformVersion => "getPlatformVersion",
            Self::SetWallpaperFromFile => "setWallpaperFromFile",
            Self::SetWallpaperFromBytes => "setWallpaperFromBytes",
            Self::SaveImageToGalleryFromFile => "saveImageToGalleryFromFile",
            Self::SaveImageToGalleryFromBytes => "saveImageToGalleryFromBytes",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Request envelope sent by a client.
///
/// The argument bag is deliberately loose: handlers pull out and validate the
/// keys they need and reject anything malformed with a structured failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    /// Wire name of the requested operation.
    pub operation: String,
    /// Loosely-typed arguments keyed by name.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl OperationRequest {
    /// Creates a request with an empty argument bag.
    #[must_use]
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            arguments: Map::new(),
        }
    }

    /// Adds one argument, consuming and returning the request.
    #[must_use]
    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Returns the normalised (trimmed) operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.operation.trim()
    }
}
