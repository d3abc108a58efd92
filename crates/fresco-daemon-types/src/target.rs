//! Wallpaper target surface selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Destination surface for a wallpaper-set operation.
///
/// Travels on the wire as the integer `type` argument; the 0/1/2 encoding is
/// part of the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallpaperTarget {
    /// Home / system background only.
    Home,
    /// Lock-screen background only.
    Lock,
    /// Both surfaces at once.
    Both,
}

impl WallpaperTarget {
    /// Wire encoding of the target.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Home => 0,
            Self::Lock => 1,
            Self::Both => 2,
        }
    }

    /// Decodes the wire integer; values outside 0..=2 are rejected.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Home),
            1 => Some(Self::Lock),
            2 => Some(Self::Both),
            _ => None,
        }
    }

    /// Human-readable name used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Lock => "lock",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for WallpaperTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for target in [
            WallpaperTarget::Home,
            WallpaperTarget::Lock,
            WallpaperTarget::Both,
        ] {
            assert_eq!(WallpaperTarget::from_code(target.code()), Some(target));
        }
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        assert_eq!(WallpaperTarget::from_code(-1), None);
        assert_eq!(WallpaperTarget::from_code(3), None);
        assert_eq!(WallpaperTarget::from_code(5), None);
    }
}
