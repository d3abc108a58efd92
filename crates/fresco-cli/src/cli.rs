//! CLI argument definitions for the Fresco client.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use fresco_daemon_types::WallpaperTarget;

/// Output rendering for daemon replies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// The raw JSON reply line.
    Json,
}

/// Command-line interface for the Fresco plugin host client.
#[derive(Parser, Debug)]
#[command(name = "fresco", version, about = "Client for the Fresco wallpaper plugin host")]
pub(crate) struct Cli {
    /// Daemon endpoint URL (`unix://…` or `tcp://host:port`), overriding
    /// configuration and environment.
    #[arg(long, value_name = "URL", global = true)]
    pub(crate) socket: Option<String>,
    /// Controls how the daemon reply is rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Operations exposed by the plugin host.
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Asks whether the platform supports programmatic wallpaper setting.
    Supported,
    /// Prints the daemon's platform description.
    PlatformVersion,
    /// Sets the wallpaper from an image.
    SetWallpaper {
        /// Path to an image file, passed to the daemon for it to read.
        #[arg(
            long,
            value_name = "PATH",
            conflicts_with = "bytes_from",
            required_unless_present = "bytes_from"
        )]
        file: Option<PathBuf>,
        /// Reads the image locally and ships its raw bytes instead.
        #[arg(long, value_name = "PATH")]
        bytes_from: Option<PathBuf>,
        /// Target surface.
        #[arg(long, value_enum, default_value_t = TargetArg::Home)]
        target: TargetArg,
    },
    /// Saves an image into the gallery album.
    SaveImage {
        /// Path to an image file, passed to the daemon for it to read.
        #[arg(
            long,
            value_name = "PATH",
            conflicts_with = "bytes_from",
            required_unless_present = "bytes_from"
        )]
        file: Option<PathBuf>,
        /// Reads the image locally and ships its raw bytes instead.
        #[arg(long, value_name = "PATH")]
        bytes_from: Option<PathBuf>,
        /// File name inside the album; defaults to a time-stamped name.
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },
}

/// Wallpaper surface selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum TargetArg {
    /// Home / system background.
    #[default]
    Home,
    /// Lock-screen background.
    Lock,
    /// Both surfaces.
    Both,
}

impl From<TargetArg> for WallpaperTarget {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Home => Self::Home,
            TargetArg::Lock => Self::Lock,
            TargetArg::Both => Self::Both,
        }
    }
}
