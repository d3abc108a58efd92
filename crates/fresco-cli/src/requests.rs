//! Builds operation requests from parsed subcommands.

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use fresco_daemon_types::{Operation, OperationRequest, WallpaperTarget};

use crate::cli::{Command, TargetArg};
use crate::errors::AppError;

/// Builds the wire request for one subcommand.
///
/// File-based operations send a path for the daemon to read; the path is
/// canonicalised when possible so a relative argument survives the daemon
/// running in a different working directory. Bytes-based operations read the
/// file locally and ship the payload base64-encoded.
pub(crate) fn build(command: &Command) -> Result<OperationRequest, AppError> {
    match command {
        Command::Supported => Ok(OperationRequest::new(Operation::IsSupported.as_str())),
        Command::PlatformVersion => {
            Ok(OperationRequest::new(Operation::GetPlatformVersion.as_str()))
        }
        Command::SetWallpaper {
            file,
            bytes_from,
            target,
        } => {
            let target = WallpaperTarget::from(*target);
            let request = match (file, bytes_from) {
                (Some(path), _) => {
                    OperationRequest::new(Operation::SetWallpaperFromFile.as_str())
                        .with_argument("filePath", shipped_path(path))
                }
                (None, Some(path)) => {
                    OperationRequest::new(Operation::SetWallpaperFromBytes.as_str())
                        .with_argument("bytes", encoded_bytes(path)?)
                }
                (None, None) => unreachable!("clap enforces an image source"),
            };
            Ok(request.with_argument("type", target.code()))
        }
        Command::SaveImage {
            file,
            bytes_from,
            name,
        } => {
            let mut request = match (file, bytes_from) {
                (Some(path), _) => {
                    OperationRequest::new(Operation::SaveImageToGalleryFromFile.as_str())
                        .with_argument("filePath", shipped_path(path))
                }
                (None, Some(path)) => {
                    OperationRequest::new(Operation::SaveImageToGalleryFromBytes.as_str())
                        .with_argument("bytes", encoded_bytes(path)?)
                }
                (None, None) => unreachable!("clap enforces an image source"),
            };
            if let Some(name) = name {
                request = request.with_argument("fileName", name.clone());
            }
            Ok(request)
        }
    }
}

fn shipped_path(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

fn encoded_bytes(path: &Path) -> Result<String, AppError> {
    let bytes = fs::read(path).map_err(|source| AppError::ReadImage {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::Value;

    use super::*;

    #[test]
    fn supported_request_has_no_arguments() {
        let request = build(&Command::Supported).expect("build request");
        assert_eq!(request.name(), "isSupported");
        assert!(request.arguments.is_empty());
    }

    #[test]
    fn set_wallpaper_from_file_carries_path_and_target() {
        let request = build(&Command::SetWallpaper {
            file: Some(PathBuf::from("/not/a/real/file.png")),
            bytes_from: None,
            target: TargetArg::Both,
        })
        .expect("build request");

        assert_eq!(request.name(), "setWallpaperFromFile");
        assert_eq!(
            request.arguments.get("type").and_then(Value::as_i64),
            Some(2)
        );
        assert_eq!(
            request.arguments.get("filePath").and_then(Value::as_str),
            Some("/not/a/real/file.png"),
            "uncanonicalisable paths are shipped verbatim"
        );
    }

    #[test]
    fn set_wallpaper_from_bytes_ships_base64_payload() {
        let scratch = tempfile::tempdir().expect("create tempdir");
        let source = scratch.path().join("img.bin");
        fs::write(&source, b"pixels").expect("write fixture");

        let request = build(&Command::SetWallpaper {
            file: None,
            bytes_from: Some(source),
            target: TargetArg::Home,
        })
        .expect("build request");

        assert_eq!(request.name(), "setWallpaperFromBytes");
        let payload = request
            .arguments
            .get("bytes")
            .and_then(Value::as_str)
            .expect("payload present");
        assert_eq!(BASE64.decode(payload).expect("valid base64"), b"pixels");
    }

    #[test]
    fn missing_bytes_source_is_a_read_error() {
        let result = build(&Command::SaveImage {
            file: None,
            bytes_from: Some(PathBuf::from("/no/such/file.bin")),
            name: None,
        });
        assert!(matches!(result, Err(AppError::ReadImage { .. })));
    }

    #[test]
    fn save_image_forwards_the_chosen_name() {
        let request = build(&Command::SaveImage {
            file: Some(PathBuf::from("/tmp/a.png")),
            bytes_from: None,
            name: Some("sunset.png".to_owned()),
        })
        .expect("build request");

        assert_eq!(request.name(), "saveImageToGalleryFromFile");
        assert_eq!(
            request.arguments.get("fileName").and_then(Value::as_str),
            Some("sunset.png")
        );
    }
}
