//! Image decoding capability.

use std::io::Cursor;

use thiserror::Error;

/// An image decoded into memory, ready for a wallpaper or gallery backend.
///
/// Owns the pixel buffer; dropping the value releases it, so pipelines that
/// consume a `DecodedImage` by value cannot leak it on any exit path.
#[derive(Debug)]
pub struct DecodedImage {
    image: image::DynamicImage,
}

impl DecodedImage {
    pub(crate) const fn new(image: image::DynamicImage) -> Self {
        Self { image }
    }

    /// Pixel width of the decoded image.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Pixel height of the decoded image.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Re-encodes the image as PNG for staging to disk.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] when the encoder fails.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .map_err(|source| CodecError::Encode { source })?;
        Ok(buffer.into_inner())
    }
}

/// Errors surfaced by the image codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The supplied bytes are not a decodable image.
    #[error("could not decode image: {source}")]
    Decode {
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
    /// Re-encoding a decoded image failed.
    #[error("could not encode staged image: {source}")]
    Encode {
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Decodes raw bytes into a [`DecodedImage`].
pub trait ImageCodec: Send + Sync {
    /// Decodes the supplied bytes, sniffing the format from the content.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] when the bytes are not an image.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError>;
}

/// Codec backed by the `image` crate's format auto-detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardImageCodec;

impl StandardImageCodec {
    /// Builds a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageCodec for StandardImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError> {
        image::load_from_memory(bytes)
            .map(DecodedImage::new)
            .map_err(|source| CodecError::Decode { source })
    }
}
