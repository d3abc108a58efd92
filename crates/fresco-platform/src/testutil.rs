//! Shared fixtures for the capability tests.

use std::io::Cursor;

/// Encodes a solid RGB image as PNG bytes.
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode fixture");
    buffer.into_inner()
}
