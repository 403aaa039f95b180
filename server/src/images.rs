//! Validation for uploaded image bytes.
//!
//! The client's declared content type is ignored; the stored mime type comes
//! from the magic bytes of the payload itself.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;

pub const MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

pub const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Detects the format from magic bytes and checks it against the allow-list.
/// Returns the mime type to store alongside the raw bytes.
pub fn sniff_content_type(data: &[u8]) -> Result<String, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_png_from_magic_bytes() {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0; 16]);
        assert_eq!(sniff_content_type(&data).unwrap(), "image/png");
    }

    #[test]
    fn detects_jpeg_from_magic_bytes() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.extend_from_slice(&[0; 16]);
        assert_eq!(sniff_content_type(&data).unwrap(), "image/jpeg");
    }

    #[test]
    fn rejects_unrecognized_bytes() {
        let err = sniff_content_type(b"definitely not an image").unwrap_err();
        assert!(err.contains("detect"));
    }

    #[test]
    fn rejects_formats_outside_the_allow_list() {
        // Valid BMP magic, which sniffs fine but is not allowed.
        let mut data = vec![b'B', b'M'];
        data.extend_from_slice(&[0; 32]);
        let err = sniff_content_type(&data).unwrap_err();
        assert!(err.contains("Unsupported image format"));
    }
}
