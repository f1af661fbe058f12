//! Payload decoding helpers.
//!
//! Submissions arrive as base64-encoded bitmaps, usually carrying the
//! data-URI header a canvas export produces. These helpers strip the
//! header, decode the bytes, and convert the result to the grayscale
//! buffer the segmentation stage consumes.

use crate::core::errors::{OcrError, OcrResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GrayImage};

/// The fixed data-URI header produced by a PNG canvas export.
///
/// Exactly this header is stripped before decoding; any other `data:`
/// header is rejected rather than guessed at.
pub const DATA_URI_HEADER: &str = "data:image/png;base64,";

/// Converts a DynamicImage to a GrayImage.
///
/// # Arguments
///
/// * `img` - The DynamicImage to convert
///
/// # Returns
///
/// * `GrayImage` - The converted grayscale image
pub fn dynamic_to_gray(img: DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Decodes a submitted payload into a grayscale bitmap.
///
/// # Arguments
///
/// * `payload` - A base64 string, optionally prefixed with the PNG
///   data-URI header.
///
/// # Returns
///
/// The decoded grayscale bitmap.
///
/// # Errors
///
/// Returns `OcrError::BadInput` for an unexpected data-URI header,
/// undecodable base64, or bytes no image decoder accepts.
pub fn decode_payload(payload: &str) -> OcrResult<GrayImage> {
    let encoded = strip_data_uri(payload)?;

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| OcrError::bad_input(format!("undecodable base64 payload: {}", e)))?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| OcrError::bad_input(format!("undecodable image payload: {}", e)))?;

    Ok(dynamic_to_gray(img))
}

/// Strips the data-URI header from a payload, if present.
///
/// A bare base64 payload passes through unchanged. A payload that starts
/// a data-URI but with a different header is rejected instead of being
/// misdecoded.
fn strip_data_uri(payload: &str) -> OcrResult<&str> {
    if let Some(rest) = payload.strip_prefix(DATA_URI_HEADER) {
        return Ok(rest);
    }
    if payload.starts_with("data:") {
        return Err(OcrError::bad_input(
            "unsupported data-URI header, expected a base64 PNG",
        ));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::io::Cursor;

    fn png_payload(width: u32, height: u32) -> String {
        let img = GrayImage::from_pixel(width, height, Luma([200u8]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        STANDARD.encode(&bytes)
    }

    #[test]
    fn decodes_bare_base64() {
        let image = decode_payload(&png_payload(12, 8)).unwrap();
        assert_eq!(image.dimensions(), (12, 8));
    }

    #[test]
    fn strips_expected_data_uri_header() {
        let payload = format!("{}{}", DATA_URI_HEADER, png_payload(12, 8));
        let image = decode_payload(&payload).unwrap();
        assert_eq!(image.dimensions(), (12, 8));
    }

    #[test]
    fn rejects_foreign_data_uri_header() {
        let payload = format!("data:image/jpeg;base64,{}", png_payload(12, 8));
        assert!(matches!(
            decode_payload(&payload),
            Err(OcrError::BadInput { .. })
        ));
    }

    #[test]
    fn rejects_malformed_base64() {
        assert!(matches!(
            decode_payload("!!not-base64!!"),
            Err(OcrError::BadInput { .. })
        ));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let payload = STANDARD.encode(b"plain text, not a bitmap");
        assert!(matches!(
            decode_payload(&payload),
            Err(OcrError::BadInput { .. })
        ));
    }
}
