//! Image intake domain — public API.
//!
//! This module owns everything between the upload/capture collaborator
//! and the OCR engine: decoding uploaded bytes or data URLs into an
//! image, and re-encoding to PNG bytes for recognition. No disk I/O.

use crate::error::ScanError;
use image::DynamicImage;

/// Decode raw uploaded bytes (JPEG, PNG, WEBP, ...) into an image.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage, ScanError> {
    image::load_from_memory(bytes)
        .map_err(|e| ScanError::InvalidImage(format!("decode failed: {}", e)))
}

/// Decode a `data:image/...;base64,` URL — the format the upload and
/// camera-capture collaborators hand over.
pub fn decode_data_url(url: &str) -> Result<DynamicImage, ScanError> {
    let payload = url
        .split_once("base64,")
        .map(|(_, rest)| rest)
        .ok_or_else(|| ScanError::InvalidImage("not a base64 data URL".to_string()))?;

    let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, payload)
        .map_err(|e| ScanError::InvalidImage(format!("base64 decode failed: {}", e)))?;

    decode_image_bytes(&bytes)
}

/// Encode the held image to PNG bytes in memory for the OCR engine.
pub fn to_png_bytes(image: &DynamicImage) -> Result<Vec<u8>, ScanError> {
    let mut png_bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut png_bytes),
            image::ImageFormat::Png,
        )
        .map_err(|e| ScanError::InvalidImage(format!("PNG encode failed: {}", e)))?;
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255])))
    }

    #[test]
    fn png_round_trip() {
        let png = to_png_bytes(&sample_image()).unwrap();
        let decoded = decode_image_bytes(&png).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }

    #[test]
    fn data_url_round_trip() {
        let png = to_png_bytes(&sample_image()).unwrap();
        let b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &png);
        let url = format!("data:image/png;base64,{}", b64);
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn garbage_bytes_are_invalid_image() {
        match decode_image_bytes(b"not an image") {
            Err(ScanError::InvalidImage(_)) => {}
            other => panic!("expected InvalidImage, got {:?}", other),
        }
    }

    #[test]
    fn non_data_url_is_rejected() {
        assert!(matches!(
            decode_data_url("https://example.com/photo.png"),
            Err(ScanError::InvalidImage(_))
        ));
    }
}
