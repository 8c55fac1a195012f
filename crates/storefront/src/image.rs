//! Product image preparation.
//!
//! Uploaded images are stored inline as base64 `data:` URLs, so they are
//! shrunk before they reach the catalog: at most [`MAX_EDGE`] pixels on the
//! long edge, re-encoded as JPEG.

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};

use baby_sneakers_core::ValidationError;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Longest edge of a prepared image, in pixels.
pub const MAX_EDGE: u32 = 800;

const JPEG_QUALITY: u8 = 75;

/// Decode, downscale, and re-encode an uploaded image as a JPEG data URL.
///
/// Images already within [`MAX_EDGE`] keep their size.
///
/// # Errors
///
/// Returns a `ValidationError` on the `image` field when the upload is too
/// large or cannot be decoded.
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn prepare_image(bytes: &[u8]) -> Result<String, ValidationError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::field("image", "must be 5 MB or smaller"));
    }

    let decoded = image::load_from_memory(bytes).map_err(|e| {
        tracing::debug!(error = %e, "Image decode failed");
        ValidationError::field("image", "is not a supported image")
    })?;

    let resized = downscale(decoded);
    let jpeg = encode_jpeg(&resized).map_err(|e| {
        tracing::warn!(error = %e, "JPEG encode failed");
        ValidationError::field("image", "could not be processed")
    })?;

    tracing::debug!(
        width = resized.width(),
        height = resized.height(),
        encoded = jpeg.len(),
        "Image prepared"
    );
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
}

fn downscale(image: DynamicImage) -> DynamicImage {
    if image.width().max(image.height()) <= MAX_EDGE {
        return image;
    }
    // `resize` fits within the bounds and keeps the aspect ratio.
    image.resize(MAX_EDGE, MAX_EDGE, FilterType::Triangle)
}

fn encode_jpeg(image: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    // JPEG has no alpha channel.
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(buf)
}
