//! Deterministic thumbnail rendering.

use crate::error::DecodeError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ExtendedColorType;

/// Fixed JPEG quality for rendered thumbnails.
pub const JPEG_QUALITY: u8 = 85;

/// Render a cover-cropped JPEG thumbnail at exactly `width` x `height`.
///
/// Pure and deterministic: the filter and quality are fixed, so identical
/// input bytes and dimensions always produce byte-identical output. The
/// image is scaled to fill the target box and center-cropped on the
/// overflowing axis.
pub fn render_thumbnail(
    image_bytes: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, DecodeError> {
    let img = image::load_from_memory(image_bytes)?;
    let resized = img.resize_to_fill(width, height, FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode(
        rgb.as_raw(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;

    Ok(out)
}
