//! Decoding and encoding helpers built on the `image` crate.

use crate::util::{PickScanError, PickScanResult};
use ::image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// Decodes an in-memory PNG/JPEG/GIF into an RGB buffer.
pub fn decode_image(bytes: &[u8]) -> PickScanResult<RgbImage> {
    decode_dynamic(bytes).map(|img| img.to_rgb8())
}

/// Decodes an in-memory image and converts it to luma.
pub fn decode_gray(bytes: &[u8]) -> PickScanResult<GrayImage> {
    decode_dynamic(bytes).map(|img| img.to_luma8())
}

/// Converts an RGB buffer to single-channel luminance.
pub fn to_luma(img: &RgbImage) -> GrayImage {
    ::image::imageops::grayscale(img)
}

/// Encodes an RGB buffer as PNG.
pub fn encode_png(img: &RgbImage) -> PickScanResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|err| PickScanError::DebugRender {
            reason: err.to_string(),
        })?;
    Ok(buf)
}

fn decode_dynamic(bytes: &[u8]) -> PickScanResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(PickScanError::Decode {
            reason: "empty input".to_string(),
        });
    }
    ::image::load_from_memory(bytes).map_err(|err| PickScanError::Decode {
        reason: err.to_string(),
    })
}
