//! Template rescaling.
//!
//! Resized dimensions use round-half-away-from-zero on `size * scale`. A scale
//! that leaves the size unchanged returns an exact copy, so a template matched
//! at its native size correlates perfectly with itself.

use ::image::imageops::{self, FilterType};
use ::image::GrayImage;

/// Returns the rounded `(width, height)` of a template scaled by `scale`.
pub fn scaled_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let w = (width as f32 * scale).round().max(0.0) as u32;
    let h = (height as f32 * scale).round().max(0.0) as u32;
    (w, h)
}

/// Resizes a grayscale image to exactly `width` x `height`.
pub fn resize_gray(src: &GrayImage, width: u32, height: u32) -> GrayImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    imageops::resize(src, width, height, FilterType::Triangle)
}
