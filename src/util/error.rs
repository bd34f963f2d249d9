//! Error types for pickscan.

use thiserror::Error;

/// Result alias for pickscan operations.
pub type PickScanResult<T> = std::result::Result<T, PickScanError>;

/// Errors that can occur while detecting icons in a screenshot.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PickScanError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the described image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested rectangle does not fit inside the image.
    #[error(
        "roi {width}x{height} at ({x}, {y}) is outside {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template cannot be normalized.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Image bytes could not be decoded.
    #[error("failed to decode image: {reason}")]
    Decode { reason: String },
    /// Region of interest could not be extracted.
    #[error("failed to extract region {region}: {reason}")]
    RegionExtraction { region: String, reason: String },
    /// One template x scale matching call failed.
    #[error("matching failed for template {identity} at scale {scale}: {reason}")]
    Matching {
        identity: u32,
        scale: f32,
        reason: String,
    },
    /// Debug visualization could not be produced.
    #[error("debug render failed: {reason}")]
    DebugRender { reason: String },
    /// Templates could not be supplied.
    #[error("template source failed: {reason}")]
    TemplateSource { reason: String },
    /// An external collaborator rejected the data handed to it.
    #[error("sink failed: {reason}")]
    Sink { reason: String },
    /// Detector configuration violates a constraint.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
