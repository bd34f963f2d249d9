//! Boundaries to the collaborators around the detector.
//!
//! The detector never fetches icons or writes files itself. Callers provide
//! templates through [`TemplateSource`], receive debug images through
//! [`DebugSink`] and store finished batches through [`ResultSink`].
//! [`run_image`] wires one screenshot through decode, detection and the
//! optional debug image.

use crate::debug::{debug_filename, render_debug};
use crate::detect::{DetectionBatch, Detector};
use crate::image::io::{decode_image, encode_png, to_luma};
use crate::image::ImageView;
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::PickScanResult;
use ab_glyph::FontArc;
use ::image::RgbImage;

/// Supplies the fixed template set for a run.
pub trait TemplateSource {
    fn templates(&mut self) -> PickScanResult<Vec<Template>>;
}

impl TemplateSource for Vec<Template> {
    fn templates(&mut self) -> PickScanResult<Vec<Template>> {
        Ok(self.clone())
    }
}

/// Stores encoded debug images.
pub trait DebugSink {
    /// Stores `png` under `filename` and returns where it can be retrieved.
    fn persist_debug_image(&mut self, png: &[u8], filename: &str) -> PickScanResult<String>;
}

/// Append-only store for detection batches.
pub trait ResultSink {
    fn persist_batch(&mut self, batch: &DetectionBatch) -> PickScanResult<()>;
}

/// Debug image handling for [`run_image`].
pub struct DebugOutput<'a> {
    pub sink: &'a mut dyn DebugSink,
    /// Font for detection labels; labels are skipped without one.
    pub font: Option<&'a FontArc>,
}

/// Decodes `bytes`, detects icons and optionally persists a debug image.
///
/// Only a decode failure is returned as an error. Debug rendering or
/// persistence failures leave `debug_image` unset.
pub fn run_image(
    detector: &Detector,
    bytes: &[u8],
    image_path: &str,
    debug: Option<DebugOutput<'_>>,
) -> PickScanResult<DetectionBatch> {
    let _span = trace_span!("run_image", path = image_path).entered();

    let rgb = decode_image(bytes)?;
    let luma = to_luma(&rgb);
    let mut batch = detector.detect(ImageView::from_gray(&luma)?);
    batch.image_path = Some(image_path.to_string());
    drop(luma);

    if let Some(debug) = debug {
        match persist_debug(detector, &rgb, &batch, image_path, debug) {
            Ok(path) => {
                trace_event!("debug_image_saved", path = path.as_str());
                batch.debug_image = Some(path);
            }
            Err(err) => {
                let reason = err.to_string();
                trace_warn!("debug_render_failed", reason = reason.as_str());
            }
        }
    }

    Ok(batch)
}

fn persist_debug(
    detector: &Detector,
    rgb: &RgbImage,
    batch: &DetectionBatch,
    image_path: &str,
    debug: DebugOutput<'_>,
) -> PickScanResult<String> {
    let annotated = render_debug(rgb, detector.config(), &batch.detections, debug.font)?;
    let png = encode_png(&annotated)?;
    debug
        .sink
        .persist_debug_image(&png, &debug_filename(image_path))
}
