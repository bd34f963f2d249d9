//! Detector configuration.
//!
//! Region geometry and thresholds are an immutable value handed to the
//! [`Detector`](crate::detect::Detector) at construction. The defaults describe
//! the three pick sections of a 1920x1080 draft screenshot.

use crate::candidate::OverlapParams;
use crate::geometry::PixelRect;
use crate::util::{PickScanError, PickScanResult};
use std::collections::HashSet;
use std::sync::Arc;

/// Named rectangle of the screenshot expected to hold a subset of icons.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub name: Arc<str>,
    pub rect: PixelRect,
    /// Expected maximum number of icons. Reported, never enforced.
    pub capacity_hint: usize,
    /// Multiplier applied to the base threshold for this region.
    pub threshold_multiplier: f32,
}

impl Region {
    pub fn new(
        name: impl Into<Arc<str>>,
        rect: PixelRect,
        capacity_hint: usize,
        threshold_multiplier: f32,
    ) -> Self {
        Self {
            name: name.into(),
            rect,
            capacity_hint,
            threshold_multiplier,
        }
    }

    /// The three pick sections of the standard layout, in processing order.
    pub fn default_layout() -> Vec<Region> {
        vec![
            Region::new("firstPick", PixelRect::new(704, 116, 576, 370), 6, 0.95),
            Region::new("sixthPick", PixelRect::new(1385, 131, 505, 353), 6, 0.95),
            Region::new("otherPicks", PixelRect::new(590, 742, 1329, 322), 16, 1.0),
        ]
    }
}

/// Configuration for [`Detector`](crate::detect::Detector).
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Regions searched in order; earlier regions claim identities first.
    pub regions: Vec<Region>,
    /// Margin in pixels added around each region before matching.
    pub padding: usize,
    /// Minimum correlation score before region multipliers.
    pub base_threshold: f32,
    /// IOU above which two candidates are considered duplicates.
    pub iou_threshold: f32,
    /// Confidence above which a candidate survives any overlap.
    pub high_confidence: f32,
    /// Smallest resized template side worth matching, in pixels.
    pub min_icon_size: u32,
    /// Overlap box side as a multiple of `min_icon_size`.
    pub overlap_box_factor: f32,
    /// Run template x scale jobs and score rows on the rayon pool (requires
    /// `rayon`). Results are identical either way.
    pub parallel: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            regions: Region::default_layout(),
            padding: 30,
            base_threshold: 0.65,
            iou_threshold: 0.3,
            high_confidence: 0.80,
            min_icon_size: 45,
            overlap_box_factor: 1.2,
            parallel: false,
        }
    }
}

impl DetectorConfig {
    /// Checks internal consistency.
    pub fn validate(&self) -> PickScanResult<()> {
        if self.regions.is_empty() {
            return Err(PickScanError::InvalidConfig("at least one region is required"));
        }
        let mut names = HashSet::new();
        for region in &self.regions {
            if region.rect.is_empty() {
                return Err(PickScanError::InvalidConfig("regions must have a non-zero area"));
            }
            if !names.insert(region.name.clone()) {
                return Err(PickScanError::InvalidConfig("region names must be unique"));
            }
            if !is_positive(region.threshold_multiplier) {
                return Err(PickScanError::InvalidConfig(
                    "threshold_multiplier must be positive",
                ));
            }
        }
        if !in_unit_interval(self.base_threshold) {
            return Err(PickScanError::InvalidConfig("base_threshold must be in (0, 1]"));
        }
        if !in_unit_interval(self.iou_threshold) {
            return Err(PickScanError::InvalidConfig("iou_threshold must be in (0, 1]"));
        }
        if !in_unit_interval(self.high_confidence) {
            return Err(PickScanError::InvalidConfig("high_confidence must be in (0, 1]"));
        }
        if self.min_icon_size == 0 {
            return Err(PickScanError::InvalidConfig("min_icon_size must be at least 1"));
        }
        if !is_positive(self.overlap_box_factor) {
            return Err(PickScanError::InvalidConfig("overlap_box_factor must be positive"));
        }
        Ok(())
    }

    /// Score threshold for `region`.
    pub fn region_threshold(&self, region: &Region) -> f32 {
        self.base_threshold * region.threshold_multiplier
    }

    /// Parameters for overlap resolution.
    pub fn overlap_params(&self) -> OverlapParams {
        OverlapParams {
            box_size: self.min_icon_size as f32 * self.overlap_box_factor,
            iou_threshold: self.iou_threshold,
            high_confidence: self.high_confidence,
        }
    }

    /// Side of the box drawn around detections in debug images.
    pub fn debug_box_size(&self) -> f32 {
        self.min_icon_size as f32 * 1.5
    }
}

fn in_unit_interval(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
