//! Match hypotheses and finalized detections.
//!
//! A [`Candidate`] is an unresolved hit from one template x scale scan. Only
//! the orchestrator turns a candidate into a [`Detection`], after overlap
//! resolution and clipping, which is where the region tag is attached.

use crate::geometry::Point;
use std::sync::Arc;

pub(crate) mod resolve;

pub use resolve::{resolve, OverlapParams};

/// Unresolved template match.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub identity: u32,
    pub display_name: Arc<str>,
    /// Correlation score at the match cell.
    pub confidence: f32,
    /// Centre of the match box; the frame depends on the pipeline stage.
    pub location: Point,
    pub scale: f32,
}

impl Candidate {
    /// Promotes a candidate whose location is already in image space.
    pub(crate) fn into_detection(self, region: Arc<str>) -> Detection {
        Detection {
            identity: self.identity,
            display_name: self.display_name,
            confidence: self.confidence,
            location: self.location,
            scale: self.scale,
            region,
        }
    }
}

/// Final, region-tagged match in image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub identity: u32,
    pub display_name: Arc<str>,
    pub confidence: f32,
    pub location: Point,
    pub scale: f32,
    /// Name of the region that produced the detection.
    pub region: Arc<str>,
}
