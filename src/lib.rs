//! pickscan locates known icons in draft screenshots.
//!
//! A [`Detector`] searches a fixed set of screen regions for every
//! [`Template`] at a small band of planned scales using zero-mean normalized
//! cross-correlation, resolves overlapping hits and reports each icon at most
//! once per screenshot. Template x scale scans and score rows can run on the
//! rayon pool with the `rayon` feature, `simd` vectorizes the correlation dot
//! product and the `tracing` feature emits spans and events.

pub mod candidate;
pub mod config;
pub mod debug;
pub mod detect;
pub mod geometry;
pub mod image;
pub mod kernel;
pub mod scale;
pub mod search;
pub mod sink;
pub mod template;
mod trace;
pub mod util;

pub use crate::image::io;
pub use crate::image::ImageView;
pub use candidate::{resolve, Candidate, Detection, OverlapParams};
pub use config::{DetectorConfig, Region};
pub use detect::{DetectionBatch, Detector, RegionOutcome, RegionReport};
pub use geometry::{intersection_over_union, padded_bounds, to_global, to_local, PixelRect, Point};
pub use scale::ScalePlan;
pub use search::{match_template_in_region, MatchParams};
pub use sink::{run_image, DebugOutput, DebugSink, ResultSink, TemplateSource};
pub use template::{Template, TemplatePlan};
pub use util::{PickScanError, PickScanResult};

/// Re-exported so callers can load label fonts without a direct dependency.
pub use ab_glyph::FontArc;
