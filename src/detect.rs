//! Detection orchestration over the configured regions.
//!
//! For every region, in configuration order, the detector pads the region,
//! cuts the ROI out of the luma screenshot, scans every template at every
//! planned scale, resolves overlapping candidates, clips survivors back to the
//! unpadded region and tags them with the region name. The set of claimed
//! identities is shared across regions so an icon is reported at most once.
//!
//! Failures are contained: a failed template x scale scan contributes nothing,
//! a failed region reports [`RegionOutcome::Failed`] and the remaining regions
//! still run.

use crate::candidate::{resolve, Candidate, Detection};
use crate::config::{DetectorConfig, Region};
use crate::geometry::{padded_bounds, region_to_global, roi_to_region, PaddedRegion};
use crate::image::ImageView;
use crate::scale::ScalePlan;
use crate::search::{match_template_in_region, MatchParams};
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{PickScanError, PickScanResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// How a region's search ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionOutcome {
    /// The region produced this many detections (at least one).
    Matched(usize),
    /// The search ran and nothing survived.
    Empty,
    /// The search could not run; the region contributes nothing.
    Failed(String),
}

/// Per-region summary attached to a [`DetectionBatch`].
#[derive(Clone, Debug, PartialEq)]
pub struct RegionReport {
    pub name: Arc<str>,
    pub capacity_hint: usize,
    /// Raw candidates collected before overlap resolution.
    pub raw_candidates: usize,
    pub outcome: RegionOutcome,
}

impl RegionReport {
    pub fn detection_count(&self) -> usize {
        match self.outcome {
            RegionOutcome::Matched(count) => count,
            RegionOutcome::Empty | RegionOutcome::Failed(_) => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, RegionOutcome::Failed(_))
    }
}

/// Detections for one screenshot plus the data collaborators persist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionBatch {
    /// Path of the source screenshot, when known.
    pub image_path: Option<String>,
    /// Detections in region order, then by descending confidence.
    pub detections: Vec<Detection>,
    pub regions: Vec<RegionReport>,
    /// Retrieval path of the persisted debug image.
    pub debug_image: Option<String>,
}

impl DetectionBatch {
    /// Detection count per region, in region order.
    pub fn region_counts(&self) -> Vec<(Arc<str>, usize)> {
        self.regions
            .iter()
            .map(|report| (report.name.clone(), report.detection_count()))
            .collect()
    }

    /// Detections tagged with `region`.
    pub fn in_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Detection> + 'a {
        self.detections
            .iter()
            .filter(move |detection| &*detection.region == region)
    }

    /// Regions that yielded more detections than their capacity hint.
    pub fn over_capacity(&self) -> Vec<&RegionReport> {
        self.regions
            .iter()
            .filter(|report| report.detection_count() > report.capacity_hint)
            .collect()
    }

    pub fn failed_regions(&self) -> Vec<&RegionReport> {
        self.regions.iter().filter(|report| report.is_failed()).collect()
    }

    pub fn has_debug_image(&self) -> bool {
        self.debug_image.is_some()
    }
}

/// Multi-region icon detector over a fixed template set.
pub struct Detector {
    config: DetectorConfig,
    templates: Vec<Template>,
}

impl Detector {
    /// Creates a detector after validating `config`.
    pub fn new(config: DetectorConfig, templates: Vec<Template>) -> PickScanResult<Self> {
        config.validate()?;
        Ok(Self { config, templates })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Detects icons in a luma screenshot.
    ///
    /// Never fails as a whole: region failures are recorded in the returned
    /// batch and the other regions still contribute.
    pub fn detect(&self, image: ImageView<'_>) -> DetectionBatch {
        let _span = trace_span!(
            "detect",
            width = image.width(),
            height = image.height(),
            templates = self.templates.len()
        )
        .entered();

        let mut claimed = HashSet::new();
        let mut batch = DetectionBatch::default();
        for region in &self.config.regions {
            let (outcome, raw_candidates) = match self.detect_region(image, region, &mut claimed) {
                Ok((detections, raw_candidates)) => {
                    let outcome = if detections.is_empty() {
                        trace_event!("region_empty", region = &*region.name);
                        RegionOutcome::Empty
                    } else {
                        RegionOutcome::Matched(detections.len())
                    };
                    if detections.len() > region.capacity_hint {
                        trace_warn!(
                            "capacity_exceeded",
                            region = &*region.name,
                            count = detections.len(),
                            capacity = region.capacity_hint
                        );
                    }
                    batch.detections.extend(detections);
                    (outcome, raw_candidates)
                }
                Err(err) => {
                    let reason = err.to_string();
                    trace_warn!(
                        "region_failed",
                        region = &*region.name,
                        reason = reason.as_str()
                    );
                    (RegionOutcome::Failed(reason), 0)
                }
            };
            batch.regions.push(RegionReport {
                name: region.name.clone(),
                capacity_hint: region.capacity_hint,
                raw_candidates,
                outcome,
            });
        }

        trace_event!("detect_done", detections = batch.detections.len());
        batch
    }

    fn detect_region(
        &self,
        image: ImageView<'_>,
        region: &Region,
        claimed: &mut HashSet<u32>,
    ) -> PickScanResult<(Vec<Detection>, usize)> {
        let extraction_error = |reason: String| PickScanError::RegionExtraction {
            region: region.name.to_string(),
            reason,
        };

        let padded = padded_bounds(
            region.rect,
            image.width(),
            image.height(),
            self.config.padding,
        );
        if padded.is_empty() {
            return Err(extraction_error("region lies outside the image".to_string()));
        }
        let roi = image
            .roi(padded.rect())
            .map_err(|err| extraction_error(err.to_string()))?;

        let _span = trace_span!(
            "region",
            name = &*region.name,
            width = roi.width(),
            height = roi.height()
        )
        .entered();

        let threshold = self.config.region_threshold(region);
        let candidates: Vec<Candidate> = self
            .collect_candidates(roi, &padded, threshold)
            .into_iter()
            .map(|candidate| Candidate {
                location: roi_to_region(candidate.location, &padded, region.rect),
                ..candidate
            })
            .collect();
        let raw_candidates = candidates.len();
        trace_event!(
            "region_candidates",
            region = &*region.name,
            count = raw_candidates
        );

        let kept = resolve(candidates, &self.config.overlap_params(), claimed);
        let mut detections = Vec::with_capacity(kept.len());
        for candidate in kept {
            let global = region_to_global(candidate.location, region.rect);
            // Centred in the padding: dropped, but the identity stays claimed.
            if !region.rect.contains(global) {
                continue;
            }
            detections.push(
                Candidate {
                    location: global,
                    ..candidate
                }
                .into_detection(region.name.clone()),
            );
        }

        trace_event!(
            "region_resolved",
            region = &*region.name,
            kept = detections.len()
        );
        Ok((detections, raw_candidates))
    }

    /// Runs every template x scale scan over `roi`, in template order then
    /// ascending scale, and concatenates the hits in that order.
    fn collect_candidates(
        &self,
        roi: ImageView<'_>,
        padded: &PaddedRegion,
        threshold: f32,
    ) -> Vec<Candidate> {
        let roi_size = (padded.rect().width, padded.rect().height);
        let jobs: Vec<(&Template, f32)> = self
            .templates
            .iter()
            .filter_map(|template| {
                ScalePlan::new(template.size(), roi_size).map(|plan| (template, plan))
            })
            .flat_map(|(template, plan)| {
                plan.scales()
                    .iter()
                    .map(move |&scale| (template, scale))
                    .collect::<Vec<_>>()
            })
            .collect();

        let params = MatchParams {
            threshold,
            min_size: self.config.min_icon_size,
            parallel: self.config.parallel,
        };
        let run = |&(template, scale): &(&Template, f32)| -> Vec<Candidate> {
            match match_template_in_region(roi, template, scale, params) {
                Ok(candidates) => candidates,
                Err(err) => {
                    let reason = err.to_string();
                    trace_warn!(
                        "match_failed",
                        identity = template.identity(),
                        scale = scale,
                        reason = reason.as_str()
                    );
                    Vec::new()
                }
            }
        };

        #[cfg(feature = "rayon")]
        if self.config.parallel {
            let per_job: Vec<Vec<Candidate>> = jobs.par_iter().map(run).collect();
            return per_job.into_iter().flatten().collect();
        }

        jobs.iter().flat_map(run).collect()
    }
}
