//! Single template x scale search inside a region of interest.

use crate::candidate::Candidate;
use crate::geometry::Point;
use crate::image::resize::{resize_gray, scaled_size};
use crate::image::ImageView;
use crate::kernel::score_map;
use crate::template::{Template, TemplatePlan};
use crate::util::{PickScanError, PickScanResult};

/// Acceptance and execution settings for one region scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchParams {
    /// Minimum score a cell needs to become a candidate.
    pub threshold: f32,
    /// Smallest resized template side worth scanning.
    pub min_size: u32,
    /// Split score rows across the rayon pool (needs the `rayon` feature).
    pub parallel: bool,
}

impl MatchParams {
    pub fn new(threshold: f32, min_size: u32) -> Self {
        Self {
            threshold,
            min_size,
            parallel: false,
        }
    }
}

/// Matches `template` resized by `scale` against a luma ROI.
///
/// Returns one candidate per score cell at or above `params.threshold`,
/// located at the centre of the match box in ROI coordinates. A scale whose
/// resized template is smaller than `params.min_size` on either side yields
/// no candidates. Any other failure is reported as
/// [`PickScanError::Matching`].
pub fn match_template_in_region(
    roi: ImageView<'_>,
    template: &Template,
    scale: f32,
    params: MatchParams,
) -> PickScanResult<Vec<Candidate>> {
    let identity = template.identity();
    let matching_error = |reason: String| PickScanError::Matching {
        identity,
        scale,
        reason,
    };

    if !(scale.is_finite() && scale > 0.0) {
        return Err(matching_error("scale must be positive".to_string()));
    }

    let (tpl_w, tpl_h) = template.size();
    let (new_w, new_h) = scaled_size(tpl_w, tpl_h, scale);
    if new_w < params.min_size || new_h < params.min_size {
        return Ok(Vec::new());
    }

    let resized = resize_gray(template.pixels(), new_w, new_h);
    let resized_view =
        ImageView::from_gray(&resized).map_err(|err| matching_error(err.to_string()))?;
    let plan = TemplatePlan::from_view(resized_view).map_err(|err| matching_error(err.to_string()))?;
    let scores =
        score_map(roi, &plan, params.parallel).map_err(|err| matching_error(err.to_string()))?;

    let half_w = new_w as f32 / 2.0;
    let half_h = new_h as f32 / 2.0;
    let candidates = scores
        .cells_at_or_above(params.threshold)
        .map(|(x, y, score)| Candidate {
            identity,
            display_name: template.display_name().clone(),
            confidence: score,
            location: Point::new(x as f32 + half_w, y as f32 + half_h),
            scale,
        })
        .collect();
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::{match_template_in_region, MatchParams};
    use crate::image::ImageView;
    use crate::template::Template;
    use crate::util::PickScanError;
    use ::image::{GrayImage, Luma};

    fn textured(width: u32, height: u32, seed: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(73) ^ y.wrapping_mul(151) ^ (x * y).wrapping_add(seed)) & 0xFF;
            Luma([v as u8])
        })
    }

    fn roi_with_icon(icon: &GrayImage, at: (u32, u32)) -> GrayImage {
        let mut roi = GrayImage::from_pixel(60, 40, Luma([90]));
        ::image::imageops::replace(&mut roi, icon, at.0 as i64, at.1 as i64);
        roi
    }

    #[test]
    fn native_scale_hit_is_centred_on_icon() {
        let icon = textured(16, 12, 5);
        let roi = roi_with_icon(&icon, (20, 10));
        let template = Template::new(3, "Shelly", icon).unwrap();
        let view = ImageView::from_gray(&roi).unwrap();

        let candidates =
            match_template_in_region(view, &template, 1.0, MatchParams::new(0.95, 8)).unwrap();
        let best = candidates
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .unwrap();
        assert_eq!(best.identity, 3);
        assert_eq!(best.display_name.as_ref(), "Shelly");
        assert!(best.confidence > 0.99 && best.confidence <= 1.0);
        assert_eq!((best.location.x, best.location.y), (28.0, 16.0));
        assert_eq!(best.scale, 1.0);
    }

    #[test]
    fn scale_below_minimum_size_is_skipped() {
        let icon = textured(16, 16, 9);
        let roi = roi_with_icon(&icon, (4, 4));
        let template = Template::new(1, "Colt", icon).unwrap();
        let view = ImageView::from_gray(&roi).unwrap();

        let candidates =
            match_template_in_region(view, &template, 0.5, MatchParams::new(0.1, 12)).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn template_larger_than_roi_is_a_matching_failure() {
        let template = Template::new(8, "Bull", textured(30, 30, 1)).unwrap();
        let roi = GrayImage::from_fn(40, 20, |x, y| Luma([((x * 7 + y * 3) & 0xFF) as u8]));
        let view = ImageView::from_gray(&roi).unwrap();

        let err =
            match_template_in_region(view, &template, 1.0, MatchParams::new(0.5, 4)).unwrap_err();
        assert!(matches!(err, PickScanError::Matching { identity: 8, .. }));
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let template = Template::new(2, "Jessie", textured(10, 10, 3)).unwrap();
        let roi = textured(30, 30, 4);
        let view = ImageView::from_gray(&roi).unwrap();
        let params = MatchParams::new(0.5, 1);
        assert!(match_template_in_region(view, &template, 0.0, params).is_err());
    }
}
