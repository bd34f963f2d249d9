//! Greedy overlap resolution with a global identity constraint.

use crate::candidate::Candidate;
use crate::geometry::{intersection_over_union, BoxF};
use std::collections::HashSet;

/// Thresholds for [`resolve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapParams {
    /// Side of the square box placed on every candidate centre.
    pub box_size: f32,
    /// Candidates overlapping a kept one by more than this IOU are dropped.
    pub iou_threshold: f32,
    /// Candidates scoring above this are kept regardless of overlap.
    pub high_confidence: f32,
}

/// Resolves duplicate candidates of one region.
///
/// Candidates are visited by descending confidence, ties keeping emission
/// order. A candidate is skipped when its identity is already in `claimed`;
/// otherwise it is kept if it overlaps no kept candidate by more than
/// `iou_threshold`, or if its confidence exceeds `high_confidence`. Kept
/// identities are added to `claimed`.
///
/// Boxes have a fixed size so the test does not depend on the match scale.
pub fn resolve(
    mut candidates: Vec<Candidate>,
    params: &OverlapParams,
    claimed: &mut HashSet<u32>,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Candidate> = Vec::new();
    let mut kept_boxes: Vec<BoxF> = Vec::new();
    for candidate in candidates {
        if claimed.contains(&candidate.identity) {
            continue;
        }

        let candidate_box = BoxF::centered(candidate.location, params.box_size);
        let overlaps = kept_boxes
            .iter()
            .any(|&kept_box| intersection_over_union(candidate_box, kept_box) > params.iou_threshold);
        if overlaps && candidate.confidence <= params.high_confidence {
            continue;
        }

        claimed.insert(candidate.identity);
        kept_boxes.push(candidate_box);
        kept.push(candidate);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::{resolve, OverlapParams};
    use crate::candidate::Candidate;
    use crate::geometry::Point;
    use std::collections::HashSet;

    const PARAMS: OverlapParams = OverlapParams {
        box_size: 54.0,
        iou_threshold: 0.3,
        high_confidence: 0.8,
    };

    fn candidate(identity: u32, confidence: f32, x: f32, y: f32) -> Candidate {
        Candidate {
            identity,
            display_name: format!("icon-{identity}").into(),
            confidence,
            location: Point::new(x, y),
            scale: 1.0,
        }
    }

    #[test]
    fn higher_confidence_duplicate_wins() {
        // 18 px shift of a 54 px box: IOU = 36 / 72 = 0.5.
        let candidates = vec![
            candidate(7, 0.70, 118.0, 100.0),
            candidate(7, 0.95, 100.0, 100.0),
        ];
        let mut claimed = HashSet::new();
        let kept = resolve(candidates, &PARAMS, &mut claimed);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.95);
        assert!(claimed.contains(&7));
    }

    #[test]
    fn distinct_non_overlapping_identities_survive() {
        let candidates = vec![
            candidate(1, 0.7, 100.0, 100.0),
            candidate(2, 0.75, 300.0, 100.0),
        ];
        let mut claimed = HashSet::new();
        let kept = resolve(candidates, &PARAMS, &mut claimed);
        let ids: Vec<_> = kept.iter().map(|c| c.identity).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn overlapping_low_confidence_identities_keep_only_the_best() {
        let candidates = vec![
            candidate(1, 0.70, 100.0, 100.0),
            candidate(2, 0.78, 105.0, 100.0),
        ];
        let mut claimed = HashSet::new();
        let kept = resolve(candidates, &PARAMS, &mut claimed);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].identity, 2);
        assert!(!claimed.contains(&1));
    }

    #[test]
    fn high_confidence_hit_overrides_overlap() {
        let candidates = vec![
            candidate(1, 0.85, 100.0, 100.0),
            candidate(2, 0.90, 104.0, 100.0),
        ];
        let mut claimed = HashSet::new();
        let kept = resolve(candidates, &PARAMS, &mut claimed);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn globally_claimed_identity_is_discarded() {
        let mut claimed = HashSet::from([3]);
        let kept = resolve(vec![candidate(3, 0.99, 50.0, 50.0)], &PARAMS, &mut claimed);
        assert!(kept.is_empty());
    }

    #[test]
    fn ties_keep_emission_order() {
        let candidates = vec![
            candidate(4, 0.7, 100.0, 100.0),
            candidate(5, 0.7, 102.0, 100.0),
        ];
        let mut claimed = HashSet::new();
        let kept = resolve(candidates, &PARAMS, &mut claimed);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].identity, 4);
    }
}
