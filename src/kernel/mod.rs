//! Normalized cross-correlation kernels.
//!
//! Kernels produce a dense [`ScoreMap`] with one cell per valid top-left
//! placement of the template: `(img_w - tpl_w + 1) x (img_h - tpl_h + 1)`.
//! Scores follow the zero-mean normalized correlation definition and lie in
//! `[-1, 1]`; windows with no intensity variance score 0.
//!
//! With the `rayon` feature score rows can be split across the thread pool,
//! and with `simd` the per-row dot product runs eight lanes at a time.

#[cfg(feature = "rayon")]
mod rayon;
mod scalar;

#[cfg(feature = "rayon")]
pub use self::rayon::zncc_score_map_par;
pub use scalar::zncc_score_map;

use crate::image::ImageView;
use crate::template::TemplatePlan;
use crate::util::PickScanResult;

/// Computes the score surface, row-parallel when `parallel` is set and the
/// `rayon` feature is enabled.
pub fn score_map(
    image: ImageView<'_>,
    tpl: &TemplatePlan,
    parallel: bool,
) -> PickScanResult<ScoreMap> {
    #[cfg(feature = "rayon")]
    if parallel {
        return zncc_score_map_par(image, tpl);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;
    zncc_score_map(image, tpl)
}

/// Minimum window energy below which a placement is treated as flat.
pub const MIN_VAR_I: f32 = 1e-6;

/// Dense 2D correlation surface in row-major order.
#[derive(Clone, Debug)]
pub struct ScoreMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ScoreMap {
    pub(crate) fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the score at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Iterates `(x, y, score)` for cells scoring at least `threshold`, in
    /// row-major order.
    pub fn cells_at_or_above(&self, threshold: f32) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .filter(move |(_, &score)| score >= threshold)
            .map(move |(idx, &score)| (idx % width, idx / width, score))
    }
}
