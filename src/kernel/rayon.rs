//! Row-parallel score surfaces (feature-gated).
//!
//! Each score row is independent, so rows are split across the rayon pool.
//! Cells are computed exactly as in the scalar kernel, so both produce the
//! same surface bit for bit.

use crate::image::ImageView;
use crate::kernel::scalar::{placements, score_row, WindowSums};
use crate::kernel::ScoreMap;
use crate::template::TemplatePlan;
use crate::util::PickScanResult;
use rayon::prelude::*;

/// Row-parallel [`zncc_score_map`](crate::kernel::zncc_score_map).
pub fn zncc_score_map_par(image: ImageView<'_>, tpl: &TemplatePlan) -> PickScanResult<ScoreMap> {
    let (out_width, out_height) = placements(image, tpl)?;
    let sums = WindowSums::new(image)?;
    let rows: Vec<&[u8]> = image.rows().collect();

    let mut data = vec![0.0f32; out_width * out_height];
    data.par_chunks_exact_mut(out_width)
        .enumerate()
        .for_each(|(y, out)| score_row(&rows, &sums, tpl, y, out));
    Ok(ScoreMap::new(out_width, out_height, data))
}

#[cfg(test)]
mod tests {
    use super::zncc_score_map_par;
    use crate::geometry::PixelRect;
    use crate::image::ImageView;
    use crate::kernel::zncc_score_map;
    use crate::template::TemplatePlan;

    #[test]
    fn parallel_surface_equals_scalar() {
        let image: Vec<u8> = (0..64 * 48)
            .map(|i| ((i * 37 + (i / 64) * 11) % 251) as u8)
            .collect();
        let view = ImageView::from_slice(&image, 64, 48).unwrap();
        let tpl = view.roi(PixelRect::new(20, 14, 17, 13)).unwrap();
        let plan = TemplatePlan::from_view(tpl).unwrap();

        let seq = zncc_score_map(view, &plan).unwrap();
        let par = zncc_score_map_par(view, &plan).unwrap();
        assert_eq!((par.width(), par.height()), (48, 36));
        for y in 0..seq.height() {
            for x in 0..seq.width() {
                assert_eq!(seq.get(x, y), par.get(x, y), "({x}, {y})");
            }
        }
        assert!(par.get(20, 14).unwrap() > 0.999);
    }
}
