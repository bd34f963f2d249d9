//! Scalar reference kernel for dense score surfaces.
//!
//! Window sums and sums of squares come from integral images, so only the
//! `t' * i` dot product is computed per pixel of each placement.

use crate::image::ImageView;
use crate::kernel::{ScoreMap, MIN_VAR_I};
use crate::template::TemplatePlan;
use crate::util::{PickScanError, PickScanResult};
use ::image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, integral_squared_image, sum_image_pixels};

/// Computes the full ZNCC surface of `tpl` over `image`.
///
/// Fails with `RoiOutOfBounds` when the template does not fit in the image.
pub fn zncc_score_map(image: ImageView<'_>, tpl: &TemplatePlan) -> PickScanResult<ScoreMap> {
    let (out_width, out_height) = placements(image, tpl)?;
    let sums = WindowSums::new(image)?;
    let rows: Vec<&[u8]> = image.rows().collect();

    let mut data = vec![0.0f32; out_width * out_height];
    for (y, out) in data.chunks_exact_mut(out_width).enumerate() {
        score_row(&rows, &sums, tpl, y, out);
    }
    Ok(ScoreMap::new(out_width, out_height, data))
}

/// Size of the score surface, or `RoiOutOfBounds` when `tpl` does not fit.
pub(crate) fn placements(
    image: ImageView<'_>,
    tpl: &TemplatePlan,
) -> PickScanResult<(usize, usize)> {
    let (img_width, img_height) = (image.width(), image.height());
    let (tpl_width, tpl_height) = (tpl.width(), tpl.height());
    if img_width < tpl_width || img_height < tpl_height {
        return Err(PickScanError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: tpl_width,
            height: tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width + 1, img_height - tpl_height + 1))
}

/// Integral images of a view's intensities and squared intensities.
pub(crate) struct WindowSums {
    sum: Image<Luma<u64>>,
    sum_sq: Image<Luma<u64>>,
}

impl WindowSums {
    pub(crate) fn new(image: ImageView<'_>) -> PickScanResult<Self> {
        let (width, height) = (image.width(), image.height());
        let packed: Vec<u8> = image.rows().flatten().copied().collect();
        let gray = GrayImage::from_raw(width as u32, height as u32, packed).ok_or(
            PickScanError::BufferTooSmall {
                needed: width * height,
                got: image.rows().map(<[u8]>::len).sum(),
            },
        )?;
        Ok(Self {
            sum: integral_image::<_, u64>(&gray),
            sum_sq: integral_squared_image::<_, u64>(&gray),
        })
    }

    /// Intensity variance times `n` over the `width x height` window at `(x, y)`.
    fn energy(&self, x: usize, y: usize, width: usize, height: usize) -> f32 {
        let (left, top) = (x as u32, y as u32);
        let right = (x + width - 1) as u32;
        let bottom = (y + height - 1) as u32;
        let [sum] = sum_image_pixels(&self.sum, left, top, right, bottom);
        let [sum_sq] = sum_image_pixels(&self.sum_sq, left, top, right, bottom);
        let n = (width * height) as f64;
        let sum = sum as f64;
        (sum_sq as f64 - sum * sum / n) as f32
    }
}

/// Scores every placement on score row `y` into `out`.
pub(crate) fn score_row(
    rows: &[&[u8]],
    sums: &WindowSums,
    tpl: &TemplatePlan,
    y: usize,
    out: &mut [f32],
) {
    let (tpl_width, tpl_height) = (tpl.width(), tpl.height());
    let var_t = tpl.var_t();
    let t_prime = tpl.t_prime();
    let window_rows = &rows[y..y + tpl_height];

    for (x, cell) in out.iter_mut().enumerate() {
        let var_i = sums.energy(x, y, tpl_width, tpl_height);
        if var_i <= MIN_VAR_I {
            *cell = 0.0;
            continue;
        }

        let dot: f32 = window_rows
            .iter()
            .zip(t_prime.chunks_exact(tpl_width))
            .map(|(row, tpl_row)| dot_row(tpl_row, &row[x..x + tpl_width]))
            .sum();
        let score = dot / (var_t * var_i).sqrt();
        *cell = if score.is_finite() {
            score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }
}

#[cfg(not(feature = "simd"))]
#[inline]
fn dot_row(tpl_row: &[f32], img_row: &[u8]) -> f32 {
    tpl_row
        .iter()
        .zip(img_row)
        .map(|(&t, &value)| t * value as f32)
        .sum()
}

#[cfg(feature = "simd")]
#[inline]
fn dot_row(tpl_row: &[f32], img_row: &[u8]) -> f32 {
    use wide::f32x8;

    let mut acc = f32x8::ZERO;
    let tpl_chunks = tpl_row.chunks_exact(8);
    let img_chunks = img_row.chunks_exact(8);
    let (tpl_tail, img_tail) = (tpl_chunks.remainder(), img_chunks.remainder());
    for (t, i) in tpl_chunks.zip(img_chunks) {
        let t = f32x8::from([t[0], t[1], t[2], t[3], t[4], t[5], t[6], t[7]]);
        let i = f32x8::from([
            i[0] as f32,
            i[1] as f32,
            i[2] as f32,
            i[3] as f32,
            i[4] as f32,
            i[5] as f32,
            i[6] as f32,
            i[7] as f32,
        ]);
        acc += t * i;
    }

    let tail: f32 = tpl_tail
        .iter()
        .zip(img_tail)
        .map(|(&t, &value)| t * value as f32)
        .sum();
    acc.to_array().iter().sum::<f32>() + tail
}
