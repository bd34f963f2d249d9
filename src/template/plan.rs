//! Template plan precomputation for normalized correlation.

use crate::image::ImageView;
use crate::util::{PickScanError, PickScanResult};

/// Zero-mean template buffer and its energy.
///
/// With `t' = t - mean(t)` the correlation at a placement is
/// `sum(t' * i) / sqrt(var_t * var_i)`, where `var_t = sum(t'^2)` and
/// `var_i = sum(i^2) - sum(i)^2 / n` over the window. Because `sum(t') = 0`
/// the image mean never has to be subtracted from the dot product.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    var_t: f32,
    t_prime: Vec<f32>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_>) -> PickScanResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(PickScanError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or(PickScanError::BufferTooSmall {
                needed: count,
                got: y * width,
            })?;
            sum += row.iter().map(|&v| v as f64).sum::<f64>();
        }
        let mean = sum / count as f64;

        let mut var_t = 0.0f64;
        let mut t_prime = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or(PickScanError::BufferTooSmall {
                needed: count,
                got: y * width,
            })?;
            for &value in row {
                let centered = value as f64 - mean;
                var_t += centered * centered;
                t_prime.push(centered as f32);
            }
        }

        if var_t / count as f64 <= 1e-8 {
            return Err(PickScanError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            var_t: var_t as f32,
            t_prime,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `sum(t'^2)`.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }
}
