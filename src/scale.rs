//! Scale planning for multi-scale template search.
//!
//! Icons in the known layouts are roughly a third of a region's width or half
//! its height, whichever is smaller. The planner sweeps a narrow band around
//! that estimate instead of a full scale pyramid.

/// Multipliers applied to the base scale, in emission order.
pub const SCALE_STEPS: [f32; 5] = [0.8, 0.9, 1.0, 1.1, 1.2];

/// Ordered candidate scales for one template in one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePlan {
    base: f32,
    scales: [f32; 5],
}

impl ScalePlan {
    /// Plans scales for a template of native size `template` searched in a
    /// (padded) region of size `region`, both as `(width, height)`.
    ///
    /// Returns `None` when any dimension is zero, since no positive scale can
    /// be derived.
    pub fn new(template: (u32, u32), region: (usize, usize)) -> Option<Self> {
        let (tpl_w, tpl_h) = template;
        let (region_w, region_h) = region;
        if tpl_w == 0 || tpl_h == 0 || region_w == 0 || region_h == 0 {
            return None;
        }

        let estimated_icon = (region_w as f32 / 3.0).min(region_h as f32 / 2.0);
        let base = estimated_icon / tpl_w.max(tpl_h) as f32;
        Some(Self {
            base,
            scales: SCALE_STEPS.map(|step| base * step),
        })
    }

    /// Scale at which the template matches the estimated icon size.
    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }
}
