//! Rectangle and coordinate helpers shared by the matcher and the resolver.
//!
//! Three coordinate frames appear in the pipeline:
//!
//! - ROI space: pixel offsets inside the padded region handed to the kernel.
//! - Region space: offsets relative to the unpadded region origin. Points in
//!   the padding have negative components here.
//! - Image space: absolute pixel coordinates in the screenshot.
//!
//! Integer rectangles describe pixel areas; match locations are `f32` points
//! because a match centre sits half a template away from the score cell.

/// Axis-aligned pixel rectangle in image space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true when `p` lies inside the rectangle, edges included.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x as f32
            && p.x <= self.right() as f32
            && p.y >= self.y as f32
            && p.y <= self.bottom() as f32
    }
}

/// Point in one of the pipeline frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Floating-point box used for overlap tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxF {
    /// Square box of side `size` centred on `center`.
    pub fn centered(center: Point, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            x: center.x - half,
            y: center.y - half,
            width: size,
            height: size,
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Region expanded by a margin and clamped to the image.
///
/// Only used to cut the matching ROI; output coordinates are always expressed
/// against the original region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddedRegion {
    rect: PixelRect,
}

impl PaddedRegion {
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// True when the clamped rectangle has no pixels (region outside image).
    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }
}

/// Intersection over union of two boxes in the same frame.
///
/// Returns 0 when the boxes do not overlap, including boxes that only touch.
pub fn intersection_over_union(a: BoxF, b: BoxF) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);
    if x2 <= x1 || y2 <= y1 {
        return 0.0;
    }

    let intersection = (x2 - x1) * (y2 - y1);
    let union = a.area() + b.area() - intersection;
    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Expands `region` by `margin` on every side, clamped to the image.
///
/// The left/top edge is clamped at zero and the right/bottom edge at the image
/// size, so the width shrinks by whatever the clamps removed on either side.
pub fn padded_bounds(
    region: PixelRect,
    image_width: usize,
    image_height: usize,
    margin: usize,
) -> PaddedRegion {
    let x0 = region.x.saturating_sub(margin);
    let y0 = region.y.saturating_sub(margin);
    let x1 = region
        .right()
        .saturating_add(margin)
        .min(image_width);
    let y1 = region
        .bottom()
        .saturating_add(margin)
        .min(image_height);
    PaddedRegion {
        rect: PixelRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0)),
    }
}

/// Moves a point from ROI space into region space.
pub fn roi_to_region(p: Point, padded: &PaddedRegion, original: PixelRect) -> Point {
    let pad = padded.rect();
    Point::new(
        p.x + (pad.x as f32 - original.x as f32),
        p.y + (pad.y as f32 - original.y as f32),
    )
}

/// Moves a point from region space into image space.
pub fn region_to_global(p: Point, original: PixelRect) -> Point {
    Point::new(p.x + original.x as f32, p.y + original.y as f32)
}

/// Moves a point from image space into region space.
pub fn global_to_region(p: Point, original: PixelRect) -> Point {
    Point::new(p.x - original.x as f32, p.y - original.y as f32)
}

/// Moves a point from region space into ROI space.
pub fn region_to_roi(p: Point, padded: &PaddedRegion, original: PixelRect) -> Point {
    let pad = padded.rect();
    Point::new(
        p.x - (pad.x as f32 - original.x as f32),
        p.y - (pad.y as f32 - original.y as f32),
    )
}

/// Maps a point found inside the padded ROI to image space.
pub fn to_global(local: Point, padded: &PaddedRegion, original: PixelRect) -> Point {
    region_to_global(roi_to_region(local, padded, original), original)
}

/// Inverse of [`to_global`].
pub fn to_local(global: Point, padded: &PaddedRegion, original: PixelRect) -> Point {
    region_to_roi(global_to_region(global, original), padded, original)
}
