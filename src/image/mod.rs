//! Borrowed luma views and the buffer helpers around them.
//!
//! Screenshots and templates are owned by `image` crate buffers
//! (`GrayImage`, `RgbImage`) and freed when their owner drops. Matching only
//! ever reads pixels, so the pipeline passes [`ImageView`]s: a slice plus
//! width, height and row stride. Cutting a region out of a screenshot keeps
//! the parent's stride and borrows the same slice, no pixels are copied.

use crate::geometry::PixelRect;
use crate::util::{PickScanError, PickScanResult};
use ::image::GrayImage;

pub mod io;
pub mod resize;

/// Read-only 8-bit luma view with an explicit row stride.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    pixels: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Views tightly packed rows (`stride == width`).
    pub fn from_slice(pixels: &'a [u8], width: usize, height: usize) -> PickScanResult<Self> {
        Self::new(pixels, width, height, width)
    }

    /// Views rows that start `stride` bytes apart.
    pub fn new(pixels: &'a [u8], width: usize, height: usize, stride: usize) -> PickScanResult<Self> {
        if width == 0 || height == 0 {
            return Err(PickScanError::InvalidDimensions { width, height });
        }
        if stride < width {
            return Err(PickScanError::InvalidStride { width, stride });
        }
        // The last row only needs `width` bytes, not a full stride.
        let needed = (height - 1)
            .checked_mul(stride)
            .and_then(|len| len.checked_add(width))
            .ok_or(PickScanError::InvalidDimensions { width, height })?;
        if pixels.len() < needed {
            return Err(PickScanError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// Views a decoded luma buffer.
    pub fn from_gray(img: &'a GrayImage) -> PickScanResult<Self> {
        Self::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel at `(x, y)`, or `None` outside the view.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        self.row(y)?.get(x).copied()
    }

    /// The `width` pixels of row `y`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.pixels.get(start..start + self.width)
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let view = *self;
        (0..view.height).filter_map(move |y| view.row(y))
    }

    /// Sub-view covering `rect`, sharing this view's buffer and stride.
    pub fn roi(&self, rect: PixelRect) -> PickScanResult<ImageView<'a>> {
        if rect.is_empty() {
            return Err(PickScanError::InvalidDimensions {
                width: rect.width,
                height: rect.height,
            });
        }
        let fits = rect.x.checked_add(rect.width).is_some_and(|r| r <= self.width)
            && rect.y.checked_add(rect.height).is_some_and(|b| b <= self.height);
        if !fits {
            return Err(PickScanError::RoiOutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                img_width: self.width,
                img_height: self.height,
            });
        }
        let offset = rect.y * self.stride + rect.x;
        ImageView::new(&self.pixels[offset..], rect.width, rect.height, self.stride)
    }
}

#[cfg(test)]
mod tests {
    use super::ImageView;
    use crate::geometry::PixelRect;

    #[test]
    fn padded_rows_are_skipped() {
        // 3x2 image stored with a stride of 4.
        let data = [1u8, 2, 3, 0, 4, 5, 6];
        let view = ImageView::new(&data, 3, 2, 4).unwrap();
        assert_eq!(view.row(1).unwrap(), &[4, 5, 6]);
        assert_eq!(view.pixel(2, 1), Some(6));
        assert_eq!(view.pixel(3, 0), None);
        assert_eq!(view.rows().count(), 2);
    }

    #[test]
    fn nested_roi_reads_parent_pixels() {
        let data: Vec<u8> = (0u8..36).collect();
        let view = ImageView::from_slice(&data, 6, 6).unwrap();
        let outer = view.roi(PixelRect::new(1, 1, 4, 4)).unwrap();
        let inner = outer.roi(PixelRect::new(2, 1, 2, 2)).unwrap();
        assert_eq!(inner.stride(), 6);
        assert_eq!(inner.row(0).unwrap(), &[15, 16]);
        assert_eq!(inner.row(1).unwrap(), &[21, 22]);
        assert!(outer.roi(PixelRect::new(3, 0, 2, 1)).is_err());
    }
}
