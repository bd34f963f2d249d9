//! Icon templates and their correlation plans.

use crate::image::io::decode_gray;
use crate::image::ImageView;
use crate::util::{PickScanError, PickScanResult};
use ::image::GrayImage;
use std::sync::Arc;

mod plan;

pub use plan::TemplatePlan;

/// Reference bitmap for one known icon identity, stored as luma.
#[derive(Clone, Debug)]
pub struct Template {
    identity: u32,
    display_name: Arc<str>,
    pixels: GrayImage,
}

impl Template {
    /// Creates a template from an already decoded luma buffer.
    pub fn new(
        identity: u32,
        display_name: impl Into<Arc<str>>,
        pixels: GrayImage,
    ) -> PickScanResult<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(PickScanError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        Ok(Self {
            identity,
            display_name: display_name.into(),
            pixels,
        })
    }

    /// Decodes encoded icon bytes (any supported format) into a template.
    pub fn from_encoded(
        identity: u32,
        display_name: impl Into<Arc<str>>,
        bytes: &[u8],
    ) -> PickScanResult<Self> {
        Self::new(identity, display_name, decode_gray(bytes)?)
    }

    pub fn identity(&self) -> u32 {
        self.identity
    }

    pub fn display_name(&self) -> &Arc<str> {
        &self.display_name
    }

    /// Native `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> PickScanResult<ImageView<'_>> {
        ImageView::from_gray(&self.pixels)
    }
}
