//! Debug visualization of regions and detections.
//!
//! Rendering is best-effort: callers treat any error as "no debug image" and
//! never let it affect the detections themselves.

use crate::candidate::Detection;
use crate::config::DetectorConfig;
use crate::geometry::{padded_bounds, PixelRect};
use crate::util::{PickScanError, PickScanResult};
use ab_glyph::{FontArc, PxScale};
use ::image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;

const REGION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const PADDED_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const MATCH_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_SCALE: f32 = 16.0;
const LABEL_GAP: i32 = 5;

/// Draws region outlines and detection boxes onto a copy of `image`.
///
/// Original regions are outlined in red, padded regions in blue and
/// detections in green. Labels of the form `Name (95%)` are drawn above each
/// box when `font` is given.
pub fn render_debug(
    image: &RgbImage,
    config: &DetectorConfig,
    detections: &[Detection],
    font: Option<&FontArc>,
) -> PickScanResult<RgbImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PickScanError::DebugRender {
            reason: "empty image".to_string(),
        });
    }

    let mut canvas = image.clone();
    for region in &config.regions {
        draw_outline(&mut canvas, region.rect, REGION_COLOR, 2);
        let padded = padded_bounds(
            region.rect,
            width as usize,
            height as usize,
            config.padding,
        );
        if !padded.is_empty() {
            draw_outline(&mut canvas, padded.rect(), PADDED_COLOR, 1);
        }
    }

    let box_size = config.debug_box_size();
    let half = box_size / 2.0;
    let side = box_size.round().max(1.0) as u32;
    for detection in detections {
        let left = (detection.location.x - half).round() as i32;
        let top = (detection.location.y - half).round() as i32;
        for inset in 0..2u32 {
            if side <= inset * 2 {
                break;
            }
            let rect = Rect::at(left + inset as i32, top + inset as i32)
                .of_size(side - inset * 2, side - inset * 2);
            draw_hollow_rect_mut(&mut canvas, rect, MATCH_COLOR);
        }

        if let Some(font) = font {
            let text = label(detection);
            let y = top - LABEL_GAP - LABEL_SCALE as i32;
            draw_text_mut(
                &mut canvas,
                MATCH_COLOR,
                left,
                y,
                PxScale::from(LABEL_SCALE),
                font,
                &text,
            );
        }
    }

    Ok(canvas)
}

/// Label drawn next to a detection: display name and rounded percentage.
pub fn label(detection: &Detection) -> String {
    format!(
        "{} ({}%)",
        detection.display_name,
        (detection.confidence * 100.0).round() as i32
    )
}

/// Derives the debug image filename from the screenshot path.
///
/// `guides/draft-01.jpg` becomes `draft-01-debug.jpg`; a name without an
/// extension gets `.png`. Everything from the last dot on counts as the
/// extension, so `.hidden` becomes `-debug.hidden`.
pub fn debug_filename(original_path: &str) -> String {
    let filename = Path::new(original_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(original_path);
    match filename.rfind('.') {
        Some(dot) => format!("{}-debug{}", &filename[..dot], &filename[dot..]),
        _ => format!("{filename}-debug.png"),
    }
}

fn draw_outline(canvas: &mut RgbImage, rect: PixelRect, color: Rgb<u8>, thickness: u32) {
    for inset in 0..thickness as usize {
        let width = rect.width.saturating_sub(inset * 2);
        let height = rect.height.saturating_sub(inset * 2);
        if width == 0 || height == 0 {
            break;
        }
        let outline = Rect::at((rect.x + inset) as i32, (rect.y + inset) as i32)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(canvas, outline, color);
    }
}

#[cfg(test)]
mod tests {
    use super::{debug_filename, label, render_debug};
    use crate::candidate::Detection;
    use crate::config::{DetectorConfig, Region};
    use crate::geometry::{PixelRect, Point};
    use ::image::{Rgb, RgbImage};

    fn detection(x: f32, y: f32) -> Detection {
        Detection {
            identity: 16000000,
            display_name: "Shelly".into(),
            confidence: 0.874,
            location: Point::new(x, y),
            scale: 1.0,
            region: "firstPick".into(),
        }
    }

    #[test]
    fn debug_filename_inserts_suffix() {
        assert_eq!(debug_filename("/guides/SpenLC/draft-01.jpg"), "draft-01-debug.jpg");
        assert_eq!(debug_filename("shot.final.png"), "shot.final-debug.png");
        assert_eq!(debug_filename("noext"), "noext-debug.png");
        assert_eq!(debug_filename("shots/.hidden"), "-debug.hidden");
    }

    #[test]
    fn label_rounds_confidence() {
        assert_eq!(label(&detection(0.0, 0.0)), "Shelly (87%)");
    }

    #[test]
    fn render_outlines_regions_and_detections() {
        let cfg = DetectorConfig {
            regions: vec![Region::new("a", PixelRect::new(20, 20, 40, 30), 2, 1.0)],
            padding: 5,
            min_icon_size: 10,
            ..DetectorConfig::default()
        };
        let image = RgbImage::from_pixel(100, 80, Rgb([0, 0, 0]));
        let out = render_debug(&image, &cfg, &[detection(70.0, 40.0)], None).unwrap();

        assert_eq!(out.dimensions(), (100, 80));
        assert_eq!(out.get_pixel(20, 20), &Rgb([255, 0, 0]));
        assert_eq!(out.get_pixel(15, 15), &Rgb([0, 0, 255]));
        // Box side 15 centred on (70, 40): left edge at x = 63 (62.5 rounded).
        assert_eq!(out.get_pixel(63, 40), &Rgb([0, 255, 0]));
        assert_eq!(image.get_pixel(20, 20), &Rgb([0, 0, 0]));
    }

    #[test]
    fn render_rejects_empty_image() {
        let cfg = DetectorConfig::default();
        assert!(render_debug(&RgbImage::new(0, 0), &cfg, &[], None).is_err());
    }
}
