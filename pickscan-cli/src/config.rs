use pickscan::{DetectorConfig, PixelRect, Region};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
struct RegionJson {
    name: String,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    capacity_hint: usize,
    threshold_multiplier: f32,
}

impl From<&Region> for RegionJson {
    fn from(region: &Region) -> Self {
        Self {
            name: region.name.to_string(),
            x: region.rect.x,
            y: region.rect.y,
            width: region.rect.width,
            height: region.rect.height,
            capacity_hint: region.capacity_hint,
            threshold_multiplier: region.threshold_multiplier,
        }
    }
}

impl From<RegionJson> for Region {
    fn from(value: RegionJson) -> Self {
        Region::new(
            value.name,
            PixelRect::new(value.x, value.y, value.width, value.height),
            value.capacity_hint,
            value.threshold_multiplier,
        )
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfigJson {
    regions: Vec<RegionJson>,
    padding: usize,
    base_threshold: f32,
    iou_threshold: f32,
    high_confidence: f32,
    min_icon_size: u32,
    overlap_box_factor: f32,
    parallel: bool,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            regions: cfg.regions.iter().map(RegionJson::from).collect(),
            padding: cfg.padding,
            base_threshold: cfg.base_threshold,
            iou_threshold: cfg.iou_threshold,
            high_confidence: cfg.high_confidence,
            min_icon_size: cfg.min_icon_size,
            overlap_box_factor: cfg.overlap_box_factor,
            parallel: cfg.parallel,
        }
    }
}

impl From<DetectorConfigJson> for DetectorConfig {
    fn from(value: DetectorConfigJson) -> Self {
        DetectorConfig {
            regions: value.regions.into_iter().map(Region::from).collect(),
            padding: value.padding,
            base_threshold: value.base_threshold,
            iou_threshold: value.iou_threshold,
            high_confidence: value.high_confidence,
            min_icon_size: value.min_icon_size,
            overlap_box_factor: value.overlap_box_factor,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugConfigJson {
    /// Directory the annotated images are written to.
    pub dir: String,
    /// Prefix of the retrieval path reported for each debug image.
    pub public_prefix: String,
    /// TTF/OTF font for detection labels; the bundled DejaVu Sans Mono without one.
    pub font_path: Option<String>,
}

impl Default for DebugConfigJson {
    fn default() -> Self {
        Self {
            dir: "debug-output".to_string(),
            public_prefix: "/debug-output".to_string(),
            font_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Screenshots to process, in order.
    pub image_paths: Vec<String>,
    /// Directory scanned for additional screenshots.
    pub guide_dir: Option<String>,
    /// Directory holding `<identity>_<name>.<ext>` icon files.
    pub templates_dir: String,
    /// JSON results file; results go to stdout when unset.
    pub results_path: Option<String>,
    pub debug: Option<DebugConfigJson>,
    pub detector: DetectorConfigJson,
}
