use pickscan::{DebugSink, Detection, DetectionBatch, PickScanError, PickScanResult, ResultSink};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct LocationRecord {
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    identity: u32,
    display_name: String,
    confidence: f32,
    location: LocationRecord,
    scale: f32,
    region: String,
}

impl From<&Detection> for DetectionRecord {
    fn from(value: &Detection) -> Self {
        Self {
            identity: value.identity,
            display_name: value.display_name.to_string(),
            confidence: value.confidence,
            location: LocationRecord {
                x: value.location.x,
                y: value.location.y,
            },
            scale: value.scale,
            region: value.region.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegionCountRecord {
    region: String,
    count: usize,
}

/// Reduced per-image record stored in the results file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    image_path: String,
    number_of_results: usize,
    region_counts: Vec<RegionCountRecord>,
    results: Vec<DetectionRecord>,
    has_debug_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_image: Option<String>,
}

impl From<&DetectionBatch> for BatchRecord {
    fn from(batch: &DetectionBatch) -> Self {
        Self {
            image_path: batch.image_path.clone().unwrap_or_default(),
            number_of_results: batch.detections.len(),
            region_counts: batch
                .region_counts()
                .into_iter()
                .map(|(region, count)| RegionCountRecord {
                    region: region.to_string(),
                    count,
                })
                .collect(),
            results: batch.detections.iter().map(DetectionRecord::from).collect(),
            has_debug_image: batch.has_debug_image(),
            debug_image: batch.debug_image.clone(),
        }
    }
}

/// On-disk layout of the results file. Earlier records are kept verbatim.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsFile {
    last_updated: String,
    results: Vec<Value>,
}

/// Append-only JSON results file.
pub struct JsonResultSink {
    path: PathBuf,
}

impl JsonResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> ResultsFile {
        let Ok(text) = fs::read_to_string(&self.path) else {
            info!(path = %self.path.display(), "starting new results file");
            return ResultsFile::default();
        };
        match serde_json::from_str(&text) {
            Ok(existing) => existing,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "replacing invalid results file");
                ResultsFile::default()
            }
        }
    }
}

impl ResultSink for JsonResultSink {
    fn persist_batch(&mut self, batch: &DetectionBatch) -> PickScanResult<()> {
        let mut file = self.load();
        file.results
            .push(serde_json::to_value(BatchRecord::from(batch)).map_err(sink_error)?);
        file.last_updated = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(sink_error)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(sink_error)?;
        }
        let json = serde_json::to_string_pretty(&file).map_err(sink_error)?;
        fs::write(&self.path, json).map_err(sink_error)
    }
}

/// Writes debug images into a directory served under `public_prefix`.
pub struct FileDebugSink {
    dir: PathBuf,
    public_prefix: String,
}

impl FileDebugSink {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into(),
        }
    }
}

impl DebugSink for FileDebugSink {
    fn persist_debug_image(&mut self, png: &[u8], filename: &str) -> PickScanResult<String> {
        fs::create_dir_all(&self.dir).map_err(sink_error)?;
        fs::write(self.dir.join(filename), png).map_err(sink_error)?;
        Ok(format!(
            "{}/{filename}",
            self.public_prefix.trim_end_matches('/')
        ))
    }
}

fn sink_error(err: impl std::fmt::Display) -> PickScanError {
    PickScanError::Sink {
        reason: err.to_string(),
    }
}
