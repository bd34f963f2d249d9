use clap::Parser;
use pickscan::{
    run_image, DebugOutput, Detector, DetectorConfig, FontArc, ResultSink, TemplateSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod store;
mod templates;

use config::Config;
use store::{BatchRecord, FileDebugSink, JsonResultSink};
use templates::{guide_images, DirTemplateSource};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));
/// DejaVu Sans Mono, used for debug labels unless `debug.font_path` is set.
const DEFAULT_FONT: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/DejaVuSansMono.ttf"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Detect icons in draft screenshots (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

fn collect_image_paths(config: &Config) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths: Vec<PathBuf> = config.image_paths.iter().map(PathBuf::from).collect();
    if let Some(dir) = &config.guide_dir {
        paths.extend(guide_images(Path::new(dir))?);
    }
    Ok(paths)
}

fn load_font(path: &str) -> Option<FontArc> {
    let font = fs::read(path)
        .map_err(|err| err.to_string())
        .and_then(|bytes| FontArc::try_from_vec(bytes).map_err(|err| err.to_string()));
    match font {
        Ok(font) => Some(font),
        Err(err) => {
            warn!(path, error = %err, "font could not be loaded, using the bundled one");
            None
        }
    }
}

/// Label font: the configured one when it loads, otherwise the bundled font.
fn label_font(path: Option<&str>) -> Option<FontArc> {
    if let Some(font) = path.and_then(load_font) {
        return Some(font);
    }
    match FontArc::try_from_slice(DEFAULT_FONT) {
        Ok(font) => Some(font),
        Err(err) => {
            warn!(error = %err, "labels disabled, bundled font is invalid");
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pickscan=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.templates_dir.is_empty() {
        return Err("templates_dir must be set in the config".into());
    }
    let image_paths = collect_image_paths(&config)?;
    if image_paths.is_empty() {
        return Err("no screenshots: set image_paths or guide_dir in the config".into());
    }

    let templates = DirTemplateSource::new(&config.templates_dir).templates()?;
    let detector = Detector::new(DetectorConfig::from(config.detector), templates)?;

    let font = config
        .debug
        .as_ref()
        .and_then(|debug| label_font(debug.font_path.as_deref()));
    let mut debug_sink = config
        .debug
        .as_ref()
        .map(|debug| FileDebugSink::new(&debug.dir, debug.public_prefix.as_str()));
    let mut result_sink = config.results_path.as_ref().map(JsonResultSink::new);
    let mut records = Vec::new();

    for path in &image_paths {
        let path_str = path.to_string_lossy();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path_str, error = %err, "skipping unreadable screenshot");
                continue;
            }
        };
        let debug = debug_sink.as_mut().map(|sink| DebugOutput {
            sink,
            font: font.as_ref(),
        });
        let batch = match run_image(&detector, &bytes, &path_str, debug) {
            Ok(batch) => batch,
            Err(err) => {
                warn!(path = %path_str, error = %err, "skipping screenshot");
                continue;
            }
        };

        for report in batch.over_capacity() {
            warn!(
                region = %report.name,
                count = report.detection_count(),
                capacity = report.capacity_hint,
                "region holds more icons than expected"
            );
        }
        info!(path = %path_str, detections = batch.detections.len(), "processed screenshot");

        match result_sink.as_mut() {
            Some(sink) => sink.persist_batch(&batch)?,
            None => records.push(BatchRecord::from(&batch)),
        }
    }

    if result_sink.is_none() {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    Ok(())
}
