use canny_stream::config::CannyParams;
use canny_stream::image::io::{load_grayscale_image, save_grayscale_u8};
use canny_stream::pipeline::run_streaming;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct EdgeMapToolConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Pipeline knobs. Raster dimensions always come from the decoded input
    /// image; configs naming `canny.width` or `canny.height` are rejected.
    #[serde(default)]
    pub canny: CannyParams,
}

pub fn load_config(path: &Path) -> Result<EdgeMapToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<EdgeMapToolConfig, String> {
    let value: serde_json::Value = serde_json::from_str(data).map_err(|e| e.to_string())?;
    if let Some(canny) = value.get("canny") {
        if canny.get("width").is_some() || canny.get("height").is_some() {
            return Err(
                "canny.width / canny.height are taken from the input image; remove them"
                    .to_string(),
            );
        }
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let params = config
        .canny
        .with_dimensions(gray.width(), gray.height());

    let edges = run_streaming(&params, gray.as_view())?;
    save_grayscale_u8(&edges, &config.output)?;

    let edge_pixels = edges.data().iter().filter(|&&v| v > 0).count();
    println!(
        "Saved edge map to {} ({} edge pixels of {})",
        config.output.display(),
        edge_pixels,
        params.sample_count()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: edge_map <config.json>".to_string()
}
