use canny_stream::config::CannyParams;
use canny_stream::image::io::{
    load_expected_edges, load_grayscale_image, save_grayscale_u8, write_json_file,
};
use canny_stream::verify::verify_against_golden;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Deserialize)]
pub struct VerifyToolConfig {
    /// Input image, reduced to grayscale by channel averaging.
    pub input: PathBuf,
    /// Golden edge map; red channel holds the expected values.
    pub golden: PathBuf,
    /// Where to write the computed edge map.
    pub output: PathBuf,
    /// Optional JSON report destination.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
    /// Pipeline knobs. Raster dimensions always come from the decoded input
    /// image; configs naming `canny.width` or `canny.height` are rejected.
    #[serde(default)]
    pub canny: CannyParams,
}

pub fn load_config(path: &Path) -> Result<VerifyToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<VerifyToolConfig, String> {
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

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<bool, String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let golden = load_expected_edges(&config.golden)?;
    let params = config
        .canny
        .with_dimensions(gray.width(), gray.height());

    let verification = verify_against_golden(&params, &gray, &golden)?;
    save_grayscale_u8(&verification.edges, &config.output)?;

    let report = &verification.report;
    for m in &report.mismatches {
        println!(
            "ERROR: x = {} y = {} expected = {} computed = {}",
            m.x, m.y, m.expected, m.actual
        );
    }
    println!("Result: {}", report.matching);
    if report.passed {
        println!("RESULT: PASS");
    } else {
        println!("RESULT: FAIL");
    }
    println!(
        "Saved edge map to {} ({:.3} ms total)",
        config.output.display(),
        report.timing.total_ms
    );

    if let Some(report_path) = &config.report_json {
        write_json_file(report_path, report)?;
        println!("Saved report to {}", report_path.display());
    }

    Ok(report.passed)
}

fn usage() -> String {
    "Usage: verify_canny <config.json>".to_string()
}
