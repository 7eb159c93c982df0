//! I/O helpers for the harness: BMP/PNG decode, grayscale reduction, JSON.
//!
//! - `load_grayscale_image`: decode an image and reduce RGB to 8-bit gray
//!   with the unweighted `(r + g + b) / 3` average, integer-truncated.
//! - `load_expected_edges`: decode the golden edge map, taking the red
//!   channel as the expected value.
//! - `save_grayscale_u8`: write an owned gray buffer back to disk.
//! - `write_json_file`: pretty-print a serializable value to disk.

use super::{GrayImageU8, ImageView};
use image::{DynamicImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image and reduce it to 8-bit grayscale.
///
/// Color inputs are averaged channel-wise, matching the reduction the golden
/// outputs were produced with. Weighted luma would shift every sample and
/// break the golden comparison.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .pixels()
        .map(|p| {
            let sum = p.0[0] as u16 + p.0[1] as u16 + p.0[2] as u16;
            (sum / 3) as u8
        })
        .collect();
    Ok(GrayImageU8::new(width, height, data))
}

/// Load a golden edge map, reading the red channel of each pixel.
pub fn load_expected_edges(path: &Path) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.pixels().map(|p| p.0[0]).collect();
    Ok(GrayImageU8::new(width, height, data))
}

/// Save an 8-bit grayscale buffer; the format follows the file extension.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut data = Vec::with_capacity(buffer.width() * buffer.height());
    for row in buffer.as_view().rows() {
        data.extend_from_slice(row);
    }
    let image: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.width() as u32, buffer.height() as u32, data)
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageLuma8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
