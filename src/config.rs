//! Pipeline parameters and JSON config loading.
//!
//! The raster dimensions, smoothing kernel size, hysteresis thresholds and
//! channel capacity are all runtime parameters carried by [`CannyParams`];
//! nothing about the raster is baked in at compile time.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Combined half-widths of the three fixed 3×3 stages chained after the
/// smoother (Sobel, non-maximum suppression, hysteresis).
const FIXED_STAGES_HALF: usize = 3;

/// Parameters shared by the streaming pipeline and the direct reference.
///
/// Defaults target VGA-sized rasters with the classic 5×5 smoothing kernel;
/// the thresholds are tuned to the `|gx| + |gy|` magnitude policy of the
/// Sobel stage.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// Gaussian kernel size, 3 or 5.
    pub kernel_size: usize,
    /// Hysteresis low threshold: suppressed samples below it are discarded.
    pub low_threshold: u8,
    /// Hysteresis high threshold: samples at or above it are strong edges.
    pub high_threshold: u8,
    /// Capacity of each inter-stage channel, in samples.
    pub channel_capacity: usize,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            kernel_size: 5,
            low_threshold: 40,
            high_threshold: 90,
            channel_capacity: 512,
        }
    }
}

impl CannyParams {
    /// Default parameters for a raster of the given size.
    pub fn for_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Replace the raster dimensions, keeping every other knob.
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Number of real samples in one raster pass.
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }

    /// Half-width of the smoothing kernel window.
    pub fn gaussian_half(&self) -> usize {
        self.kernel_size / 2
    }

    /// Zero samples appended after the raster so every stage can drain.
    ///
    /// Equals the cumulative warm-up latency of the four chained stages:
    /// `(K/2 + 3)·W + (K/2 + 3)` for smoothing kernel size K. With that
    /// exact flush the pipeline emits `width * height` samples.
    pub fn flush_len(&self) -> usize {
        let half = self.gaussian_half() + FIXED_STAGES_HALF;
        half * self.width + half
    }

    /// Reject parameter combinations the stages cannot honour.
    ///
    /// The line buffers assume the raster holds at least one full kernel
    /// window in each dimension.
    pub fn validate(&self) -> Result<(), String> {
        if self.kernel_size != 3 && self.kernel_size != 5 {
            return Err(format!(
                "Unsupported kernel size {} (expected 3 or 5)",
                self.kernel_size
            ));
        }
        if self.width < self.kernel_size || self.height < self.kernel_size {
            return Err(format!(
                "Raster {}x{} is smaller than the {}x{} kernel window",
                self.width, self.height, self.kernel_size, self.kernel_size
            ));
        }
        if self.low_threshold > self.high_threshold {
            return Err(format!(
                "Low threshold {} exceeds high threshold {}",
                self.low_threshold, self.high_threshold
            ));
        }
        Ok(())
    }
}

/// Load [`CannyParams`] from a JSON file.
pub fn load_params(path: &Path) -> Result<CannyParams, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read params {}: {e}", path.display()))?;
    let params: CannyParams = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse params {}: {e}", path.display()))?;
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_matches_cumulative_latency() {
        let params = CannyParams::for_dimensions(100, 80);
        // K = 5: gaussian latency 2W+2, three 3×3 stages at W+1 each.
        assert_eq!(params.flush_len(), 5 * 100 + 5);

        let params = CannyParams {
            kernel_size: 3,
            ..CannyParams::for_dimensions(100, 80)
        };
        assert_eq!(params.flush_len(), 4 * 100 + 4);
    }

    #[test]
    fn validate_rejects_bad_combinations() {
        assert!(CannyParams::for_dimensions(640, 480).validate().is_ok());

        let tiny = CannyParams::for_dimensions(4, 4);
        assert!(tiny.validate().is_err());

        let odd_kernel = CannyParams {
            kernel_size: 7,
            ..CannyParams::default()
        };
        assert!(odd_kernel.validate().is_err());

        let inverted = CannyParams {
            low_threshold: 120,
            high_threshold: 60,
            ..CannyParams::default()
        };
        assert!(inverted.validate().is_err());
    }
}
