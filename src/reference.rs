//! Direct (non-streaming) Canny model used for cross-validation.
//!
//! Applies the four stages whole-image, in order, reusing the exact window
//! functions of the streaming workers. Never part of the deployed pipeline;
//! it exists so the harness can check the streaming output sample-for-sample.

use std::time::Instant;

use log::debug;

use crate::config::CannyParams;
use crate::image::{GrayImageU8, ImageU8};
use crate::stages::gaussian::{self, SmoothingKernel};
use crate::stages::sobel::{self, GradientMap};
use crate::stages::{hysteresis, nms};

/// Intermediate and final rasters of one reference pass.
pub struct ReferenceOutputs {
    /// Gaussian-smoothed raster.
    pub smoothed: GrayImageU8,
    /// Sobel magnitudes and quantized directions.
    pub gradient: GradientMap,
    /// Thinned edge candidates.
    pub suppressed: GrayImageU8,
    /// Final edge map (255 / 0).
    pub edges: GrayImageU8,
}

/// Run the whole-image reference over a raster.
pub fn canny_reference(gray: ImageU8<'_>, params: &CannyParams) -> Result<ReferenceOutputs, String> {
    params.validate()?;
    if gray.w != params.width || gray.h != params.height {
        return Err(format!(
            "Raster {}x{} does not match configured {}x{}",
            gray.w, gray.h, params.width, params.height
        ));
    }
    let kernel = SmoothingKernel::for_size(params.kernel_size)?;

    let start = Instant::now();
    let smoothed = gaussian::smooth_image(gray, &kernel);
    let gradient = sobel::gradient_image(smoothed.as_view());
    let suppressed = nms::suppress_image(&gradient);
    let edges = hysteresis::classify_image(
        suppressed.as_view(),
        params.low_threshold,
        params.high_threshold,
    );
    debug!(
        "reference pass over {}x{} finished in {:.3} ms",
        params.width,
        params.height,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ReferenceOutputs {
        smoothed,
        gradient,
        suppressed,
        edges,
    })
}
