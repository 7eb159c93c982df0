//! Gaussian smoothing with integer-only arithmetic.
//!
//! Convolves a K×K kernel whose weights sum to the divisor, so a constant
//! raster passes through unchanged in the interior and the result always
//! fits 8 bits. Division truncates; the same truncation happens in the
//! streaming worker and the reference.

use log::debug;

use super::{run_windowed, StageGeometry};
use crate::channel::{StreamReceiver, StreamSender};
use crate::image::{GrayImageU8, ImageU8, ImageViewMut};

/// Fixed integer smoothing kernel: `size × size` weights over `divisor`.
#[derive(Clone, Copy, Debug)]
pub struct SmoothingKernel {
    pub size: usize,
    weights: &'static [u32],
    divisor: u32,
}

/// Classic Canny 5×5 kernel, weights summing to 159.
pub const GAUSSIAN_5X5: SmoothingKernel = SmoothingKernel {
    size: 5,
    weights: &[
        2, 4, 5, 4, 2, //
        4, 9, 12, 9, 4, //
        5, 12, 15, 12, 5, //
        4, 9, 12, 9, 4, //
        2, 4, 5, 4, 2,
    ],
    divisor: 159,
};

/// Binomial 3×3 kernel, weights summing to 16.
pub const GAUSSIAN_3X3: SmoothingKernel = SmoothingKernel {
    size: 3,
    weights: &[1, 2, 1, 2, 4, 2, 1, 2, 1],
    divisor: 16,
};

impl SmoothingKernel {
    /// Kernel for the configured size (3 or 5).
    pub fn for_size(size: usize) -> Result<Self, String> {
        match size {
            3 => Ok(GAUSSIAN_3X3),
            5 => Ok(GAUSSIAN_5X5),
            other => Err(format!("Unsupported kernel size {other} (expected 3 or 5)")),
        }
    }

    #[inline]
    fn weight(&self, dy: isize, dx: isize) -> u32 {
        let half = self.size as isize / 2;
        self.weights[((dy + half) * self.size as isize + (dx + half)) as usize]
    }
}

/// Smooth one sample from its K×K neighbourhood.
#[inline]
pub fn smooth_sample(kernel: &SmoothingKernel, tap: impl Fn(isize, isize) -> u8) -> u8 {
    let half = kernel.size as isize / 2;
    let mut acc = 0u32;
    for dy in -half..=half {
        for dx in -half..=half {
            acc += kernel.weight(dy, dx) * tap(dy, dx) as u32;
        }
    }
    (acc / kernel.divisor) as u8
}

/// Direct whole-image smoothing, zero padding outside the raster.
pub fn smooth_image(src: ImageU8<'_>, kernel: &SmoothingKernel) -> GrayImageU8 {
    let mut out = GrayImageU8::zeros(src.w, src.h);
    for y in 0..src.h {
        let out_row = out.row_mut(y);
        for (x, slot) in out_row.iter_mut().enumerate() {
            *slot = smooth_sample(kernel, |dy, dx| {
                src.tap_zero(x as isize + dx, y as isize + dy)
            });
        }
    }
    out
}

/// Streaming smoothing worker: raw u8 stream in, smoothed u8 stream out.
pub fn run_stage(
    geometry: StageGeometry,
    kernel: SmoothingKernel,
    rx: StreamReceiver<u8>,
    tx: StreamSender<u8>,
) -> Result<(), String> {
    debug!(
        "gaussian stage: kernel {}x{}, consuming {} samples, emitting {}",
        kernel.size,
        kernel.size,
        geometry.input_len,
        geometry.output_len()
    );
    run_windowed(geometry, rx, tx, move |win| {
        smooth_sample(&kernel, |dy, dx| win.at(dy, dx))
    })
}
