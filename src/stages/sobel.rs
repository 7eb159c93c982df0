//! Sobel gradient stage: 3×3 derivative pair, integer magnitude and a
//! 4-bin quantized direction.
//!
//! The magnitude policy is `|gx| + |gy|`, at most 2040 for 8-bit input, so
//! it travels between stages in a `u16` field instead of being renormalized
//! to 8 bits. The direction is quantized here, from the same `gx`/`gy` the
//! magnitude came from, and carried alongside so the suppression stage never
//! has to re-derive it.

use log::debug;

use super::{run_windowed, StageGeometry};
use crate::channel::{StreamReceiver, StreamSender};
use crate::image::ImageU8;

const SOBEL_KERNEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_KERNEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

// tan(22.5°) ≈ 0.4142, as the integer ratio 414/1000.
const TAN_22_5_NUM: i32 = 414;
const TAN_22_5_DEN: i32 = 1000;

/// Gradient direction quantized to 4 bins (π-periodic).
///
/// Each bin names the pair of neighbours the suppression stage compares
/// against, i.e. the two samples along the gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Gradient mostly along x: neighbours (0, −1) and (0, +1).
    #[default]
    Horizontal,
    /// Gradient mostly along y: neighbours (−1, 0) and (+1, 0).
    Vertical,
    /// `gx` and `gy` share a sign: neighbours (−1, +1) and (+1, −1).
    DiagonalRising,
    /// Opposite signs: neighbours (−1, −1) and (+1, +1).
    DiagonalFalling,
}

impl Direction {
    /// The two (dy, dx) offsets along the quantized gradient.
    #[inline]
    pub fn neighbor_offsets(self) -> [(isize, isize); 2] {
        match self {
            Direction::Horizontal => [(0, -1), (0, 1)],
            Direction::Vertical => [(-1, 0), (1, 0)],
            Direction::DiagonalRising => [(-1, 1), (1, -1)],
            Direction::DiagonalFalling => [(-1, -1), (1, 1)],
        }
    }
}

/// Quantize the continuous gradient into one of the four bins.
///
/// A component within tan 22.5° of an axis snaps to that axis; otherwise
/// the sign pattern picks the diagonal.
#[inline]
pub fn quantize_direction(gx: i32, gy: i32) -> Direction {
    let ax = gx.abs();
    let ay = gy.abs();
    let same_sign = (gx >= 0 && gy >= 0) || (gx <= 0 && gy <= 0);

    if ax >= ay {
        if ay * TAN_22_5_DEN <= ax * TAN_22_5_NUM {
            Direction::Horizontal
        } else if same_sign {
            Direction::DiagonalRising
        } else {
            Direction::DiagonalFalling
        }
    } else if ax * TAN_22_5_DEN <= ay * TAN_22_5_NUM {
        Direction::Vertical
    } else if same_sign {
        Direction::DiagonalRising
    } else {
        Direction::DiagonalFalling
    }
}

/// One sample of the gradient stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GradientSample {
    /// `|gx| + |gy|`, at most 2040.
    pub mag: u16,
    /// Quantized direction of (gx, gy).
    pub dir: Direction,
}

/// Compute one gradient sample from a 3×3 neighbourhood.
#[inline]
pub fn gradient_sample(tap: impl Fn(isize, isize) -> u8) -> GradientSample {
    let mut gx = 0i32;
    let mut gy = 0i32;
    for (ky, (kx_row, ky_row)) in SOBEL_KERNEL_X.iter().zip(&SOBEL_KERNEL_Y).enumerate() {
        for kx in 0..3 {
            let v = tap(ky as isize - 1, kx as isize - 1) as i32;
            gx += kx_row[kx] * v;
            gy += ky_row[kx] * v;
        }
    }
    GradientSample {
        mag: (gx.abs() + gy.abs()) as u16,
        dir: quantize_direction(gx, gy),
    }
}

/// Owned gradient raster produced by the direct implementation.
#[derive(Clone, Debug)]
pub struct GradientMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<GradientSample>,
}

impl GradientMap {
    pub fn zeros(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![GradientSample::default(); w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> GradientSample {
        self.data[y * self.w + x]
    }

    /// Zero-padded tap, mirroring the streaming window policy.
    #[inline]
    pub fn tap_zero(&self, x: isize, y: isize) -> GradientSample {
        if x < 0 || y < 0 || x >= self.w as isize || y >= self.h as isize {
            GradientSample::default()
        } else {
            self.get(x as usize, y as usize)
        }
    }
}

/// Direct whole-image gradient, zero padding outside the raster.
pub fn gradient_image(src: ImageU8<'_>) -> GradientMap {
    let mut out = GradientMap::zeros(src.w, src.h);
    for y in 0..src.h {
        for x in 0..src.w {
            out.data[y * src.w + x] = gradient_sample(|dy, dx| {
                src.tap_zero(x as isize + dx, y as isize + dy)
            });
        }
    }
    out
}

/// Streaming gradient worker: smoothed u8 stream in, gradient stream out.
pub fn run_stage(
    geometry: StageGeometry,
    rx: StreamReceiver<u8>,
    tx: StreamSender<GradientSample>,
) -> Result<(), String> {
    debug!(
        "sobel stage: consuming {} samples, emitting {}",
        geometry.input_len,
        geometry.output_len()
    );
    run_windowed(geometry, rx, tx, |win| {
        gradient_sample(|dy, dx| win.at(dy, dx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;

    #[test]
    fn vertical_step_has_horizontal_gradient_at_the_edge() {
        // Left half 0, right half 200.
        let w = 10usize;
        let h = 6usize;
        let mut img = GrayImageU8::zeros(w, h);
        for y in 0..h {
            for x in 5..w {
                img.set(x, y, 200);
            }
        }
        let grad = gradient_image(img.as_view());

        let edge = grad.get(5, 3);
        assert_eq!(edge.dir, Direction::Horizontal);
        // gx = sum of [1,2,1] over the 200-column minus zeros = 800.
        assert_eq!(edge.mag, 800);

        // Flat interior regions have zero response.
        assert_eq!(grad.get(2, 3).mag, 0);
        assert_eq!(grad.get(8, 3).mag, 0);
    }

    #[test]
    fn direction_quantization_covers_the_four_bins() {
        assert_eq!(quantize_direction(100, 0), Direction::Horizontal);
        assert_eq!(quantize_direction(100, 30), Direction::Horizontal);
        assert_eq!(quantize_direction(0, 100), Direction::Vertical);
        assert_eq!(quantize_direction(-30, 100), Direction::Vertical);
        assert_eq!(quantize_direction(100, 100), Direction::DiagonalRising);
        assert_eq!(quantize_direction(-100, -100), Direction::DiagonalRising);
        assert_eq!(quantize_direction(100, -100), Direction::DiagonalFalling);
        assert_eq!(quantize_direction(-100, 100), Direction::DiagonalFalling);
        // Zero gradient defaults to the horizontal bin.
        assert_eq!(quantize_direction(0, 0), Direction::Horizontal);
    }

    #[test]
    fn magnitude_never_exceeds_the_u16_policy_bound() {
        // Worst case: checker of 0/255 maximizing both derivatives.
        let sample = gradient_sample(|dy, dx| if (dy + dx) % 2 == 0 { 0 } else { 255 });
        assert!(sample.mag <= 2040);
    }
}
