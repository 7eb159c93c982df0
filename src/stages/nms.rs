//! Non-maximum suppression on the gradient stream.
//!
//! A sample survives only if its magnitude is strictly greater than the
//! first neighbour along its quantized gradient direction and no smaller
//! than the second; survivors are clamped to 8 bits, everything else
//! becomes 0. The asymmetric tie-break keeps exactly one pixel of a
//! two-pixel gradient plateau, so edge candidates stay one pixel wide.

use log::debug;

use super::sobel::{GradientMap, GradientSample};
use super::{run_windowed, StageGeometry};
use crate::channel::{StreamReceiver, StreamSender};
use crate::image::{GrayImageU8, ImageViewMut};

/// Suppress one sample from its 3×3 gradient neighbourhood.
#[inline]
pub fn suppress_sample(tap: impl Fn(isize, isize) -> GradientSample) -> u8 {
    let center = tap(0, 0);
    let [(ay, ax), (by, bx)] = center.dir.neighbor_offsets();
    let n1 = tap(ay, ax).mag;
    let n2 = tap(by, bx).mag;
    if center.mag > n1 && center.mag >= n2 {
        center.mag.min(255) as u8
    } else {
        0
    }
}

/// Direct whole-image suppression, zero padding outside the raster.
pub fn suppress_image(grad: &GradientMap) -> GrayImageU8 {
    let mut out = GrayImageU8::zeros(grad.w, grad.h);
    for y in 0..grad.h {
        let out_row = out.row_mut(y);
        for (x, slot) in out_row.iter_mut().enumerate() {
            *slot = suppress_sample(|dy, dx| {
                grad.tap_zero(x as isize + dx, y as isize + dy)
            });
        }
    }
    out
}

/// Streaming suppression worker: gradient stream in, thinned u8 stream out.
pub fn run_stage(
    geometry: StageGeometry,
    rx: StreamReceiver<GradientSample>,
    tx: StreamSender<u8>,
) -> Result<(), String> {
    debug!(
        "nms stage: consuming {} samples, emitting {}",
        geometry.input_len,
        geometry.output_len()
    );
    run_windowed(geometry, rx, tx, |win| {
        suppress_sample(|dy, dx| win.at(dy, dx))
    })
}
