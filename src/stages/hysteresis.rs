//! Double-threshold hysteresis with local edge linking.
//!
//! Samples at or above the high threshold are strong edges (255). Samples
//! below the low threshold are discarded (0). Weak samples in between are
//! promoted only if a strong sample sits in their 3×3 neighbourhood.
//!
//! The linking window is deliberately local: the streaming stage only ever
//! sees a bounded lookback, and the direct reference applies the identical
//! rule so the two outputs agree bit-for-bit.

use log::debug;

use super::{run_windowed, StageGeometry};
use crate::channel::{StreamReceiver, StreamSender};
use crate::image::{GrayImageU8, ImageU8, ImageViewMut};

/// Output level for an edge sample.
pub const EDGE: u8 = 255;
/// Output level for a non-edge sample.
pub const NON_EDGE: u8 = 0;

/// Classify one suppressed sample from its 3×3 neighbourhood.
#[inline]
pub fn classify_sample(low: u8, high: u8, tap: impl Fn(isize, isize) -> u8) -> u8 {
    let center = tap(0, 0);
    if center >= high {
        return EDGE;
    }
    if center < low {
        return NON_EDGE;
    }
    // Weak candidate: kept only next to a strong sample.
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dy, dx) != (0, 0) && tap(dy, dx) >= high {
                return EDGE;
            }
        }
    }
    NON_EDGE
}

/// Direct whole-image hysteresis, zero padding outside the raster.
pub fn classify_image(src: ImageU8<'_>, low: u8, high: u8) -> GrayImageU8 {
    let mut out = GrayImageU8::zeros(src.w, src.h);
    for y in 0..src.h {
        let out_row = out.row_mut(y);
        for (x, slot) in out_row.iter_mut().enumerate() {
            *slot = classify_sample(low, high, |dy, dx| {
                src.tap_zero(x as isize + dx, y as isize + dy)
            });
        }
    }
    out
}

/// Streaming hysteresis worker: suppressed u8 stream in, edge map out.
pub fn run_stage(
    geometry: StageGeometry,
    low: u8,
    high: u8,
    rx: StreamReceiver<u8>,
    tx: StreamSender<u8>,
) -> Result<(), String> {
    debug!(
        "hysteresis stage: thresholds {low}/{high}, consuming {} samples, emitting {}",
        geometry.input_len,
        geometry.output_len()
    );
    run_windowed(geometry, rx, tx, move |win| {
        classify_sample(low, high, |dy, dx| win.at(dy, dx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_weak_and_discarded_samples() {
        let lone = |center: u8| {
            classify_sample(50, 100, |dy, dx| if (dy, dx) == (0, 0) { center } else { 0 })
        };
        assert_eq!(lone(100), EDGE);
        assert_eq!(lone(255), EDGE);
        assert_eq!(lone(49), NON_EDGE);
        // Weak with no strong neighbour.
        assert_eq!(lone(75), NON_EDGE);
    }

    #[test]
    fn weak_sample_is_promoted_next_to_a_strong_one() {
        let v = classify_sample(50, 100, |dy, dx| match (dy, dx) {
            (0, 0) => 75,
            (1, 1) => 120,
            _ => 0,
        });
        assert_eq!(v, EDGE);
    }

    #[test]
    fn image_classification_links_along_a_line() {
        // A strong pixel with a chain of weak ones: only the weak pixel
        // adjacent to the strong one is promoted by the local rule.
        let mut img = GrayImageU8::zeros(8, 3);
        img.set(1, 1, 150);
        img.set(2, 1, 70);
        img.set(3, 1, 70);
        let out = classify_image(img.as_view(), 50, 100);
        assert_eq!(out.get(1, 1), EDGE);
        assert_eq!(out.get(2, 1), EDGE);
        assert_eq!(out.get(3, 1), NON_EDGE);
        assert_eq!(out.get(5, 1), NON_EDGE);
    }
}
