//! The four filter stages of the Canny pipeline.
//!
//! Each stage module carries three layers sharing one window function:
//!
//! - a pure per-window computation (`smooth_sample`, `gradient_sample`,
//!   `suppress_sample`, `classify_sample`) taking taps through a closure;
//! - a direct whole-image implementation used by the reference model;
//! - a streaming worker driving the shared computation through a
//!   [`window::LineBuffer`] fed from a stage channel.
//!
//! Because both implementations call the same window function with the same
//! zero-padding tap policy, streaming output and reference output agree
//! bit-for-bit.

pub mod gaussian;
pub mod hysteresis;
pub mod nms;
pub mod sobel;
pub mod window;

use crate::channel::{StreamReceiver, StreamSender};
use window::LineBuffer;

/// Stream geometry of one stage: raster size, kernel size and the length of
/// the stage's input stream (raster plus the flush share still upstream).
#[derive(Clone, Copy, Debug)]
pub struct StageGeometry {
    pub width: usize,
    pub height: usize,
    pub kernel: usize,
    pub input_len: usize,
}

impl StageGeometry {
    /// Kernel half-width.
    pub fn half(&self) -> usize {
        self.kernel / 2
    }

    /// Samples consumed before the first valid output can be emitted.
    pub fn latency(&self) -> usize {
        self.half() * self.width + self.half()
    }

    /// Samples this stage emits: one per input past the warm-up latency.
    pub fn output_len(&self) -> usize {
        self.input_len - self.latency()
    }
}

/// Drive one streaming stage to completion.
///
/// Consumes exactly `geometry.input_len` samples and emits exactly
/// `geometry.output_len()` samples; output stream index k is the value for
/// raster position (k / W, k mod W).
pub(crate) fn run_windowed<I, O, F>(
    geometry: StageGeometry,
    rx: StreamReceiver<I>,
    tx: StreamSender<O>,
    f: F,
) -> Result<(), String>
where
    I: Copy + Default,
    F: Fn(&window::Window<'_, I>) -> O,
{
    let latency = geometry.latency();
    let mut buffer = LineBuffer::new(geometry.width, geometry.kernel);
    for n in 0..geometry.input_len {
        let value = rx.recv()?;
        buffer.store(n, value);
        if n >= latency {
            let m = n - latency;
            let win = buffer.window(m / geometry.width, m % geometry.width, geometry.height);
            tx.send(f(&win))?;
        }
    }
    Ok(())
}
