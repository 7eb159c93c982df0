//! Pipeline orchestrator: wires the four stages through bounded channels
//! and runs them as concurrent workers.
//!
//! No transformation logic lives here. The orchestrator computes each
//! stage's stream geometry (input length shrinks by the stage latency at
//! every hop), allocates one channel per edge of the linear chain, spawns
//! the workers, and hands the caller the external input sender and output
//! receiver. Feeding `width·height + flush_len` samples yields exactly
//! `width·height` output samples, position-aligned with the raster.
//!
//! Topology:
//!
//! ```text
//! input ─► gaussian ─► sobel ─► nms ─► hysteresis ─► output
//! ```
//!
//! Every channel capacity ≥ 1 and a chain-end consumer are enough to rule
//! out deadlock in this linear topology.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::debug;

use crate::channel::{self, StreamReceiver, StreamSender};
use crate::config::CannyParams;
use crate::image::{GrayImageU8, ImageU8, ImageView};
use crate::stages::gaussian::{self, SmoothingKernel};
use crate::stages::sobel::GradientSample;
use crate::stages::{hysteresis, nms, sobel, StageGeometry};

/// Handle for one pipeline invocation: stages live for exactly one pass.
pub struct CannyPipeline {
    params: CannyParams,
}

/// External endpoints of a running pipeline, plus the worker handles.
pub struct PipelineIo {
    /// Raw sample sender; expects `sample_count() + flush_len()` samples.
    pub input: StreamSender<u8>,
    /// Edge map receiver; yields `sample_count()` samples.
    pub output: StreamReceiver<u8>,
    workers: Vec<(&'static str, JoinHandle<Result<(), String>>)>,
}

impl CannyPipeline {
    /// Validate the parameters and prepare a pipeline for one pass.
    pub fn new(params: CannyParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CannyParams {
        &self.params
    }

    /// Start the four stage workers and return the external endpoints.
    pub fn spawn(&self) -> Result<PipelineIo, String> {
        let p = &self.params;
        let kernel = SmoothingKernel::for_size(p.kernel_size)?;

        let input_len = p.sample_count() + p.flush_len();
        let gaussian_geom = StageGeometry {
            width: p.width,
            height: p.height,
            kernel: p.kernel_size,
            input_len,
        };
        let sobel_geom = StageGeometry {
            kernel: 3,
            input_len: gaussian_geom.output_len(),
            ..gaussian_geom
        };
        let nms_geom = StageGeometry {
            input_len: sobel_geom.output_len(),
            ..sobel_geom
        };
        let hysteresis_geom = StageGeometry {
            input_len: nms_geom.output_len(),
            ..nms_geom
        };
        debug_assert_eq!(hysteresis_geom.output_len(), p.sample_count());

        let cap = p.channel_capacity;
        let (input, gaussian_rx) = channel::bounded::<u8>(cap);
        let (gaussian_tx, sobel_rx) = channel::bounded::<u8>(cap);
        let (sobel_tx, nms_rx) = channel::bounded::<GradientSample>(cap);
        let (nms_tx, hysteresis_rx) = channel::bounded::<u8>(cap);
        let (hysteresis_tx, output) = channel::bounded::<u8>(cap);

        let (low, high) = (p.low_threshold, p.high_threshold);
        let workers: Vec<(&'static str, JoinHandle<Result<(), String>>)> = vec![
            (
                "gaussian",
                thread::spawn(move || {
                    gaussian::run_stage(gaussian_geom, kernel, gaussian_rx, gaussian_tx)
                }),
            ),
            (
                "sobel",
                thread::spawn(move || sobel::run_stage(sobel_geom, sobel_rx, sobel_tx)),
            ),
            (
                "nms",
                thread::spawn(move || nms::run_stage(nms_geom, nms_rx, nms_tx)),
            ),
            (
                "hysteresis",
                thread::spawn(move || {
                    hysteresis::run_stage(hysteresis_geom, low, high, hysteresis_rx, hysteresis_tx)
                }),
            ),
        ];

        debug!(
            "spawned 4 stage workers: {} samples in, {} out, channel capacity {}",
            input_len,
            p.sample_count(),
            cap.max(1)
        );
        Ok(PipelineIo {
            input,
            output,
            workers,
        })
    }
}

impl PipelineIo {
    /// Wait for every stage worker and report every failure.
    ///
    /// One stage dying disconnects its neighbours, so several workers can
    /// fail for the same root cause; all of them are joined before judging
    /// and every failure is named in the error.
    pub fn join(self) -> Result<(), String> {
        let PipelineIo {
            input,
            output,
            workers,
        } = self;
        drop(input);
        drop(output);
        let mut failures = Vec::new();
        for (name, handle) in workers {
            match handle.join() {
                Err(_) => failures.push(format!("{name} stage panicked")),
                Ok(Err(e)) => failures.push(format!("{name} stage: {e}")),
                Ok(Ok(())) => {}
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.join("; "))
        }
    }
}

/// Run one full streaming pass over a raster.
///
/// Feeds the raster plus flush padding from a separate thread while the
/// caller's thread drains the output, so the bounded channels never
/// deadlock, and returns the edge map.
pub fn run_streaming(params: &CannyParams, input: ImageU8<'_>) -> Result<GrayImageU8, String> {
    if input.w != params.width || input.h != params.height {
        return Err(format!(
            "Raster {}x{} does not match configured {}x{}",
            input.w, input.h, params.width, params.height
        ));
    }
    let start = Instant::now();
    let pipeline = CannyPipeline::new(params.clone())?;
    let io = pipeline.spawn()?;

    let mut samples = Vec::with_capacity(params.sample_count());
    for row in input.rows() {
        samples.extend_from_slice(row);
    }
    let flush = params.flush_len();
    let feeder_tx = io.input.clone();
    let feeder: JoinHandle<Result<(), String>> = thread::spawn(move || {
        for &v in &samples {
            feeder_tx.send(v)?;
        }
        for _ in 0..flush {
            feeder_tx.send(0)?;
        }
        Ok(())
    });

    let expected = params.sample_count();
    let mut out = Vec::with_capacity(expected);
    let mut read_error = None;
    for _ in 0..expected {
        match io.output.recv() {
            Ok(v) => out.push(v),
            Err(e) => {
                read_error = Some(e);
                break;
            }
        }
    }

    let feed_result = feeder
        .join()
        .map_err(|_| "feeder thread panicked".to_string())?;
    io.join()?;
    feed_result?;
    if let Some(e) = read_error {
        return Err(e);
    }

    debug!(
        "streaming pass over {}x{} finished in {:.3} ms",
        params.width,
        params.height,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(GrayImageU8::new(params.width, params.height, out))
}
