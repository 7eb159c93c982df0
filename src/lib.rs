#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod channel;
pub mod config;
pub mod image;
pub mod pipeline;
pub mod reference;
pub mod verify;

// Stage internals – public for tools and tests, but considered unstable.
pub mod stages;

// --- High-level re-exports -------------------------------------------------

// Main entry points: params + the two implementations.
pub use crate::config::CannyParams;
pub use crate::image::{GrayImageU8, ImageU8};
pub use crate::pipeline::{run_streaming, CannyPipeline, PipelineIo};
pub use crate::reference::{canny_reference, ReferenceOutputs};

// Verification harness output.
pub use crate::verify::{verify_against_golden, Verification, VerificationReport};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use canny_stream::prelude::*;
///
/// # fn main() -> Result<(), String> {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let params = CannyParams::for_dimensions(w, h);
/// let edges = run_streaming(&params, img)?;
/// println!("edge pixels: {}", edges.data().iter().filter(|&&v| v > 0).count());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::config::CannyParams;
    pub use crate::image::{GrayImageU8, ImageU8};
    pub use crate::pipeline::run_streaming;
    pub use crate::reference::canny_reference;
}
