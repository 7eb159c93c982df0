mod common;

use std::thread;

use common::synthetic_image::{checkerboard_u8, noise_u8};
use canny_stream::image::ImageU8;
use canny_stream::reference::canny_reference;
use canny_stream::{run_streaming, CannyParams, CannyPipeline};

fn view(w: usize, h: usize, data: &[u8]) -> ImageU8<'_> {
    ImageU8 {
        w,
        h,
        stride: w,
        data,
    }
}

#[test]
fn pipeline_is_deterministic() {
    let (w, h) = (48usize, 36usize);
    let buffer = noise_u8(w, h, 0xBADC0DE);
    let params = CannyParams::for_dimensions(w, h);

    let first = run_streaming(&params, view(w, h, &buffer)).unwrap();
    let second = run_streaming(&params, view(w, h, &buffer)).unwrap();
    assert_eq!(first.data(), second.data());
}

#[test]
fn pipeline_emits_exactly_one_raster_of_samples() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (24usize, 16usize);
    let buffer = checkerboard_u8(w, h, 4);
    let params = CannyParams::for_dimensions(w, h);

    let io = CannyPipeline::new(params.clone()).unwrap().spawn().unwrap();

    let samples: Vec<u8> = buffer.clone();
    let flush = params.flush_len();
    let tx = io.input.clone();
    let feeder = thread::spawn(move || {
        for &v in &samples {
            tx.send(v).unwrap();
        }
        for _ in 0..flush {
            tx.send(0).unwrap();
        }
    });

    let mut out = Vec::with_capacity(w * h);
    for _ in 0..w * h {
        out.push(io.output.recv().unwrap());
    }
    feeder.join().unwrap();

    // The stages have drained their contracted sample counts; nothing more
    // may ever arrive on the output channel.
    assert!(io.output.recv().is_err());
    io.join().unwrap();

    // Output sample k corresponds to raster position (k / W, k mod W).
    let reference = canny_reference(view(w, h, &buffer), &params).unwrap();
    assert_eq!(out.as_slice(), reference.edges.data());
}

#[test]
fn tiny_channel_capacity_does_not_deadlock() {
    let (w, h) = (32usize, 24usize);
    let buffer = checkerboard_u8(w, h, 8);
    let params = CannyParams {
        channel_capacity: 2,
        ..CannyParams::for_dimensions(w, h)
    };

    let streamed = run_streaming(&params, view(w, h, &buffer)).unwrap();
    let reference = canny_reference(view(w, h, &buffer), &params).unwrap();
    assert_eq!(streamed.data(), reference.edges.data());
}

#[test]
fn undrained_output_is_a_contract_violation() {
    let (w, h) = (24usize, 16usize);
    let params = CannyParams::for_dimensions(w, h);
    let io = CannyPipeline::new(params.clone()).unwrap().spawn().unwrap();

    let tx = io.input.clone();
    let feeder = thread::spawn(move || {
        for _ in 0..params.sample_count() + params.flush_len() {
            if tx.send(128).is_err() {
                break;
            }
        }
    });

    // Dropping the output receiver without reading a single sample makes
    // the hysteresis stage fail its send contract. The disconnect can
    // cascade upstream and take other stages down with it, but the joined
    // error always names hysteresis.
    let err = io.join().unwrap_err();
    assert!(err.contains("hysteresis"), "unexpected error: {err}");
    feeder.join().unwrap();
}
