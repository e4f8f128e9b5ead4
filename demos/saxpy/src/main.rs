//! Single-precision `a * x + y` over a million elements, written once and
//! run either sequentially on the host or as a grid on the device:
//!
//! ```shell
//! cargo run -p saxpy
//! cargo run -p saxpy --features accelerator
//! ```

#![deny(clippy::pedantic)]

use std::sync::atomic::{AtomicU32, Ordering};

use hemi::{
    check::check_async_errors,
    device::{grid_stride, Dim3, Thread},
    kernel::StreamId,
    mode::LOCATION,
    runtime::RuntimeResult,
};

const N: usize = 1 << 20;
const BLOCK_THREADS: u32 = 256;

/// Computes `y[i] = a * x[i] + y[i]`, with `y` holding `f32` bit patterns.
#[hemi::kernel]
fn saxpy(thread: &Thread, a: f32, x: &[f32], y: &[AtomicU32]) {
    for i in grid_stride(thread, y.len()) {
        let yi = f32::from_bits(y[i].load(Ordering::Relaxed));

        y[i].store(a.mul_add(x[i], yi).to_bits(), Ordering::Relaxed);
    }
}

#[expect(clippy::cast_precision_loss)]
fn main() -> RuntimeResult {
    tracing_subscriber::fmt().init();

    let a = 2.0_f32;
    let x = (0..N).map(|i| i as f32).collect::<Vec<_>>();
    let y = (0..N)
        .map(|_| AtomicU32::new(1.0_f32.to_bits()))
        .collect::<Vec<_>>();

    let blocks = u32::try_from(N.div_ceil(BLOCK_THREADS as usize)).unwrap_or(u32::MAX);

    tracing::info!(location = LOCATION, n = N, blocks, "launching saxpy");

    hemi::launch!(
        saxpy,
        Dim3::linear(blocks),
        Dim3::linear(BLOCK_THREADS),
        0,
        StreamId::DEFAULT,
        a,
        x.as_slice(),
        y.as_slice(),
    );

    check_async_errors()?;

    let mismatches = y
        .iter()
        .enumerate()
        .filter(|(i, yi)| {
            let expected = a.mul_add(*i as f32, 1.0);

            yi.load(Ordering::Relaxed) != expected.to_bits()
        })
        .count();

    if mismatches == 0 {
        tracing::info!("saxpy verified");
    } else {
        tracing::error!(mismatches, "saxpy produced wrong results");
    }

    Ok(())
}
