//! Benchmarks for the looper engines and the full supervisor block.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 48 samples  = 1.00ms deadline (the default block)
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Engines and wobble sources on their own
//!   - scenarios/*  Control tick plus audio block, as the device runs them

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[48, 64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_looper,
    dsp::bench_filter,
    dsp::bench_modulation,
    scenarios::bench_block,
);
criterion_main!(benches);
