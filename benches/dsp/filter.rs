//! Benchmarks for the loop tone filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use drift_looper::{dsp::SVFilter, engine::ToneShaper};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = SVFilter::lowpass(48_000.0, 1_000.0);
        filter.set_resonance(0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // Cutoff rewritten every block, the way wobble drives it
        let mut filter = SVFilter::lowpass(48_000.0, 1_000.0);
        let mut buffer = input.clone();
        let mut cutoff = 1_000.0f32;
        group.bench_with_input(BenchmarkId::new("wobbling", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff > 1_040.0 { 960.0 } else { cutoff + 1.0 };
                filter.set_cutoff(black_box(cutoff));
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
