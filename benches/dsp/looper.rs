//! Benchmarks for the loop buffer in each transport state.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use drift_looper::{dsp::Looper, engine::TransportEngine};

use crate::BLOCK_SIZES;

const CAPACITY: usize = 48_000 * 60;
const LOOP_LEN: usize = 48_000 * 2;

fn recorded_looper() -> Looper {
    let mut looper = Looper::new(CAPACITY);
    looper.trigger_record();
    for i in 0..LOOP_LEN {
        looper.process((i as f32 * 0.01).sin());
    }
    looper.trigger_record();
    looper
}

pub fn bench_looper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/looper");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.02).sin()).collect();

        let mut looper = recorded_looper();
        group.bench_with_input(BenchmarkId::new("playing", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(looper.process(black_box(x)));
                }
            })
        });

        let mut looper = recorded_looper();
        looper.set_decay(0.8);
        looper.trigger_record();
        group.bench_with_input(BenchmarkId::new("overdubbing", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(looper.process(black_box(x)));
                }
            })
        });

        // Detuned, slipped and at half speed: every read interpolates
        let mut looper = recorded_looper();
        looper.set_rate_multiplier(0.97);
        looper.set_read_offset(LOOP_LEN / 20);
        looper.set_half_speed(true);
        group.bench_with_input(BenchmarkId::new("slipped_detuned", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(looper.process(black_box(x)));
                }
            })
        });
    }

    group.finish();
}
