//! One control tick followed by one stereo audio block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use drift_looper::{AnalogInput, Channel, ControlFrame, LooperConfig, Supervisor};

use crate::BLOCK_SIZES;

pub fn bench_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/block");

    for &size in BLOCK_SIZES {
        let config = LooperConfig {
            block_size: size,
            ..LooperConfig::default()
        };
        let Ok(supervisor) = Supervisor::new(config, 11) else {
            continue;
        };
        let (mut control, mut audio) = supervisor.split();

        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.03).sin()).collect();
        let mut out_l = vec![0.0f32; size];
        let mut out_r = vec![0.0f32; size];

        let busy = ControlFrame::default()
            .with_analog(AnalogInput::Blend, 0.5)
            .with_analog(AnalogInput::FeedbackKnob, 0.7)
            .with_analog(AnalogInput::FilterKnob, 0.4)
            .with_analog(AnalogInput::SlipKnob, 0.3)
            .with_analog(AnalogInput::DetuneJack, 0.5);

        // Record a short loop on both channels, then overdub the left.
        let gates = busy
            .with_gate(Channel::Left, true)
            .with_gate(Channel::Right, true);
        for frame in [gates, busy, gates, busy, busy.with_gate(Channel::Left, true), busy] {
            for _ in 0..200 {
                control.tick(&frame);
                audio.process_block(&frame, [&input[..], &input[..]], [&mut out_l[..], &mut out_r[..]]);
            }
        }

        group.bench_with_input(BenchmarkId::new("tick_and_block", size), &size, |b, _| {
            b.iter(|| {
                control.tick(black_box(&busy));
                black_box(audio.process_block(
                    &busy,
                    [&input[..], &input[..]],
                    [&mut out_l[..], &mut out_r[..]],
                ))
            })
        });
    }

    group.finish();
}
