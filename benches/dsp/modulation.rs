//! Benchmarks for one control tick's worth of wobble.

use std::hint::black_box;

use criterion::Criterion;
use drift_looper::{
    config::WobbleConfig,
    modulation::ModulationBank,
    ModulationKind,
};
use rand::{rngs::SmallRng, SeedableRng};

pub fn bench_modulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/modulation");
    let config = WobbleConfig::default();

    for (name, kind) in [
        ("lfo", ModulationKind::Lfo),
        ("random_walk", ModulationKind::RandomWalk),
    ] {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut bank = ModulationBank::random(kind, &config, 1_000.0, &mut rng);
        group.bench_function(name, |b| b.iter(|| black_box(bank.sample())));
    }

    group.finish();
}
