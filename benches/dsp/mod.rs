//! Benchmarks for the engines and wobble sources.

mod filter;
mod looper;
mod modulation;

pub use filter::bench_filter;
pub use looper::bench_looper;
pub use modulation::bench_modulation;
